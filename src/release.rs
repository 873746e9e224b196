//! Distro release detection.
//!
//! Reads os-release(5) to find the release codename of the running system.
//! Release branches in the configuration repo are named after these
//! codenames, so an undetectable codename just means no branch can be
//! matched automatically; it is never an error.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Locations of the os-release file, in lookup order per os-release(5).
const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// The codename of the running distro release, or the empty string when it
/// cannot be determined. The file is read once per process.
pub fn detect_system_release() -> &'static str {
    static RELEASE: OnceLock<String> = OnceLock::new();
    RELEASE.get_or_init(read_system_release).as_str()
}

fn read_system_release() -> String {
    let Some(path) = OS_RELEASE_PATHS
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
    else {
        log::warn!("No os-release file found; cannot detect the system release");
        return String::new();
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            log::warn!("Unable to read {}: {err}", path.display());
            return String::new();
        }
    };

    let fields = parse_os_release(&contents);
    match fields.get("VERSION_CODENAME") {
        Some(codename) if !codename.trim().is_empty() => codename.clone(),
        Some(_) | None => {
            log::warn!(
                "VERSION_CODENAME is not in {}. Full file contents: {fields:?}",
                path.display()
            );
            String::new()
        }
    }
}

/// Parse os-release(5) content into a key/value map.
///
/// Lines are `KEY=VALUE` with optional single or double quoting of the
/// value; blank lines and `#` comments are skipped, as is anything that
/// does not look like an assignment to an os-release key.
pub fn parse_os_release(contents: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            log::debug!("os-release line has no assignment: {line}");
            continue;
        };
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            log::debug!("Skipping unexpected os-release key: {key}");
            continue;
        }
        fields.insert(key.to_string(), unquote(value));
    }
    fields
}

/// Strip matching single or double quotes and unescape the sequences
/// os-release(5) allows inside double quotes.
fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            if quote == '\'' {
                return inner.to_string();
            }
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    match chars.next() {
                        Some(escaped) => out.push(escaped),
                        None => out.push('\\'),
                    }
                } else {
                    out.push(c);
                }
            }
            return out;
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_unquoted_values() {
        let fields = parse_os_release(
            "NAME=\"Linux Mint\"\nID=linuxmint\nVERSION_CODENAME=vera\nUBUNTU_CODENAME='jammy'\n",
        );
        assert_eq!(fields["NAME"], "Linux Mint");
        assert_eq!(fields["ID"], "linuxmint");
        assert_eq!(fields["VERSION_CODENAME"], "vera");
        assert_eq!(fields["UBUNTU_CODENAME"], "jammy");
    }

    #[test]
    fn skips_comments_blanks_and_non_assignments() {
        let fields = parse_os_release(
            "# comment\n\nVERSION_CODENAME=vera\nthis line has no assignment\n  # indented comment\n",
        );
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["VERSION_CODENAME"], "vera");
    }

    #[test]
    fn skips_keys_that_are_not_os_release_shaped() {
        let fields = parse_os_release("lowercase=no\nVERSION_CODENAME=vera\nBAD KEY=no\n");
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("VERSION_CODENAME"));
    }

    #[test]
    fn unescapes_double_quoted_values() {
        let fields = parse_os_release(r#"PRETTY_NAME="Linux Mint 21.1 \"Vera\"""#);
        assert_eq!(fields["PRETTY_NAME"], r#"Linux Mint 21.1 "Vera""#);
    }

    #[test]
    fn missing_codename_is_absent_from_the_map() {
        let fields = parse_os_release("NAME=\"Some OS\"\nID=someos\n");
        assert!(!fields.contains_key("VERSION_CODENAME"));
    }
}
