//! Remote branch queries via `git ls-remote`.
//!
//! The configuration repo is never cloned ahead of time, so branch
//! questions go straight to the remote. [`branch_exists`] is the predicate
//! the resolver consumes: any failure (git missing, network down, bad URL)
//! reads as "the branch does not exist" rather than an error, because the
//! caller has already decided connectivity separately.

use std::process::Command;

use anyhow::{Context, Result, bail};

/// Whether `branch` exists as a head on `remote_url`.
///
/// Uses `git ls-remote --heads --exit-code`, so git itself reports absence
/// through the exit status. An empty branch name (undetectable system
/// release) is answered without spawning anything.
pub fn branch_exists(remote_url: &str, branch: &str) -> bool {
    if branch.is_empty() {
        log::debug!("Not querying {remote_url} for an empty branch name");
        return false;
    }

    match run_git(&["ls-remote", "--heads", "--exit-code", remote_url, branch]) {
        Ok(stdout) => {
            log::debug!("ls-remote match for {branch}: {}", stdout.trim());
            true
        }
        Err(err) => {
            log::debug!("Treating {branch} as absent on {remote_url}: {err:#}");
            false
        }
    }
}

/// List the branch names available on `remote_url`.
pub fn list_remote_branches(remote_url: &str) -> Result<Vec<String>> {
    let stdout = run_git(&["ls-remote", "--heads", remote_url])
        .with_context(|| format!("Failed to list branches at {remote_url}"))?;

    // Each line is "<oid>\trefs/heads/<name>".
    let branches = stdout
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .filter_map(|refname| refname.strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect();
    Ok(branches)
}

fn run_git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.trim().lines() {
            log::debug!("  ! {line}");
        }
        bail!("git {} exited with {}", args.join(" "), output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// A minimal local repo with a single branch, addressable as file://.
    fn fixture_repo(branch: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        git(path, &["init", "--initial-branch", branch]);
        git(
            path,
            &[
                "-c",
                "user.name=fixture",
                "-c",
                "user.email=fixture@example.com",
                "commit",
                "--allow-empty",
                "-m",
                "initial",
            ],
        );
        let url = format!("file://{}", path.display());
        (dir, url)
    }

    fn git(path: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(path)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {args:?} failed");
    }

    #[test]
    fn empty_branch_name_is_absent_without_spawning() {
        assert!(!branch_exists("file:///nowhere", ""));
    }

    #[test]
    fn unreachable_remote_reads_as_absent() {
        assert!(!branch_exists("file:///does/not/exist/vmpull-fixture", "main"));
    }

    #[test]
    fn existing_branch_is_found() {
        let (_dir, url) = fixture_repo("vera");
        assert!(branch_exists(&url, "vera"));
    }

    #[test]
    fn missing_branch_is_absent() {
        let (_dir, url) = fixture_repo("vera");
        assert!(!branch_exists(&url, "vanessa"));
    }

    #[test]
    fn listing_returns_branch_names() {
        let (_dir, url) = fixture_repo("vera");
        let branches = list_remote_branches(&url).unwrap();
        assert_eq!(branches, vec!["vera".to_string()]);
    }

    #[test]
    fn listing_an_unreachable_remote_fails() {
        assert!(list_remote_branches("file:///does/not/exist/vmpull-fixture").is_err());
    }
}
