//! Terminal output styling.
//!
//! Uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//!
//! All user-facing messages go through `println!`/`eprintln!` from this
//! module so NO_COLOR and non-terminal output are handled uniformly.
//! Interactive prompts use stderr so they appear even when stdout is
//! redirected.

use anstyle::{AnsiColor, Color, Style};

/// Auto-detecting println that respects NO_COLOR and terminal capabilities
pub use anstream::println;

/// Auto-detecting eprintln that respects NO_COLOR and terminal capabilities
pub use anstream::eprintln;

/// Auto-detecting eprint that respects NO_COLOR and terminal capabilities
pub use anstream::eprint;

/// Error style (red) - use as `{ERROR}text{ERROR:#}`
pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Warning style (yellow) - use as `{WARNING}text{WARNING:#}`
pub const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Success style (green) - use as `{SUCCESS}text{SUCCESS:#}`
pub const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));

/// Hint style (dimmed) - use as `{HINT}text{HINT:#}`
pub const HINT: Style = Style::new().dimmed();

/// Emphasis style (bold) for branch names and URLs inside messages
pub const EMPHASIS: Style = Style::new().bold();

/// Format an error message with the standard `✗` prefix.
pub fn error_message(text: impl AsRef<str>) -> String {
    format!("{ERROR}✗ {}{ERROR:#}", text.as_ref())
}

/// Format a warning message with the standard `⚠` prefix.
pub fn warning_message(text: impl AsRef<str>) -> String {
    format!("{WARNING}⚠ {}{WARNING:#}", text.as_ref())
}

/// Format a success message with the standard `✓` prefix.
pub fn success_message(text: impl AsRef<str>) -> String {
    format!("{SUCCESS}✓ {}{SUCCESS:#}", text.as_ref())
}

/// Format a hint line with the standard `↳` prefix.
pub fn hint_message(text: impl AsRef<str>) -> String {
    format!("{HINT}↳ {}{HINT:#}", text.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_helpers_include_prefix_and_text() {
        assert!(error_message("boom").contains("✗ boom"));
        assert!(warning_message("careful").contains("⚠ careful"));
        assert!(success_message("done").contains("✓ done"));
        assert!(hint_message("try this").contains("↳ try this"));
    }
}
