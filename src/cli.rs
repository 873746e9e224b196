//! Command-line interface definition.

use clap::builder::styling::{AnsiColor, Color, Styles};
use clap::{Args, Parser, Subcommand};

/// Custom styles for help output - matches the styling module's color scheme
fn help_styles() -> Styles {
    Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .placeholder(anstyle::Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
}

#[derive(Debug, Parser)]
#[command(
    name = "vmpull",
    about = "Configure a JMU CS lab VM by pulling Ansible roles from a release branch",
    version,
    styles = help_styles()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply the selected course configurations with ansible-pull
    Run(RunArgs),

    /// List release branches available on the configured remote
    Branches,

    /// List the course roles this tool can apply
    Roles,

    /// Inspect or change the persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Branch (release codename) to pull, overriding the saved setting
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Git remote URL to pull from, overriding the saved setting
    #[arg(short, long)]
    pub url: Option<String>,

    /// Course role to apply in addition to saved selections (repeatable)
    #[arg(short, long = "role", value_name = "TAG")]
    pub roles: Vec<String>,

    /// Acknowledge branch warnings without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Print the ansible-pull command instead of executing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the persisted settings document and its location
    Show,

    /// Change one setting
    Set {
        /// One of: branch, url, allow-experimental, ignore-unstable-warning
        key: String,
        /// The new value
        value: String,
    },

    /// Delete the settings file, returning everything to defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
