//! The `config` subcommand: show, set, and reset persisted settings.

use std::io::ErrorKind;

use anyhow::{Context, Result, bail};

use vmpull::settings::{self, Settings};
use vmpull::styling;

use crate::cli::ConfigAction;

pub fn handle_config(action: &ConfigAction) -> Result<()> {
    let path = settings::settings_path()?;

    match action {
        ConfigAction::Show => {
            let settings = Settings::load_from(&path);
            let json =
                serde_json::to_string_pretty(&settings).context("Failed to render settings")?;
            styling::println!("{json}");
            styling::println!(
                "{}",
                styling::hint_message(format!("stored at {}", path.display()))
            );
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load_from(&path);
            match key.as_str() {
                "branch" => settings.git_branch = value.clone(),
                "url" => settings.git_url = value.clone(),
                "allow-experimental" => settings.allow_experimental = parse_bool(value)?,
                "ignore-unstable-warning" => {
                    settings.ignore_unstable_warning = parse_bool(value)?;
                }
                other => bail!(
                    "unknown setting '{other}' (valid: branch, url, allow-experimental, \
                     ignore-unstable-warning)"
                ),
            }
            settings.save_to(&path)?;
            styling::println!("{}", styling::success_message(format!("{key} updated")));
        }
        ConfigAction::Reset => match std::fs::remove_file(&path) {
            Ok(()) => {
                styling::println!("{}", styling::success_message("Settings reset to defaults"));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                styling::println!("{}", styling::success_message("Settings already at defaults"));
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to remove {}", path.display()));
            }
        },
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("expected true or false, got '{value}'"))
}
