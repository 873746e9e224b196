//! The `branches` subcommand: show what the remote offers.

use anyhow::Result;

use vmpull::settings::Settings;
use vmpull::styling::{self, EMPHASIS, HINT};
use vmpull::{release, remote};

pub fn handle_branches() -> Result<()> {
    let settings = Settings::load()?;
    let branches = remote::list_remote_branches(&settings.git_url)?;
    let system_release = release::detect_system_release();

    for branch in &branches {
        let annotation = if branch == system_release {
            format!(" {HINT}(matches this system){HINT:#}")
        } else {
            String::new()
        };
        if *branch == settings.git_branch {
            styling::println!("{EMPHASIS}* {branch}{EMPHASIS:#}{annotation}");
        } else {
            styling::println!("  {branch}{annotation}");
        }
    }

    Ok(())
}
