//! The `roles` subcommand: list selectable course roles.

use anyhow::Result;

use vmpull::roles::{COURSES, visible_courses};
use vmpull::settings::{COMMON_ROLE, Settings};
use vmpull::styling;

pub fn handle_roles() -> Result<()> {
    let settings = Settings::load()?;

    styling::println!("  {COMMON_ROLE:<9}Base configuration (always applied)");
    for course in visible_courses(settings.allow_experimental) {
        let marker = if course.experimental {
            " (experimental)"
        } else {
            ""
        };
        styling::println!("  {:<9}{}{marker}", course.tag, course.name);
    }

    if !settings.allow_experimental && COURSES.iter().any(|course| course.experimental) {
        styling::println!(
            "{}",
            styling::hint_message(
                "Some experimental courses are hidden. Enable them with \
                 `vmpull config set allow-experimental true`."
            )
        );
    }

    Ok(())
}
