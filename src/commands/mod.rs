//! Subcommand handlers for the `vmpull` binary.

mod branches;
mod config;
mod roles;
mod run;

pub use branches::handle_branches;
pub use config::handle_config;
pub use roles::handle_roles;
pub use run::handle_run;
