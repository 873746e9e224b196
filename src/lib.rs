//! Branch resolution and settings plumbing for the JMU CS VM configuration tool.
//!
//! `vmpull` is a terminal wrapper around `ansible-pull`: it keeps a small
//! per-user settings document (chosen git branch and remote, course roles to
//! apply), checks the chosen branch against the release codename of the
//! running distro, and warns when the combination looks wrong before handing
//! off to `ansible-pull`.
//!
//! The library half of the crate holds everything with testable behavior;
//! the `vmpull` binary is a thin presentation layer over it.

pub mod net;
pub mod release;
pub mod remote;
pub mod resolver;
pub mod roles;
pub mod settings;
pub mod styling;
