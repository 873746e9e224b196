//! Course role catalog.
//!
//! Each course maps to an Ansible role tag in the configuration repo. The
//! `common` role is not listed here; it is applied on every run and lives as
//! an invariant of the settings module. Experimental courses exist in the
//! repo but are hidden unless the user has opted in.

use anyhow::{Result, bail};

use crate::settings::COMMON_ROLE;

/// A course whose environment the configuration repo can set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    /// Display name, e.g. `CS 149`.
    pub name: &'static str,
    /// Ansible role tag, e.g. `cs149`.
    pub tag: &'static str,
    /// Hidden unless `allow_experimental` is set.
    pub experimental: bool,
}

/// All known courses, stable and experimental.
pub const COURSES: &[Course] = &[
    Course { name: "CS 101", tag: "cs101", experimental: false },
    Course { name: "CS 149", tag: "cs149", experimental: false },
    Course { name: "CS 159", tag: "cs159", experimental: false },
    Course { name: "CS 261", tag: "cs261", experimental: false },
    Course { name: "CS 361", tag: "cs361", experimental: false },
    Course { name: "CS 432", tag: "cs432", experimental: false },
    Course { name: "CS 430", tag: "cs430", experimental: true },
];

/// Courses visible with the given experimental opt-in.
pub fn visible_courses(allow_experimental: bool) -> impl Iterator<Item = &'static Course> {
    COURSES
        .iter()
        .filter(move |course| allow_experimental || !course.experimental)
}

/// Check that `tag` names a selectable role.
///
/// Accepts [`COMMON_ROLE`] and any visible course tag; experimental tags
/// are rejected unless opted in, with an error listing what is valid.
pub fn validate_tag(tag: &str, allow_experimental: bool) -> Result<()> {
    if tag == COMMON_ROLE {
        return Ok(());
    }
    if visible_courses(allow_experimental).any(|course| course.tag == tag) {
        return Ok(());
    }

    let valid = visible_courses(allow_experimental)
        .map(|course| course.tag)
        .collect::<Vec<_>>()
        .join(", ");
    if COURSES.iter().any(|course| course.tag == tag) {
        bail!(
            "role '{tag}' is experimental; enable it with \
             `vmpull config set allow-experimental true` (valid roles: {COMMON_ROLE}, {valid})"
        );
    }
    bail!("unknown role '{tag}' (valid roles: {COMMON_ROLE}, {valid})");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_courses_are_always_visible() {
        let tags: Vec<_> = visible_courses(false).map(|c| c.tag).collect();
        assert!(tags.contains(&"cs101"));
        assert!(tags.contains(&"cs432"));
        assert!(!tags.contains(&"cs430"));
    }

    #[test]
    fn experimental_courses_require_opt_in() {
        assert!(validate_tag("cs430", false).is_err());
        assert!(validate_tag("cs430", true).is_ok());

        let tags: Vec<_> = visible_courses(true).map(|c| c.tag).collect();
        assert!(tags.contains(&"cs430"));
    }

    #[test]
    fn common_is_always_accepted() {
        assert!(validate_tag(COMMON_ROLE, false).is_ok());
    }

    #[test]
    fn unknown_tags_are_rejected_with_the_valid_list() {
        let err = validate_tag("cs999", false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown role 'cs999'"));
        assert!(message.contains("cs101"));
    }

    #[test]
    fn experimental_rejection_mentions_the_opt_in() {
        let err = validate_tag("cs430", false).unwrap_err();
        assert!(err.to_string().contains("allow-experimental"));
    }
}
