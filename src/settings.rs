//! Persisted user settings.
//!
//! Settings live in a JSON document at `<config-dir>/vmpull/settings.json`
//! (XDG paths via etcetera; `VMPULL_SETTINGS_PATH` overrides the location so
//! tests never touch the real file). The document is loaded once at startup,
//! mutated in memory, and written back at well-defined points: when a run
//! starts, when the user changes a setting, or when a warning is suppressed.
//!
//! A missing or corrupt file falls back to defaults and is never fatal.

use std::collections::BTreeSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

/// The remote the configuration playbooks are published at. Branch
/// validation only applies here; nothing can be assumed about other remotes.
pub const DEFAULT_GIT_REMOTE: &str = "https://github.com/jmunixusers/cs-vm-build";

/// The role every run applies regardless of what the user selected.
pub const COMMON_ROLE: &str = "common";

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV_VAR: &str = "VMPULL_SETTINGS_PATH";

/// Per-user settings, persisted across invocations.
///
/// The role fields are sets in memory (`BTreeSet` so serialization order is
/// deterministic) and lists on disk; duplicates in a hand-edited file
/// disappear on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Branch of the configuration repo to pull. Empty until first seeded
    /// from the detected distro release.
    pub git_branch: String,
    /// Remote URL to pull the configuration repo from.
    pub git_url: String,
    /// Every role the user has ever selected.
    pub roles_all_time: BTreeSet<String>,
    /// Roles to apply on the next run. Always contains [`COMMON_ROLE`].
    pub roles_this_run: BTreeSet<String>,
    /// Show courses that are not ready for general use.
    pub allow_experimental: bool,
    /// Skip the warning about running the unstable branch.
    pub ignore_unstable_warning: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let base_roles: BTreeSet<String> = [COMMON_ROLE.to_string()].into();
        Self {
            git_branch: String::new(),
            git_url: DEFAULT_GIT_REMOTE.to_string(),
            roles_all_time: base_roles.clone(),
            roles_this_run: base_roles,
            allow_experimental: false,
            ignore_unstable_warning: false,
        }
    }
}

impl Settings {
    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&settings_path()?))
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable as JSON. Load failures are logged, not raised.
    pub fn load_from(path: &Path) -> Self {
        let mut settings = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log::warn!(
                        "Settings file {} is invalid, using defaults: {err}",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!(
                    "Unable to read settings file {}, using defaults: {err}",
                    path.display()
                );
                Self::default()
            }
        };
        settings.normalize();
        log::debug!("Loaded settings from {}: {settings:?}", path.display());
        settings
    }

    /// Re-establish the invariants a hand-edited file may have broken:
    /// a usable remote URL, `common` in the run set, and every previously
    /// chosen role re-applied this run.
    fn normalize(&mut self) {
        if self.git_url.trim().is_empty() {
            self.git_url = DEFAULT_GIT_REMOTE.to_string();
        }
        let all_time = self.roles_all_time.clone();
        self.roles_this_run.extend(all_time);
        self.roles_this_run.insert(COMMON_ROLE.to_string());
    }

    /// Save settings to the default location.
    pub fn save(&mut self) -> Result<()> {
        let path = settings_path()?;
        self.save_to(&path)
    }

    /// Save settings to `path`, folding this run's roles into the all-time
    /// set first. The write is atomic-replace: a temp file in the target
    /// directory, then a rename over the old document.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        self.roles_this_run.insert(COMMON_ROLE.to_string());
        self.roles_all_time.extend(self.roles_this_run.iter().cloned());

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create settings directory {}", parent.display())
        })?;

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        let mut temp = tempfile::NamedTempFile::new_in(parent).with_context(|| {
            format!("Failed to create temporary file in {}", parent.display())
        })?;
        temp.write_all(json.as_bytes())
            .and_then(|()| temp.write_all(b"\n"))
            .context("Failed to write settings")?;
        temp.persist(path)
            .with_context(|| format!("Failed to replace settings file {}", path.display()))?;

        log::info!("Wrote settings to {}", path.display());
        Ok(())
    }
}

/// Where the settings document lives.
///
/// `VMPULL_SETTINGS_PATH` wins when set; otherwise the platform config dir
/// (XDG on Linux and macOS, `%APPDATA%` on Windows).
pub fn settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let strategy = choose_base_strategy()
        .context("Cannot determine config directory. Set $HOME or $XDG_CONFIG_HOME")?;
    Ok(strategy.config_dir().join("vmpull").join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, path) = temp_settings_path();
        let settings = Settings::load_from(&path);
        assert_eq!(settings, {
            let mut default = Settings::default();
            default.normalize();
            default
        });
        assert_eq!(settings.git_url, DEFAULT_GIT_REMOTE);
        assert!(settings.roles_this_run.contains(COMMON_ROLE));
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(&path, "{not json at all").unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.git_url, DEFAULT_GIT_REMOTE);
        assert!(settings.roles_this_run.contains(COMMON_ROLE));
    }

    #[test]
    fn round_trip_preserves_roles_and_flags() {
        let (_dir, path) = temp_settings_path();
        let mut settings = Settings::default();
        settings.git_branch = "vera".to_string();
        settings.roles_this_run.insert("cs149".to_string());
        settings.roles_this_run.insert("cs261".to_string());
        settings.allow_experimental = true;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.git_branch, "vera");
        assert!(loaded.allow_experimental);
        assert!(loaded.roles_this_run.contains("cs149"));
        assert!(loaded.roles_this_run.contains("cs261"));
        assert!(loaded.roles_this_run.contains(COMMON_ROLE));
        assert_eq!(loaded.roles_this_run, loaded.roles_all_time);
    }

    #[test]
    fn duplicate_roles_in_file_are_deduplicated() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(
            &path,
            r#"{
                "git_branch": "vera",
                "roles_this_run": ["cs149", "cs149", "common", "cs149"],
                "roles_all_time": ["cs101", "cs101"]
            }"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        let expected: BTreeSet<String> = ["common", "cs101", "cs149"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(settings.roles_this_run, expected);
    }

    #[test]
    fn common_is_restored_when_removed_from_file() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(
            &path,
            r#"{"roles_this_run": ["cs101"], "roles_all_time": []}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.roles_this_run.contains(COMMON_ROLE));
    }

    #[test]
    fn load_folds_all_time_roles_into_this_run() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(
            &path,
            r#"{"roles_this_run": ["common"], "roles_all_time": ["cs361", "common"]}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.roles_this_run.contains("cs361"));
    }

    #[test]
    fn save_folds_this_run_into_all_time() {
        let (_dir, path) = temp_settings_path();
        let mut settings = Settings::default();
        settings.roles_this_run.insert("cs432".to_string());
        settings.save_to(&path).unwrap();
        assert!(settings.roles_all_time.contains("cs432"));

        let loaded = Settings::load_from(&path);
        assert!(loaded.roles_all_time.contains("cs432"));
    }

    #[test]
    fn empty_git_url_falls_back_to_default() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(&path, r#"{"git_url": ""}"#).unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.git_url, DEFAULT_GIT_REMOTE);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.json");
        Settings::default().save_to(&path).unwrap();
        assert!(path.exists());
    }
}
