//! Branch validation against the running distro release.
//!
//! Given the user's chosen branch and remote, the detected release codename,
//! and a branch-existence predicate, [`resolve`] decides whether the run may
//! continue and which warning, if any, to show. The rules form a fixed-order
//! decision table:
//!
//! 1. Non-default remote: no assumptions can be made, no checks run.
//! 2. Unstable branch chosen while a release branch exists for this distro:
//!    blocking, suppressible warning.
//! 3. Everything else: advisory warnings recommending a better
//!    branch/remote pair, first match wins.
//!
//! Warnings never switch the branch; they recommend. The single blocking
//! case holds the run in [`ResolverState::AwaitingDecision`] until the user
//! acknowledges it (and optionally persists the suppress flag).

use std::sync::LazyLock;

use regex::Regex;

use crate::settings::{DEFAULT_GIT_REMOTE, Settings};

/// The development branch. Release branches are named after distro
/// codenames; everything lands here first.
pub const UNSTABLE_BRANCH: &str = "main";

/// Release-codename heuristic: a lowercase word ending in `a`, the pattern
/// Linux Mint release names follow (vera, vanessa, una, ...). Deliberately
/// loose; it only gates which warnings are worth showing.
static CODENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+a$").expect("codename pattern is a valid regex"));

/// Whether `branch` is shaped like a release codename.
pub fn looks_like_release_codename(branch: &str) -> bool {
    CODENAME_PATTERN.is_match(branch)
}

/// Which decision-table rule produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The unstable branch is selected although a release branch exists
    /// for this distro. The only blocking, suppressible case.
    UnstableSelected,
    /// The chosen release branch is for a different distro release, and a
    /// branch for the running release exists.
    IncompatibleRelease,
    /// The chosen branch does not exist on the remote, but a branch for the
    /// running release does.
    ChosenUnavailable,
    /// The chosen branch matches the running release, but no such branch
    /// exists yet.
    ChosenNotAvailable,
    /// The chosen release branch is for a different distro release, and the
    /// running release has no branch either.
    UnsupportedRelease,
    /// Neither the chosen branch nor the running release exists on the
    /// remote.
    NoReleaseAvailable,
}

impl WarningKind {
    /// Dialog-style title for the warning.
    pub fn title(self) -> &'static str {
        match self {
            Self::UnstableSelected => "Unstable release selected",
            Self::IncompatibleRelease | Self::UnsupportedRelease => "Incompatible release",
            Self::ChosenUnavailable | Self::NoReleaseAvailable => "Chosen release unavailable",
            Self::ChosenNotAvailable => "Chosen release not available",
        }
    }
}

/// Settings flag a warning can persist to suppress itself permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressFlag {
    /// `ignore_unstable_warning` in [`Settings`].
    IgnoreUnstableWarning,
}

impl SuppressFlag {
    /// Set the flag on the settings value.
    pub fn apply(self, settings: &mut Settings) {
        match self {
            Self::IgnoreUnstableWarning => settings.ignore_unstable_warning = true,
        }
    }
}

/// The branch/remote pair a warning recommends switching to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// Branch (release codename or [`UNSTABLE_BRANCH`]) to use instead.
    pub release: String,
    /// Remote URL to use instead.
    pub url: String,
}

/// A warning produced by the decision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    /// Explanation shown under the title.
    pub message: String,
    /// What to switch to; always present, warnings are advisory.
    pub recommendation: Recommendation,
    /// Present when acknowledging the warning may persist a "don't show
    /// this again" flag.
    pub suppress_flag: Option<SuppressFlag>,
}

impl Warning {
    /// Dialog-style title for the warning.
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Whether a resolution still waits on the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// A blocking warning was shown; the run waits for acknowledgment.
    AwaitingDecision,
    /// The decision is final: proceed or abort.
    Resolved,
}

/// The user's answer to a blocking warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    /// Continue this run only.
    Proceed,
    /// Continue and never show this warning again.
    ProceedAndSuppress,
    /// Stop the run.
    Abort,
}

/// Outcome of branch validation for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The branch this run will use. Warnings recommend alternatives but
    /// never switch it.
    pub effective_branch: String,
    /// Advisory or blocking warning, if any rule fired.
    pub warning: Option<Warning>,
    proceed: bool,
    state: ResolverState,
}

impl Resolution {
    fn resolved(effective_branch: String, warning: Option<Warning>) -> Self {
        Self {
            effective_branch,
            warning,
            proceed: true,
            state: ResolverState::Resolved,
        }
    }

    fn awaiting(effective_branch: String, warning: Warning) -> Self {
        Self {
            effective_branch,
            warning: Some(warning),
            proceed: false,
            state: ResolverState::AwaitingDecision,
        }
    }

    /// Whether the caller may continue without further prompting.
    pub fn proceed(&self) -> bool {
        self.proceed
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Apply the user's answer to a blocking warning, transitioning
    /// `AwaitingDecision` to `Resolved`. A no-op once resolved; there is no
    /// automatic retry.
    pub fn acknowledge(&mut self, ack: Acknowledgment, settings: &mut Settings) {
        if self.state != ResolverState::AwaitingDecision {
            return;
        }
        match ack {
            Acknowledgment::Proceed => self.proceed = true,
            Acknowledgment::ProceedAndSuppress => {
                if let Some(flag) = self.warning.as_ref().and_then(|w| w.suppress_flag) {
                    flag.apply(settings);
                }
                self.proceed = true;
            }
            Acknowledgment::Abort => self.proceed = false,
        }
        self.state = ResolverState::Resolved;
    }
}

/// Validate the chosen branch/remote against the running release.
///
/// `system_release` may be empty when the release codename could not be
/// detected; every existence check for it is then false and the rules fall
/// through accordingly. `branch_exists` is consulted for at most two branch
/// names and must return `false` (not fail) when the remote is unreachable;
/// callers are expected to have run a connectivity check beforehand.
pub fn resolve<F>(settings: &Settings, system_release: &str, branch_exists: F) -> Resolution
where
    F: Fn(&str) -> bool,
{
    let chosen_branch = settings.git_branch.as_str();
    let chosen_url = settings.git_url.as_str();

    if chosen_url != DEFAULT_GIT_REMOTE {
        log::debug!("Not validating branches: non-default remote {chosen_url} set");
        return Resolution::resolved(chosen_branch.to_string(), None);
    }

    let sys_exists = branch_exists(system_release);

    if chosen_branch == UNSTABLE_BRANCH && sys_exists && !settings.ignore_unstable_warning {
        let warning = Warning {
            kind: WarningKind::UnstableSelected,
            message: format!(
                "You have selected the unstable development branch ({UNSTABLE_BRANCH}) of the \
                 configuration tool. It is recommended to use the release branch that \
                 corresponds to your Linux Mint version."
            ),
            recommendation: Recommendation {
                release: system_release.to_string(),
                url: chosen_url.to_string(),
            },
            suppress_flag: Some(SuppressFlag::IgnoreUnstableWarning),
        };
        return Resolution::awaiting(chosen_branch.to_string(), warning);
    }

    let chosen_exists = branch_exists(chosen_branch);
    let mismatch = system_release != chosen_branch;
    let looks_versioned = looks_like_release_codename(chosen_branch);

    let warning = if mismatch && looks_versioned && sys_exists {
        // A branch specifically for this distro release is available.
        Some(Warning {
            kind: WarningKind::IncompatibleRelease,
            message: "You have selected a version of the configuration tool meant for a \
                      different Linux Mint release. It is recommended to switch to the release \
                      branch that corresponds to your Linux Mint version."
                .to_string(),
            recommendation: Recommendation {
                release: system_release.to_string(),
                url: chosen_url.to_string(),
            },
            suppress_flag: None,
        })
    } else if sys_exists && !chosen_exists {
        Some(Warning {
            kind: WarningKind::ChosenUnavailable,
            message: "You have selected a release of the configuration tool that does not \
                      exist on the git URL you have specified. It is recommended that you \
                      switch to the release branch that corresponds to your Linux Mint release \
                      on the default repository."
                .to_string(),
            recommendation: Recommendation {
                release: system_release.to_string(),
                url: DEFAULT_GIT_REMOTE.to_string(),
            },
            suppress_flag: None,
        })
    } else if looks_versioned && !mismatch && !chosen_exists {
        Some(Warning {
            kind: WarningKind::ChosenNotAvailable,
            message: "You have selected a release of the configuration tool that does not \
                      exist on the git URL you have specified; however, your current Linux \
                      Mint release is not yet supported. It is recommended that you switch to \
                      the main (testing) branch."
                .to_string(),
            recommendation: Recommendation {
                release: UNSTABLE_BRANCH.to_string(),
                url: chosen_url.to_string(),
            },
            suppress_flag: None,
        })
    } else if mismatch && looks_versioned && !sys_exists {
        // Meant for another release, and this system is unsupported.
        Some(Warning {
            kind: WarningKind::UnsupportedRelease,
            message: "You have selected a version of the configuration tool meant for a \
                      different Linux Mint release; however, we are unable to completely \
                      support your Linux Mint release at this time. It is recommended to \
                      switch to the main (testing) branch."
                .to_string(),
            recommendation: Recommendation {
                release: UNSTABLE_BRANCH.to_string(),
                url: chosen_url.to_string(),
            },
            suppress_flag: None,
        })
    } else if mismatch && !sys_exists && !chosen_exists {
        Some(Warning {
            kind: WarningKind::NoReleaseAvailable,
            message: "You have selected a version of the configuration tool that does not \
                      support your version of Linux Mint; however, there is no release that \
                      supports your version of Linux Mint available yet. It is recommended to \
                      switch to the main (testing) branch."
                .to_string(),
            recommendation: Recommendation {
                release: UNSTABLE_BRANCH.to_string(),
                url: chosen_url.to_string(),
            },
            suppress_flag: None,
        })
    } else {
        None
    };

    Resolution::resolved(chosen_branch.to_string(), warning)
}
