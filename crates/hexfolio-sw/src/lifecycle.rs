//! Worker lifecycle states and events.

use serde::{Deserialize, Serialize};

/// Worker lifecycle state.
///
/// The standard dual-worker model applies: an old worker keeps serving in
/// `Activated` while a replacement moves through `Installing`. This worker
/// skips the waiting period after install, so `Installed` is immediately
/// followed by activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    /// Initial state before install begins.
    Parsed,
    /// Install event in progress (seeding stores).
    Installing,
    /// Installed; waiting skipped, eligible for immediate activation.
    Installed,
    /// Activate event in progress (version GC, client claiming).
    Activating,
    /// Active and controlling pages.
    Activated,
    /// Replaced by a newer version.
    Redundant,
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::Parsed
    }
}

impl WorkerState {
    /// Check if this state allows fetch interception.
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Redundant)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        write!(f, "{s}")
    }
}

/// Outcome of an install run.
///
/// Install uses all-settled semantics: individual asset failures land in
/// `failed` without failing the step.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// URLs attempted.
    pub attempted: usize,
    /// URLs cached successfully.
    pub cached: Vec<String>,
    /// URLs that failed to fetch or cache.
    pub failed: Vec<String>,
    /// Whether the shell document was seeded.
    pub shell_seeded: bool,
}

impl InstallReport {
    /// Check if every attempted asset was cached.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.shell_seeded
    }
}

/// Events published by the worker for host observation.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Lifecycle state changed.
    StateChange {
        from: WorkerState,
        to: WorkerState,
    },
    /// Install finished (possibly partially).
    InstallCompleted { cached: usize, failed: usize },
    /// Activation claimed control of open pages.
    ClientsClaimed { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(WorkerState::default(), WorkerState::Parsed);
    }

    #[test]
    fn test_fetch_interception_gating() {
        assert!(WorkerState::Activated.can_intercept_fetch());
        assert!(!WorkerState::Installing.can_intercept_fetch());
        assert!(!WorkerState::Installed.can_intercept_fetch());
    }

    #[test]
    fn test_terminal_state() {
        assert!(WorkerState::Redundant.is_terminal());
        assert!(!WorkerState::Activated.is_terminal());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(WorkerState::Activating.to_string(), "activating");
    }

    #[test]
    fn test_install_report_complete() {
        let report = InstallReport {
            attempted: 2,
            cached: vec!["a".into(), "b".into()],
            failed: vec![],
            shell_seeded: true,
        };
        assert!(report.is_complete());

        let partial = InstallReport {
            attempted: 2,
            cached: vec!["a".into()],
            failed: vec!["b".into()],
            shell_seeded: true,
        };
        assert!(!partial.is_complete());
    }
}
