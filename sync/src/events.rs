use serde::{Deserialize, Serialize};

/// Result of a single reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Remote values were written over the matching local keys.
    Applied { keys: usize },
    /// Local changes are pending (or the engine is not ready yet); nothing
    /// was read from the remote store.
    Skipped,
}

/// Published by the auto-reload task after every tick.
///
/// Ticks have no caller to return errors to, so failures are reported here
/// in addition to the logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ReloadEvent {
    Applied { namespace: String, keys: usize },
    Skipped { namespace: String },
    Failed { namespace: String, error: String },
}

impl ReloadEvent {
    pub fn namespace(&self) -> &str {
        match self {
            ReloadEvent::Applied { namespace, .. }
            | ReloadEvent::Skipped { namespace }
            | ReloadEvent::Failed { namespace, .. } => namespace,
        }
    }
}
