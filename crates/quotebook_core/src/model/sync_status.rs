//! Observable sync state, persisted between runs as JSON.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// State of the sync loop as shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced {
        /// Unix epoch milliseconds of completion.
        at_epoch_ms: i64,
        added: usize,
        replaced: usize,
    },
    Error {
        /// Unix epoch milliseconds of the failure.
        at_epoch_ms: i64,
        message: String,
    },
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("Not synced yet."),
            Self::Syncing => f.write_str("Syncing with server..."),
            Self::Synced {
                added, replaced, ..
            } => write!(
                f,
                "Synced with server: {added} server quotes applied, {replaced} local quotes replaced."
            ),
            Self::Error { message, .. } => write!(f, "Sync failed: {message}"),
        }
    }
}
