//! Explicit state machines that keep view data in step with the catalog.
//!
//! Each synchronizer hands out a tagged request when its input (cursor or
//! identifier) changes. The caller runs the matching `fetch_*` future
//! wherever it likes and feeds the outcome back through `apply`, which
//! commits only if the tag is still the latest one.

pub mod detail;
pub mod list;

use crate::api::{ApiClientError, ErrorKind};

/// Monotonic tag on every request a synchronizer issues.
pub type Generation = u64;

/// Cloneable error carried through app events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ApiClientError> for SyncFailure {
    fn from(err: ApiClientError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(SyncFailure),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn failure(&self) -> Option<&SyncFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }
}
