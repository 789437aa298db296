use thiserror::Error;

use crate::TaskId;

/// Why a gateway call failed, as far as the state machine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailureKind {
    /// The gateway does not know the referenced entity (HTTP 404).
    NotFound,
    /// Network error, timeout or 5xx; worth retrying on the next trigger.
    Unavailable,
    /// The gateway answered with a non-retryable error status.
    Rejected,
    /// The response did not match the expected schema.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub kind: RemoteFailureKind,
    pub message: String,
}

impl RemoteFailure {
    pub fn new(kind: RemoteFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// User-facing error taxonomy of the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Validation(String),
    #[error("gateway unavailable: {0}")]
    TransientGateway(String),
    #[error("task {0} is no longer known to the gateway")]
    StaleReference(TaskId),
    #[error("{action} failed: {reason}")]
    MutationFailure { action: String, reason: String },
    #[error("a running mission cannot be dismissed")]
    DismissWhileRunning,
}

impl ConsoleError {
    pub(crate) fn mutation(action: &str, failure: &RemoteFailure) -> Self {
        ConsoleError::MutationFailure {
            action: action.to_string(),
            reason: failure.message.clone(),
        }
    }
}
