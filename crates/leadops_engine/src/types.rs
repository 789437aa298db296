use std::fmt;

use leadops_core::{Job, LeadId, LeadPage, Stats, TaskId};

/// Everything the engine reports back to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobCreated(Result<Job, GatewayError>),
    JobStatus {
        task_id: TaskId,
        result: Result<Job, GatewayError>,
    },
    PollTick {
        task_id: TaskId,
    },
    LeadsLoaded {
        generation: u64,
        result: Result<LeadPage, GatewayError>,
    },
    KeywordsLoaded(Result<Vec<String>, GatewayError>),
    StatsLoaded(Result<Stats, GatewayError>),
    LeadDeleted {
        id: LeadId,
        result: Result<(), GatewayError>,
    },
    LeadsBulkDeleted {
        ids: Vec<LeadId>,
        result: Result<(), GatewayError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: FailureKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Network trouble, timeouts and 5xx answers; retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            FailureKind::Timeout | FailureKind::Network => true,
            FailureKind::HttpStatus(code) => code >= 500,
            FailureKind::InvalidUrl | FailureKind::NotFound | FailureKind::Malformed => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    NotFound,
    Timeout,
    Network,
    Malformed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Malformed => write!(f, "malformed response"),
        }
    }
}
