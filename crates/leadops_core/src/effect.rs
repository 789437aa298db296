use crate::{Lead, LeadId, LeadRequest, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Create a scrape job on the gateway.
    CreateJob {
        keywords: Vec<String>,
        locations: Vec<String>,
    },
    /// Read the current status of a job.
    FetchJobStatus { task_id: TaskId },
    /// Start the repeating poll timer for a job, replacing any existing one.
    StartPolling { task_id: TaskId },
    StopPolling,
    /// Write the active task id to durable storage.
    PersistTaskId(TaskId),
    ClearTaskId,
    FetchLeads {
        request: LeadRequest,
        timing: FetchTiming,
    },
    FetchKeywords,
    FetchStats,
    /// Ask the operator to confirm a destructive action.
    RequestConfirmation { prompt: String },
    DeleteLead { id: LeadId },
    BulkDelete { ids: Vec<LeadId> },
    ExportLeads { leads: Vec<Lead> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTiming {
    /// Wait for the quiet period; a newer fetch replaces this one.
    Debounced,
    Immediate,
}
