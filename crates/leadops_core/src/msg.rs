use crate::{Job, LeadId, LeadPage, RemoteFailure, Stats, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User added a keyword to the mission draft.
    KeywordEntered(String),
    /// User removed the keyword at the given index.
    KeywordRemoved(usize),
    LocationEntered(String),
    LocationRemoved(usize),
    /// User clicked Launch.
    LaunchClicked,
    /// Task id read from durable storage at startup.
    RestoreMission(Option<TaskId>),
    /// Gateway answer to a job creation.
    JobCreated(Result<Job, RemoteFailure>),
    /// Poll timer fired.
    PollTick { task_id: TaskId },
    /// Gateway answer to a status read (resume or poll).
    JobStatusReceived {
        task_id: TaskId,
        result: Result<Job, RemoteFailure>,
    },
    /// User dismissed a finished mission.
    DismissClicked,

    /// Lead browser became visible.
    BrowserOpened,
    SearchChanged(String),
    KeywordFilterSelected(Option<String>),
    PageRequested(u32),
    NextPage,
    PrevPage,
    RefreshClicked,
    LeadsLoaded {
        generation: u64,
        result: Result<LeadPage, RemoteFailure>,
    },
    KeywordsLoaded(Result<Vec<String>, RemoteFailure>),
    StatsRequested,
    StatsLoaded(Result<Stats, RemoteFailure>),
    LeadToggled(LeadId),
    SelectAllClicked,
    ClearSelectionClicked,
    DeleteLeadClicked(LeadId),
    BulkDeleteClicked,
    /// Operator answer to the pending confirmation prompt.
    ConfirmationAnswered(bool),
    LeadDeleted {
        id: LeadId,
        result: Result<(), RemoteFailure>,
    },
    LeadsBulkDeleted {
        ids: Vec<LeadId>,
        result: Result<(), RemoteFailure>,
    },
    ExportClicked,
    /// Fallback for unrecognized input.
    NoOp,
}
