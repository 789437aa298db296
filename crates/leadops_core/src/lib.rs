//! Leadops core: pure state machine and view-model helpers for the scraping
//! operations console.
mod browser;
mod effect;
mod error;
mod mission;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use browser::{BrowserState, PendingConfirmation, DEFAULT_PAGE_SIZE};
pub use effect::{Effect, FetchTiming};
pub use error::{ConsoleError, RemoteFailure, RemoteFailureKind};
pub use mission::{MissionPhase, MissionState};
pub use model::{
    FieldValue, Job, JobStatus, Lead, LeadId, LeadPage, LeadQuery, LeadRequest, Stats, TaskId,
};
pub use msg::Msg;
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, BrowserView, JobView, LeadRowView, MissionView};
