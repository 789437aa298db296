//! Leadops engine: gateway IO, timers and effect execution.
mod engine;
mod export;
mod gateway;
mod persist;
mod schedule;
mod types;
mod wire;

pub use engine::{ChannelEventSink, EngineConfig, EngineHandle, EventSink};
pub use export::{leads_to_csv, write_leads_csv, ExportError, CSV_HEADERS};
pub use gateway::{Gateway, GatewaySettings, ReqwestGateway};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use schedule::{Debouncer, PollTimer, TimerHandle};
pub use types::{EngineEvent, FailureKind, GatewayError};
