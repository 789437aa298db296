use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use chrono::Local;
use leadops_core::{Effect, FetchTiming, Lead, Msg, RemoteFailure, RemoteFailureKind};
use leadops_engine::{
    write_leads_csv, EngineEvent, EngineHandle, EventSink, FailureKind, GatewayError,
};
use leadops_logging::{leadops_debug, leadops_error, leadops_info};

use super::app::AppEvent;
use super::config::ConsoleConfig;
use super::persistence;

/// Executes effects: engine calls go to the engine thread, persistence and
/// export happen inline in effect order.
pub struct EffectRunner {
    engine: EngineHandle,
    state_dir: PathBuf,
    export_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(config: &ConsoleConfig, events: mpsc::Sender<AppEvent>) -> anyhow::Result<Self> {
        let sink = Arc::new(MsgSink { events });
        let engine = EngineHandle::new(config.engine_config(), sink)
            .with_context(|| format!("cannot reach gateway at {}", config.api_url))?;
        Ok(Self {
            engine,
            state_dir: config.state_dir.clone(),
            export_dir: config.export_dir.clone(),
        })
    }

    /// Runs `effects` in order and returns lines to show the operator.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut notes = Vec::new();
        for effect in effects {
            match effect {
                Effect::CreateJob {
                    keywords,
                    locations,
                } => {
                    leadops_info!(
                        "CreateJob keywords={:?} locations={:?}",
                        keywords,
                        locations
                    );
                    self.engine.create_job(keywords, locations);
                }
                Effect::FetchJobStatus { task_id } => self.engine.fetch_job_status(task_id),
                Effect::StartPolling { task_id } => self.engine.start_polling(task_id),
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::PersistTaskId(task_id) => {
                    persistence::save_active_task(&self.state_dir, &task_id)
                }
                Effect::ClearTaskId => persistence::clear_active_task(&self.state_dir),
                Effect::FetchLeads { request, timing } => {
                    leadops_debug!(
                        "FetchLeads generation={} page={} timing={:?}",
                        request.generation,
                        request.query.page,
                        timing
                    );
                    self.engine
                        .fetch_leads(request, timing == FetchTiming::Debounced);
                }
                Effect::FetchKeywords => self.engine.fetch_keywords(),
                Effect::FetchStats => self.engine.fetch_stats(),
                Effect::RequestConfirmation { prompt } => {
                    leadops_debug!("Awaiting confirmation: {}", prompt);
                }
                Effect::DeleteLead { id } => {
                    leadops_info!("DeleteLead id={}", id);
                    self.engine.delete_lead(id);
                }
                Effect::BulkDelete { ids } => {
                    leadops_info!("BulkDelete count={}", ids.len());
                    self.engine.bulk_delete(ids);
                }
                Effect::ExportLeads { leads } => notes.push(self.export(&leads)),
            }
        }
        notes
    }

    fn export(&self, leads: &[Lead]) -> String {
        let filename = export_filename(Local::now());
        match write_leads_csv(&self.export_dir, &filename, leads) {
            Ok(path) => {
                leadops_info!("Exported {} leads to {:?}", leads.len(), path);
                format!("Exported {} leads to {}", leads.len(), path.display())
            }
            Err(err) => {
                leadops_error!("Export to {:?} failed: {}", self.export_dir, err);
                format!("Export failed: {err}")
            }
        }
    }
}

fn export_filename(now: chrono::DateTime<Local>) -> String {
    format!("scraping_leads_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

struct MsgSink {
    events: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(AppEvent::Msg(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobCreated(result) => Msg::JobCreated(result.map_err(map_failure)),
        EngineEvent::JobStatus { task_id, result } => Msg::JobStatusReceived {
            task_id,
            result: result.map_err(map_failure),
        },
        EngineEvent::PollTick { task_id } => Msg::PollTick { task_id },
        EngineEvent::LeadsLoaded { generation, result } => Msg::LeadsLoaded {
            generation,
            result: result.map_err(map_failure),
        },
        EngineEvent::KeywordsLoaded(result) => Msg::KeywordsLoaded(result.map_err(map_failure)),
        EngineEvent::StatsLoaded(result) => Msg::StatsLoaded(result.map_err(map_failure)),
        EngineEvent::LeadDeleted { id, result } => Msg::LeadDeleted {
            id,
            result: result.map_err(map_failure),
        },
        EngineEvent::LeadsBulkDeleted { ids, result } => Msg::LeadsBulkDeleted {
            ids,
            result: result.map_err(map_failure),
        },
    }
}

fn map_failure(err: GatewayError) -> RemoteFailure {
    let kind = match err.kind {
        FailureKind::NotFound => RemoteFailureKind::NotFound,
        FailureKind::Malformed => RemoteFailureKind::Malformed,
        _ if err.is_transient() => RemoteFailureKind::Unavailable,
        _ => RemoteFailureKind::Rejected,
    };
    RemoteFailure::new(kind, err.to_string())
}
