use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use leadops_core::{LeadId, LeadRequest, TaskId};
use leadops_logging::{leadops_error, leadops_info};
use tokio::runtime::Handle;

use crate::gateway::{Gateway, GatewaySettings, ReqwestGateway};
use crate::schedule::{Debouncer, PollTimer, TimerHandle};
use crate::{EngineEvent, GatewayError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub gateway: GatewaySettings,
    pub poll_interval: Duration,
    /// Quiet period for debounced lead fetches.
    pub debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            poll_interval: Duration::from_millis(3000),
            debounce: Duration::from_millis(500),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    CreateJob {
        keywords: Vec<String>,
        locations: Vec<String>,
    },
    FetchJobStatus {
        task_id: TaskId,
    },
    StartPolling {
        task_id: TaskId,
    },
    StopPolling,
    FetchLeads {
        request: LeadRequest,
        debounced: bool,
    },
    FetchKeywords,
    FetchStats,
    DeleteLead {
        id: LeadId,
    },
    BulkDelete {
        ids: Vec<LeadId>,
    },
}

/// Owns the engine thread. Dropping the handle stops the thread, which shuts
/// its runtime down and with it every timer and pending fetch.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Result<Self, GatewayError> {
        let gateway = Arc::new(ReqwestGateway::new(config.gateway.clone())?);
        Ok(Self::with_gateway(config, gateway, sink))
    }

    pub fn with_gateway(
        config: EngineConfig,
        gateway: Arc<dyn Gateway>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    leadops_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut worker = Worker::new(runtime.handle().clone(), config, gateway, sink);
            while let Ok(command) = cmd_rx.recv() {
                worker.handle(command);
            }
            drop(worker);
            leadops_info!("Engine stopped");
        });

        Self { cmd_tx }
    }

    pub fn create_job(&self, keywords: Vec<String>, locations: Vec<String>) {
        self.send(EngineCommand::CreateJob {
            keywords,
            locations,
        });
    }

    pub fn fetch_job_status(&self, task_id: TaskId) {
        self.send(EngineCommand::FetchJobStatus { task_id });
    }

    /// Starts ticking for `task_id`, replacing any running poll timer.
    pub fn start_polling(&self, task_id: TaskId) {
        self.send(EngineCommand::StartPolling { task_id });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    /// Every lead fetch supersedes a still-pending debounced one.
    pub fn fetch_leads(&self, request: LeadRequest, debounced: bool) {
        self.send(EngineCommand::FetchLeads { request, debounced });
    }

    pub fn fetch_keywords(&self) {
        self.send(EngineCommand::FetchKeywords);
    }

    pub fn fetch_stats(&self) {
        self.send(EngineCommand::FetchStats);
    }

    pub fn delete_lead(&self, id: LeadId) {
        self.send(EngineCommand::DeleteLead { id });
    }

    pub fn bulk_delete(&self, ids: Vec<LeadId>) {
        self.send(EngineCommand::BulkDelete { ids });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            leadops_error!("Engine thread is gone; command dropped");
        }
    }
}

struct Worker {
    runtime: Handle,
    config: EngineConfig,
    gateway: Arc<dyn Gateway>,
    sink: Arc<dyn EventSink>,
    poll_timer: Option<TimerHandle>,
    debouncer: Debouncer,
}

impl Worker {
    fn new(
        runtime: Handle,
        config: EngineConfig,
        gateway: Arc<dyn Gateway>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            debouncer: Debouncer::new(runtime.clone()),
            runtime,
            config,
            gateway,
            sink,
            poll_timer: None,
        }
    }

    fn handle(&mut self, command: EngineCommand) {
        let gateway = self.gateway.clone();
        let sink = self.sink.clone();
        match command {
            EngineCommand::CreateJob {
                keywords,
                locations,
            } => {
                self.runtime.spawn(async move {
                    let result = gateway.create_job(&keywords, &locations).await;
                    sink.emit(EngineEvent::JobCreated(result));
                });
            }
            EngineCommand::FetchJobStatus { task_id } => {
                self.runtime.spawn(async move {
                    let result = gateway.job_status(&task_id).await;
                    sink.emit(EngineEvent::JobStatus { task_id, result });
                });
            }
            EngineCommand::StartPolling { task_id } => {
                leadops_info!(
                    "Polling {} every {:?}",
                    task_id,
                    self.config.poll_interval
                );
                // Replacing the handle cancels the previous timer.
                self.poll_timer = Some(PollTimer::start(
                    &self.runtime,
                    self.config.poll_interval,
                    move || {
                        sink.emit(EngineEvent::PollTick {
                            task_id: task_id.clone(),
                        })
                    },
                ));
            }
            EngineCommand::StopPolling => {
                if self.poll_timer.take().is_some() {
                    leadops_info!("Polling stopped");
                }
            }
            EngineCommand::FetchLeads { request, debounced } => {
                let delay = if debounced {
                    self.config.debounce
                } else {
                    Duration::ZERO
                };
                self.debouncer.schedule(delay, async move {
                    let result = gateway.list_leads(&request.query).await;
                    sink.emit(EngineEvent::LeadsLoaded {
                        generation: request.generation,
                        result,
                    });
                });
            }
            EngineCommand::FetchKeywords => {
                self.runtime.spawn(async move {
                    sink.emit(EngineEvent::KeywordsLoaded(gateway.list_keywords().await));
                });
            }
            EngineCommand::FetchStats => {
                self.runtime.spawn(async move {
                    sink.emit(EngineEvent::StatsLoaded(gateway.stats().await));
                });
            }
            EngineCommand::DeleteLead { id } => {
                self.runtime.spawn(async move {
                    let result = gateway.delete_lead(&id).await;
                    sink.emit(EngineEvent::LeadDeleted { id, result });
                });
            }
            EngineCommand::BulkDelete { ids } => {
                self.runtime.spawn(async move {
                    let result = gateway.bulk_delete(&ids).await;
                    sink.emit(EngineEvent::LeadsBulkDeleted { ids, result });
                });
            }
        }
    }
}
