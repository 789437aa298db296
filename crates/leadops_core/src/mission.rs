//! Mission controller: at most one tracked scrape job per session.
//!
//! The phase only leaves `Active` through dismissal (terminal jobs), a stale
//! reference, or a newer launch once the current job is terminal. Polling is
//! requested only while the active job is running, and at most one status read
//! is outstanding at a time.

use leadops_logging::{leadops_error, leadops_info, leadops_warn};

use crate::{
    AppState, ConsoleError, Effect, Job, Msg, RemoteFailure, RemoteFailureKind, TaskId,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MissionPhase {
    #[default]
    Idle,
    /// Persisted task id found at startup; waiting for its first status.
    Resuming(TaskId),
    /// Creation request outstanding. `previous` is the finished job being
    /// replaced; it comes back if the creation fails.
    Submitting { previous: Option<Job> },
    Active(Job),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MissionState {
    keywords: Vec<String>,
    locations: Vec<String>,
    phase: MissionPhase,
    polling: bool,
    poll_in_flight: bool,
}

impl MissionState {
    pub fn phase(&self) -> &MissionPhase {
        &self.phase
    }

    pub fn job(&self) -> Option<&Job> {
        match &self.phase {
            MissionPhase::Active(job) => Some(job),
            _ => None,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn can_launch(&self) -> bool {
        match &self.phase {
            MissionPhase::Idle => true,
            MissionPhase::Active(job) => !job.is_running(),
            MissionPhase::Resuming(_) | MissionPhase::Submitting { .. } => false,
        }
    }

    pub fn can_dismiss(&self) -> bool {
        self.job().is_some_and(|job| !job.is_running())
    }

    fn active_task_id(&self) -> Option<&TaskId> {
        self.job().map(|job| &job.task_id)
    }

    /// Installs a fresh job snapshot and returns the polling effect it needs.
    fn track(&mut self, job: Job) -> Option<Effect> {
        let running = job.is_running();
        let task_id = job.task_id.clone();
        self.phase = MissionPhase::Active(job);
        self.poll_in_flight = false;
        if running {
            self.polling = true;
            Some(Effect::StartPolling { task_id })
        } else {
            self.polling = false;
            None
        }
    }

    fn forget(&mut self) {
        self.phase = MissionPhase::Idle;
        self.polling = false;
        self.poll_in_flight = false;
    }
}

pub(crate) fn update_mission(state: &mut AppState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::KeywordEntered(raw) => {
            push_trimmed(&mut state.mission.keywords, &raw, &mut state.dirty);
            Vec::new()
        }
        Msg::KeywordRemoved(index) => {
            remove_at(&mut state.mission.keywords, index, &mut state.dirty);
            Vec::new()
        }
        Msg::LocationEntered(raw) => {
            push_trimmed(&mut state.mission.locations, &raw, &mut state.dirty);
            Vec::new()
        }
        Msg::LocationRemoved(index) => {
            remove_at(&mut state.mission.locations, index, &mut state.dirty);
            Vec::new()
        }
        Msg::LaunchClicked => launch(state),
        Msg::RestoreMission(task_id) => restore(state, task_id),
        Msg::JobCreated(result) => job_created(state, result),
        Msg::PollTick { task_id } => poll_tick(state, task_id),
        Msg::JobStatusReceived { task_id, result } => status_received(state, task_id, result),
        Msg::DismissClicked => dismiss(state),
        _ => Vec::new(),
    }
}

fn push_trimmed(list: &mut Vec<String>, raw: &str, dirty: &mut bool) {
    let value = raw.trim();
    if !value.is_empty() {
        list.push(value.to_string());
        *dirty = true;
    }
}

fn remove_at(list: &mut Vec<String>, index: usize, dirty: &mut bool) {
    if index < list.len() {
        list.remove(index);
        *dirty = true;
    }
}

fn launch(state: &mut AppState) -> Vec<Effect> {
    let mission = &mut state.mission;
    if mission.keywords.is_empty() || mission.locations.is_empty() {
        state.set_notice(ConsoleError::Validation(
            "add at least one keyword and one location".to_string(),
        ));
        return Vec::new();
    }
    if !mission.can_launch() {
        leadops_warn!("Launch ignored: a mission is already in progress");
        return Vec::new();
    }

    leadops_info!(
        "Launching mission keywords={} locations={}",
        mission.keywords.len(),
        mission.locations.len()
    );
    let effects = vec![Effect::CreateJob {
        keywords: mission.keywords.clone(),
        locations: mission.locations.clone(),
    }];
    let previous = match std::mem::take(&mut mission.phase) {
        MissionPhase::Active(job) => Some(job),
        _ => None,
    };
    mission.phase = MissionPhase::Submitting { previous };
    state.clear_notice();
    state.dirty = true;
    effects
}

fn restore(state: &mut AppState, task_id: Option<TaskId>) -> Vec<Effect> {
    let Some(task_id) = task_id else {
        return Vec::new();
    };
    if state.mission.phase != MissionPhase::Idle {
        return Vec::new();
    }
    leadops_info!("Resuming persisted mission {}", task_id);
    state.mission.phase = MissionPhase::Resuming(task_id.clone());
    state.dirty = true;
    vec![Effect::FetchJobStatus { task_id }]
}

fn job_created(state: &mut AppState, result: Result<Job, RemoteFailure>) -> Vec<Effect> {
    let previous = match &mut state.mission.phase {
        MissionPhase::Submitting { previous } => previous.take(),
        _ => return Vec::new(),
    };
    state.dirty = true;
    match result {
        Ok(job) => {
            leadops_info!("Mission {} created status={}", job.task_id, job.status.as_str());
            // Persist before anything else so a reload can resume the job.
            let mut effects = vec![Effect::PersistTaskId(job.task_id.clone())];
            effects.extend(state.mission.track(job));
            effects
        }
        Err(failure) => {
            leadops_warn!("Mission launch failed: {}", failure.message);
            state.mission.phase = match previous {
                Some(job) => MissionPhase::Active(job),
                None => MissionPhase::Idle,
            };
            state.set_notice(ConsoleError::mutation("launching the mission", &failure));
            Vec::new()
        }
    }
}

fn poll_tick(state: &mut AppState, task_id: TaskId) -> Vec<Effect> {
    let mission = &mut state.mission;
    let is_current = mission.active_task_id() == Some(&task_id);
    if !is_current || !mission.polling || mission.poll_in_flight {
        return Vec::new();
    }
    mission.poll_in_flight = true;
    vec![Effect::FetchJobStatus { task_id }]
}

fn status_received(
    state: &mut AppState,
    task_id: TaskId,
    result: Result<Job, RemoteFailure>,
) -> Vec<Effect> {
    let resuming = match &state.mission.phase {
        MissionPhase::Resuming(pending) if *pending == task_id => true,
        MissionPhase::Active(job) if job.task_id == task_id => false,
        // Answer for a job we no longer track.
        _ => return Vec::new(),
    };
    if resuming {
        resumed(state, task_id, result)
    } else {
        polled(state, task_id, result)
    }
}

fn resumed(
    state: &mut AppState,
    task_id: TaskId,
    result: Result<Job, RemoteFailure>,
) -> Vec<Effect> {
    state.dirty = true;
    match result {
        Ok(job) => state.mission.track(job).into_iter().collect(),
        Err(failure) => {
            leadops_info!(
                "Discarding persisted mission: {} ({})",
                ConsoleError::StaleReference(task_id),
                failure.message
            );
            state.mission.forget();
            vec![Effect::ClearTaskId]
        }
    }
}

fn polled(state: &mut AppState, task_id: TaskId, result: Result<Job, RemoteFailure>) -> Vec<Effect> {
    state.mission.poll_in_flight = false;
    match result {
        Ok(job) => {
            state.dirty = true;
            let terminal = !job.is_running();
            state.mission.phase = MissionPhase::Active(job);
            if terminal && state.mission.polling {
                leadops_info!("Mission {} reached a terminal status", task_id);
                state.mission.polling = false;
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Err(failure) if failure.kind == RemoteFailureKind::NotFound => {
            leadops_info!("{}", ConsoleError::StaleReference(task_id));
            state.dirty = true;
            state.mission.forget();
            vec![Effect::StopPolling, Effect::ClearTaskId]
        }
        Err(failure) => {
            leadops_warn!(
                "Poll for {} failed: {}",
                task_id,
                ConsoleError::TransientGateway(failure.message)
            );
            Vec::new()
        }
    }
}

fn dismiss(state: &mut AppState) -> Vec<Effect> {
    let running = state
        .mission
        .job()
        .map(|job| (job.is_running(), job.task_id.clone()));
    match running {
        None => Vec::new(),
        Some((true, task_id)) => {
            leadops_error!("Dismiss requested while mission {} is running", task_id);
            state.set_notice(ConsoleError::DismissWhileRunning);
            Vec::new()
        }
        Some((false, _)) => {
            state.mission.forget();
            state.dirty = true;
            vec![Effect::StopPolling, Effect::ClearTaskId]
        }
    }
}
