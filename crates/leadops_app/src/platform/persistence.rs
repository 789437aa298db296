use std::fs;
use std::path::{Path, PathBuf};

use leadops_core::TaskId;
use leadops_engine::AtomicFileWriter;
use leadops_logging::{leadops_error, leadops_info, leadops_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".leadops_state.ron";

/// The single durable slot: the task id of the mission to resume on startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    active_task_id: Option<String>,
}

pub(crate) fn load_active_task(state_dir: &Path) -> Option<TaskId> {
    let path = state_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            leadops_warn!("Failed to read persisted state from {:?}: {}", path, err);
            return None;
        }
    };

    let state: PersistedState = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            leadops_warn!("Failed to parse persisted state from {:?}: {}", path, err);
            return None;
        }
    };

    let task_id = state
        .active_task_id
        .filter(|id| !id.trim().is_empty())
        .map(TaskId::new);
    if let Some(task_id) = &task_id {
        leadops_info!("Found active task {} in {:?}", task_id, path);
    }
    task_id
}

pub(crate) fn save_active_task(state_dir: &Path, task_id: &TaskId) {
    let state = PersistedState {
        active_task_id: Some(task_id.as_str().to_string()),
    };
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            leadops_error!("Failed to serialize persisted state: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(state_dir));
    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        leadops_error!("Failed to write persisted state to {:?}: {}", state_dir, err);
    }
}

pub(crate) fn clear_active_task(state_dir: &Path) {
    let writer = AtomicFileWriter::new(PathBuf::from(state_dir));
    if let Err(err) = writer.remove(STATE_FILENAME) {
        leadops_error!("Failed to clear persisted state in {:?}: {}", state_dir, err);
    }
}
