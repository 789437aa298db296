use leadops_logging::leadops_warn;

use crate::browser::update_browser;
use crate::mission::update_mission;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::KeywordEntered(_)
        | Msg::KeywordRemoved(_)
        | Msg::LocationEntered(_)
        | Msg::LocationRemoved(_)
        | Msg::LaunchClicked
        | Msg::RestoreMission(_)
        | Msg::JobCreated(_)
        | Msg::PollTick { .. }
        | Msg::JobStatusReceived { .. }
        | Msg::DismissClicked => update_mission(&mut state, msg),
        Msg::StatsRequested => vec![Effect::FetchStats],
        Msg::StatsLoaded(result) => {
            match result {
                Ok(stats) => {
                    state.stats = Some(stats);
                    state.dirty = true;
                }
                Err(failure) => leadops_warn!("Stats unavailable: {}", failure.message),
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
        msg => update_browser(&mut state, msg),
    };

    (state, effects)
}
