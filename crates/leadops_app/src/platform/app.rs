use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use leadops_core::{update, AppState, Msg};
use leadops_logging::{leadops_info, leadops_warn};

use super::config::ConsoleConfig;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command};
use super::ui::render::render;
use super::{logging, persistence};

/// Everything the console loop reacts to.
pub(crate) enum AppEvent {
    Msg(Msg),
    Line(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env()?;
    logging::initialize(config.log_destination, config.log_level);
    leadops_info!("Starting console against {}", config.api_url);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(&config, event_tx.clone())?;
    spawn_input_reader(event_tx.clone());

    let mut state = AppState::with_page_size(config.page_size);
    let restored = persistence::load_active_task(&config.state_dir);
    let _ = event_tx.send(AppEvent::Msg(Msg::RestoreMission(restored)));
    let _ = event_tx.send(AppEvent::Msg(Msg::BrowserOpened));

    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "{}", commands::HELP);

    for event in event_rx {
        let msg = match event {
            AppEvent::Msg(msg) => msg,
            AppEvent::Line(line) => match commands::parse(&line, &state.view()) {
                Command::Msg(msg) => msg,
                Command::Help => {
                    let _ = writeln!(stdout, "{}", commands::HELP);
                    continue;
                }
                Command::Redraw => {
                    let _ = write!(stdout, "{}", render(&state.view()));
                    continue;
                }
                Command::Invalid(reason) => {
                    let _ = writeln!(stdout, "{reason}");
                    continue;
                }
                Command::Quit => break,
            },
            AppEvent::InputClosed => break,
        };

        let (next, effects) = update(state, msg);
        state = next;
        let notes = runner.run(effects);
        if state.consume_dirty() {
            let _ = write!(stdout, "{}", render(&state.view()));
        }
        for note in notes {
            let _ = writeln!(stdout, "{note}");
        }
        let _ = stdout.flush();
    }

    leadops_info!("Console closed");
    Ok(())
}

fn spawn_input_reader(events: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    leadops_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });
}
