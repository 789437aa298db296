//! Terminal front end: configuration, logging, persistence, effect execution
//! and the console loop.
mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
