use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use leadops_core::DEFAULT_PAGE_SIZE;
use leadops_engine::{EngineConfig, GatewaySettings};
use log::LevelFilter;

use super::logging::LogDestination;

/// Settings read from `LEADOPS_*` environment variables at startup.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub export_dir: PathBuf,
    pub page_size: u32,
    pub poll_interval: Duration,
    pub debounce: Duration,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            api_url: engine.gateway.base_url,
            state_dir: PathBuf::from("."),
            export_dir: PathBuf::from("exports"),
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: engine.poll_interval,
            debounce: engine.debounce,
            log_destination: LogDestination::File,
            log_level: LevelFilter::Info,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = read("LEADOPS_API_URL") {
            config.api_url = url;
        }
        if let Some(dir) = read("LEADOPS_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }
        if let Some(dir) = read("LEADOPS_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(raw) = read("LEADOPS_PAGE_SIZE") {
            let size: u32 = raw
                .parse()
                .with_context(|| format!("LEADOPS_PAGE_SIZE is not a number: {raw}"))?;
            if size == 0 {
                bail!("LEADOPS_PAGE_SIZE must be at least 1");
            }
            config.page_size = size;
        }
        if let Some(raw) = read("LEADOPS_POLL_MS") {
            config.poll_interval = parse_millis("LEADOPS_POLL_MS", &raw)?;
            if config.poll_interval.is_zero() {
                bail!("LEADOPS_POLL_MS must be at least 1");
            }
        }
        if let Some(raw) = read("LEADOPS_DEBOUNCE_MS") {
            config.debounce = parse_millis("LEADOPS_DEBOUNCE_MS", &raw)?;
        }
        if let Some(raw) = read("LEADOPS_LOG") {
            config.log_destination = LogDestination::parse(&raw)
                .with_context(|| format!("LEADOPS_LOG must be file, terminal or both: {raw}"))?;
        }
        if let Some(raw) = read("LEADOPS_LOG_LEVEL") {
            config.log_level = leadops_logging::parse_level(&raw);
        }
        Ok(config)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            gateway: GatewaySettings {
                base_url: self.api_url.clone(),
                ..GatewaySettings::default()
            },
            poll_interval: self.poll_interval,
            debounce: self.debounce,
        }
    }
}

fn parse_millis(key: &str, raw: &str) -> anyhow::Result<Duration> {
    let millis: u64 = raw
        .parse()
        .with_context(|| format!("{key} is not a number of milliseconds: {raw}"))?;
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_console_timings() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.poll_interval, Duration::from_millis(3000));
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("LEADOPS_API_URL", "http://scraper.local:9000"),
            ("LEADOPS_PAGE_SIZE", "50"),
            ("LEADOPS_POLL_MS", "1000"),
            ("LEADOPS_DEBOUNCE_MS", "0"),
            ("LEADOPS_EXPORT_DIR", "/tmp/exports"),
            ("LEADOPS_LOG", "both"),
            ("LEADOPS_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.page_size, 50);
        assert_eq!(config.debounce, Duration::ZERO);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.log_level, LevelFilter::Debug);
        let engine = config.engine_config();
        assert_eq!(engine.gateway.base_url, "http://scraper.local:9000");
        assert_eq!(engine.poll_interval, Duration::from_millis(1000));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[("LEADOPS_PAGE_SIZE", "  ")])).unwrap();
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(ConsoleConfig::from_lookup(lookup(&[("LEADOPS_PAGE_SIZE", "0")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[("LEADOPS_POLL_MS", "soon")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[("LEADOPS_LOG", "syslog")])).is_err());
    }
}
