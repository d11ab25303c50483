use std::time::Duration;

use lte_core::DEFAULT_TAB_STOP;

const TAB_STOP_VAR: &str = "LTE_TAB_STOP";
const QUIT_TIMES_VAR: &str = "LTE_QUIT_TIMES";
const MESSAGE_TIMEOUT_VAR: &str = "LTE_MESSAGE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tab_stop: usize,
    /// Extra Ctrl-Q presses needed to quit with unsaved changes.
    pub quit_times: u32,
    pub message_timeout: Duration,
    /// How long a single terminal read waits before giving up.
    pub input_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: 3,
            message_timeout: Duration::from_secs(5),
            input_timeout: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Defaults overridden by `LTE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(TAB_STOP_VAR) {
            match value.trim().parse() {
                Ok(tab_stop) => config.tab_stop = tab_stop,
                Err(e) => log::warn!("Ignoring {}={:?}: {}", TAB_STOP_VAR, value, e),
            }
        }
        if let Some(value) = lookup(QUIT_TIMES_VAR) {
            match value.trim().parse() {
                Ok(times) => config.quit_times = times,
                Err(e) => log::warn!("Ignoring {}={:?}: {}", QUIT_TIMES_VAR, value, e),
            }
        }
        if let Some(value) = lookup(MESSAGE_TIMEOUT_VAR) {
            match value.trim().parse() {
                Ok(secs) => config.message_timeout = Duration::from_secs(secs),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", MESSAGE_TIMEOUT_VAR, value, e),
            }
        }

        config.validate();
        config
    }

    /// Fixes values the editor cannot work with, logging each correction.
    pub fn validate(&mut self) {
        let defaults = Self::default();
        let mut has_issues = false;

        if self.tab_stop == 0 || self.tab_stop > 16 {
            log::warn!("Invalid tab stop: {}, using default", self.tab_stop);
            self.tab_stop = defaults.tab_stop;
            has_issues = true;
        }

        if self.quit_times > 10 {
            log::warn!("Invalid quit confirmation count: {}, using default", self.quit_times);
            self.quit_times = defaults.quit_times;
            has_issues = true;
        }

        if self.message_timeout.is_zero() {
            log::warn!("Message timeout must be positive, using default");
            self.message_timeout = defaults.message_timeout;
            has_issues = true;
        }

        if self.input_timeout.is_zero() {
            self.input_timeout = defaults.input_timeout;
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.quit_times, 3);
        assert_eq!(config.message_timeout, Duration::from_secs(5));
        assert_eq!(config.input_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LTE_TAB_STOP", "4"),
            ("LTE_QUIT_TIMES", "1"),
            ("LTE_MESSAGE_TIMEOUT_SECS", "10"),
        ]));
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 1);
        assert_eq!(config.message_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("LTE_TAB_STOP", "0"),
            ("LTE_QUIT_TIMES", "many"),
            ("LTE_MESSAGE_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config, Config::default());

        let config = Config::from_lookup(lookup(&[("LTE_TAB_STOP", "64")]));
        assert_eq!(config.tab_stop, 8);
    }
}
