// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup configuration for the monitor.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for one monitored device.
///
/// Every field has a default, so a JSON configuration file only needs the
/// values that differ from them.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use espwatch::MonitorConfig;
///
/// let config = MonitorConfig::new("10.0.0.42")
///     .with_port(1502)
///     .with_poll_interval(Duration::from_millis(500));
///
/// assert_eq!(config.port(), 1502);
/// assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    host: String,
    port: u16,
    unit_id: u8,
    poll_interval_ms: u64,
    reconnect_delay_ms: u64,
    connect_timeout_ms: u64,
    read_timeout_ms: u64,
    log_file: PathBuf,
}

impl MonitorConfig {
    /// Default device address (the device's own access point).
    pub const DEFAULT_HOST: &'static str = "192.168.4.1";
    /// Default Modbus/TCP port.
    pub const DEFAULT_PORT: u16 = 502;
    /// Default Modbus unit identifier.
    pub const DEFAULT_UNIT_ID: u8 = 1;
    /// Default delay between successful polls.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
    /// Default delay after any failure.
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);
    /// Default bound on a connection attempt.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
    /// Default bound on a single register read.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);
    /// Default event log path.
    pub const DEFAULT_LOG_FILE: &'static str = "esp32_events.txt";

    /// Creates a configuration for the given host with all other values defaulted.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields keep their defaults. The result is not validated; call
    /// [`validate`](Self::validate) after applying any overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = serde_json::from_str(&contents)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Sets the device host name or IP address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the device port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the Modbus unit identifier.
    #[must_use]
    pub fn with_unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Sets the delay between successful polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_ms(interval);
        self
    }

    /// Sets the delay applied after a failure.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay_ms = duration_ms(delay);
        self
    }

    /// Sets the connection attempt timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = duration_ms(timeout);
        self
    }

    /// Sets the register read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = duration_ms(timeout);
        self
    }

    /// Sets the event log path.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Returns the device host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the device port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the Modbus unit identifier.
    #[must_use]
    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    /// Returns the delay between successful polls.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns the delay applied after a failure.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Returns the connection attempt timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the register read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Returns the event log path.
    #[must_use]
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Checks that the configuration can drive the poll loop.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty host, an empty log path,
    /// or a zero interval, delay or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.log_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "log_file must not be empty".to_string(),
            ));
        }

        let durations = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("reconnect_delay_ms", self.reconnect_delay_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be greater than 0")));
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            unit_id: Self::DEFAULT_UNIT_ID,
            poll_interval_ms: duration_ms(Self::DEFAULT_POLL_INTERVAL),
            reconnect_delay_ms: duration_ms(Self::DEFAULT_RECONNECT_DELAY),
            connect_timeout_ms: duration_ms(Self::DEFAULT_CONNECT_TIMEOUT),
            read_timeout_ms: duration_ms(Self::DEFAULT_READ_TIMEOUT),
            log_file: PathBuf::from(Self::DEFAULT_LOG_FILE),
        }
    }
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = MonitorConfig::default();
        assert_eq!(config.host(), "192.168.4.1");
        assert_eq!(config.port(), 502);
        assert_eq!(config.unit_id(), 1);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.read_timeout(), Duration::from_secs(3));
        assert_eq!(config.log_file(), Path::new("esp32_events.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{ "host": "10.1.2.3", "poll_interval_ms": 250 }"#).unwrap();
        assert_eq!(config.host(), "10.1.2.3");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.port(), 502);
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<MonitorConfig, _> = serde_json::from_str(r#"{ "hots": "x" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "port": 1502, "log_file": "/tmp/events.log" }}"#).unwrap();

        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(config.port(), 1502);
        assert_eq!(config.log_file(), Path::new("/tmp/events.log"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = MonitorConfig::load("/nonexistent/espwatch.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = MonitorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_rejects_zero_durations() {
        let config = MonitorConfig::default().with_reconnect_delay(Duration::ZERO);
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: reconnect_delay_ms must be greater than 0"
        );

        let config = MonitorConfig::default().with_poll_interval(Duration::from_micros(10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_host() {
        assert!(MonitorConfig::new("  ").validate().is_err());
    }
}
