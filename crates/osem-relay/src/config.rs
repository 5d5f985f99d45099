// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Relay configuration.
//!
//! Loaded once from TOML and validated before the worker starts. Anything
//! wrong here is fatal: the relay never starts with a bad configuration.

use crate::credentials::Credentials;
use crate::mapping::SensorMapping;
use osem_units::group_for_observation;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default OpenSenseMap ingestion endpoint.
pub const DEFAULT_SERVER_URL: &str = "https://ingress.opensensemap.org";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Target box and its credentials.
    pub station: StationConfig,

    /// Upload policy.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Record field -> remote sensor mapping.
    #[serde(default)]
    pub sensors: SensorMapping,
}

/// Target box.
#[derive(Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// OpenSenseMap box id.
    #[serde(alias = "SensorBoxID")]
    pub box_id: String,

    /// Box access token.
    #[serde(alias = "AuthKey")]
    pub auth_key: String,

    /// Upload values in US units instead of metric.
    #[serde(default, alias = "UsUnits")]
    pub us_units: bool,

    /// Ingestion server base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

impl std::fmt::Debug for StationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationConfig")
            .field("box_id", &crate::credentials::redact_identifier(&self.box_id))
            .field("auth_key", &"***")
            .field("us_units", &self.us_units)
            .field("server_url", &self.server_url)
            .finish()
    }
}

/// Upload policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per record.
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,

    /// Wait between attempts (seconds).
    #[serde(default = "default_retry_wait_secs")]
    pub retry_wait_secs: u64,

    /// Post at most once per this many seconds of record time.
    #[serde(default)]
    pub post_interval_secs: Option<u64>,

    /// Drop records older than this many seconds at dequeue time.
    #[serde(default)]
    pub stale_secs: Option<u64>,

    /// Maximum queued records; the oldest is evicted when full.
    #[serde(default = "default_max_backlog")]
    pub max_backlog: usize,

    /// Log successful uploads.
    #[serde(default = "default_true")]
    pub log_success: bool,

    /// Log failed uploads.
    #[serde(default = "default_true")]
    pub log_failure: bool,

    /// Format payloads but never send them.
    #[serde(default)]
    pub skip_upload: bool,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tries() -> u32 {
    3
}

fn default_retry_wait_secs() -> u64 {
    5
}

fn default_max_backlog() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_tries: default_max_tries(),
            retry_wait_secs: default_retry_wait_secs(),
            post_interval_secs: None,
            stale_secs: None,
            max_backlog: default_max_backlog(),
            log_success: true,
            log_failure: true,
            skip_upload: false,
        }
    }
}

impl UploadConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Wait between attempts.
    pub fn retry_wait(&self) -> Duration {
        Duration::from_secs(self.retry_wait_secs)
    }

    /// Minimum record-time spacing between posts.
    pub fn post_interval(&self) -> Option<Duration> {
        self.post_interval_secs.map(Duration::from_secs)
    }

    /// Maximum record age at dequeue time.
    pub fn stale(&self) -> Option<Duration> {
        self.stale_secs.map(Duration::from_secs)
    }
}

impl RelayConfig {
    /// Create a configuration with default upload policy and no sensors.
    pub fn new(box_id: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            station: StationConfig {
                box_id: box_id.into(),
                auth_key: auth_key.into(),
                us_units: false,
                server_url: default_server_url(),
            },
            upload: UploadConfig::default(),
            sensors: SensorMapping::new(),
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Credentials for the configured box.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.station.box_id, &self.station.auth_key)
    }

    /// Validate the configuration.
    ///
    /// Mapped fields without a known unit group, and target units outside
    /// the field's dimension, are only warned about: those fields are
    /// skipped at formatting time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let station = &self.station;
        if station.box_id.trim().is_empty() {
            return Err(ConfigError::Invalid("station.box_id is empty".into()));
        }
        if station.auth_key.trim().is_empty() {
            return Err(ConfigError::Invalid("station.auth_key is empty".into()));
        }
        if HeaderValue::from_str(&station.auth_key).is_err() {
            return Err(ConfigError::Invalid(
                "station.auth_key is not a valid header value".into(),
            ));
        }
        if !(station.server_url.starts_with("http://") || station.server_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "station.server_url must be an http(s) URL, got '{}'",
                station.server_url
            )));
        }

        let upload = &self.upload;
        if upload.max_tries == 0 {
            return Err(ConfigError::Invalid("upload.max_tries must be at least 1".into()));
        }
        if upload.max_backlog == 0 {
            return Err(ConfigError::Invalid(
                "upload.max_backlog must be at least 1".into(),
            ));
        }
        if upload.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "upload.timeout_secs must be at least 1".into(),
            ));
        }

        if self.sensors.is_empty() {
            return Err(ConfigError::Invalid("No sensors configured".into()));
        }

        for (field, spec) in &self.sensors {
            if spec.sensor_id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Sensor '{}' has empty sensor_id",
                    field
                )));
            }

            match group_for_observation(field) {
                None => {
                    tracing::warn!("Sensor '{}' has no known unit group; it will be skipped", field);
                }
                Some(group) => {
                    if let Some(unit) = spec.unit {
                        if unit.dimension() != group.dimension() {
                            tracing::warn!(
                                "Sensor '{}' ({}) cannot be converted to {}; it will be skipped",
                                field,
                                group,
                                unit
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Example configuration written by `osem-relay gen-config`.
    pub fn example() -> Self {
        use crate::mapping::SensorSpec;
        use osem_units::Unit;

        let mut config = Self::new("YOUR_SENSEBOX_ID", "YOUR_SENSEBOX_ACCESS_TOKEN");
        config.upload.post_interval_secs = Some(300);
        config.upload.stale_secs = Some(1800);
        config.sensors = SensorMapping::new()
            .with(
                "outTemp",
                SensorSpec::new("TEMPERATURE_SENSOR_ID").with_unit(Unit::DegreeC),
            )
            .with("outHumidity", SensorSpec::new("HUMIDITY_SENSOR_ID"))
            .with(
                "barometer",
                SensorSpec::new("PRESSURE_SENSOR_ID").with_unit(Unit::HPa),
            )
            .with(
                "windSpeed",
                SensorSpec::new("WIND_SPEED_SENSOR_ID").with_unit(Unit::KmPerHour),
            );
        config
    }
}
