//! Layered configuration.
//!
//! Settings are resolved from, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config`)
//! 3. `VOIPWATCH_*` environment variables (`__` separates nested keys,
//!    e.g. `VOIPWATCH_CALLS__INTERVAL_MS=1000`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! backend_url = "http://localhost:8000"
//! request_timeout_ms = 5000
//! table_rows = 5
//!
//! [calls]
//! path = "/calls"
//! interval_ms = 3000
//!
//! [qos]
//! path = "/qos"
//! interval_ms = 5000
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::source::DEFAULT_TIMEOUT;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "VOIPWATCH";

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend, without a trailing path.
    pub backend_url: String,

    /// Client-side timeout applied to every request.
    pub request_timeout_ms: u64,

    /// Number of call log rows shown in the table.
    pub table_rows: usize,

    /// Call log endpoint.
    pub calls: EndpointSettings,

    /// QoS metrics endpoint.
    pub qos: EndpointSettings,
}

/// Path and polling interval for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSettings {
    pub path: String,
    pub interval_ms: u64,
}

impl EndpointSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            table_rows: 5,
            calls: EndpointSettings {
                path: "/calls".to_string(),
                interval_ms: 3000,
            },
            qos: EndpointSettings {
                path: "/qos".to_string(),
                interval_ms: 5000,
            },
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(config_path, env_source())
    }

    fn load_with_env(
        config_path: Option<&Path>,
        env: Environment,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the dashboard cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.backend_url.trim().is_empty() {
            return Err(SettingsError::Invalid("backend_url must not be empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        if self.table_rows == 0 {
            return Err(SettingsError::Invalid("table_rows must be positive".to_string()));
        }
        for (name, endpoint) in [("calls", &self.calls), ("qos", &self.qos)] {
            if endpoint.interval_ms == 0 {
                return Err(SettingsError::Invalid(format!(
                    "{}.interval_ms must be positive",
                    name
                )));
            }
            if !endpoint.path.starts_with('/') {
                return Err(SettingsError::Invalid(format!(
                    "{}.path must start with '/'",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
