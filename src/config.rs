//! Runtime configuration
//!
//! Layers, lowest precedence first: built-in defaults, `skywatch.toml`
//! (or the file passed with `--config`), `.env`, `SKYWATCH_*` environment
//! variables. CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use config::{Case, Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::state::{DEFAULT_FORECAST_DAYS, FailurePolicy};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// WeatherAPI.com key. Never compiled in.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Days requested from the forecast endpoint
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// What a transport failure in one lookup does to the others
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Location searched on start-up
    #[serde(default)]
    pub location: Option<String>,

    /// Start in dark theme
    #[serde(default)]
    pub dark_mode: bool,

    /// Tracing output file; no logging when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_forecast_days() -> u8 {
    DEFAULT_FORECAST_DAYS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            forecast_days: default_forecast_days(),
            failure_policy: FailurePolicy::default(),
            location: None,
            dark_mode: false,
            log_file: None,
        }
    }
}

/// `SKYWATCH_*` variables. Values stay strings until deserialization, so an
/// all-digit API key is never reinterpreted as a number.
fn environment() -> Environment {
    Environment::with_prefix("SKYWATCH")
        .prefix_separator("_")
        .convert_case(Case::Snake)
}

impl AppConfig {
    /// Load from `path` (required when given) or the optional `skywatch.toml`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("skywatch").required(false),
        };

        Self::from_sources(file, environment())
    }

    fn from_sources(
        file: File<FileSourceFile, FileFormat>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("base_url", default_base_url())?
            .set_default("timeout_secs", default_timeout_secs() as i64)?
            .set_default("forecast_days", i64::from(default_forecast_days()))?
            .add_source(file)
            .add_source(env)
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=14).contains(&self.forecast_days) {
            return Err(ConfigError::Message(format!(
                "forecast_days must be between 1 and 14, got {}",
                self.forecast_days
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Message("timeout_secs must be positive".into()));
        }
        Ok(self)
    }
}
