use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::adapter::{AGENT_ID_SEED, FACILITY_ID_SEED};
use crate::core::DEFAULT_ESTIMATED_HOURS_PER_FACILITY;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub adapter: AdapterSettings,
    #[serde(default)]
    pub persistence: PersistenceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// Shared secret expected in the X-API-Key request header
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Hours allocated per facility assignment
    #[serde(default = "default_estimated_hours")]
    pub estimated_hours_per_facility: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            estimated_hours_per_facility: default_estimated_hours(),
        }
    }
}

fn default_estimated_hours() -> f64 {
    DEFAULT_ESTIMATED_HOURS_PER_FACILITY
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdapterSettings {
    /// Capacity assumed for Available agents that omit it
    #[serde(default = "default_capacity")]
    pub default_capacity_for_available: f64,
    #[serde(default = "default_agent_seed")]
    pub agent_id_seed: i64,
    #[serde(default = "default_facility_seed")]
    pub facility_id_seed: i64,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            default_capacity_for_available: default_capacity(),
            agent_id_seed: default_agent_seed(),
            facility_id_seed: default_facility_seed(),
        }
    }
}

fn default_capacity() -> f64 {
    40.0
}
fn default_agent_seed() -> i64 {
    AGENT_ID_SEED
}
fn default_facility_seed() -> i64 {
    FACILITY_ID_SEED
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceSettings {
    /// Where the latest assignment plan is written
    #[serde(default = "default_plan_path")]
    pub plan_path: String,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            plan_path: default_plan_path(),
        }
    }
}

fn default_plan_path() -> String {
    "auditplan.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with DISPATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local config file for development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., DISPATCH_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("DISPATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("DISPATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Pull well-known bare environment variables into the config
///
/// Deployments set API_KEY directly (or via an apikey.env file); it wins
/// over anything in the config files.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("API_KEY")
        .or_else(|_| env::var("DISPATCH_AUTH__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("auth.api_key", api_key)?;
    }

    builder.build()
}
