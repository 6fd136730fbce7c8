//! Configuration management for the Meridian exports service.
//!
//! Configuration is loaded from multiple sources in order: built-in
//! defaults, optional config files (`config/meridian-exports`,
//! `config/meridian`, or a file given on the command line), and
//! `MERIDIAN__*` environment variables. Values are validated at load time.

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Scheduler loop configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Export defaults and limits.
    #[serde(default)]
    pub exports: ExportsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            scheduler: SchedulerConfig::default(),
            exports: ExportsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and config files.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with_file(None)
    }

    /// Load configuration with an optional explicit config file path, as
    /// given on the command line. The explicit file layers between the
    /// default config files and the environment.
    pub fn load_with_file(path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("scheduler.tick_secs", 30)?
            .set_default("exports.default_timezone", "UTC")?
            // Add config files if they exist
            .add_source(config::File::with_name("config/meridian-exports").required(false))
            .add_source(config::File::with_name("config/meridian").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let config = builder
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("MERIDIAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize().unwrap_or_default();
        app_config.validate()?;

        Ok(app_config)
    }

    /// Reject values the service cannot run with.
    fn validate(&self) -> anyhow::Result<()> {
        if self.scheduler.tick_secs == 0 {
            anyhow::bail!("scheduler.tick_secs must be at least 1");
        }
        if self.scheduler.run_history_limit == 0 {
            anyhow::bail!("scheduler.run_history_limit must be at least 1");
        }
        if self.exports.max_recipients == 0 {
            anyhow::bail!("exports.max_recipients must be at least 1");
        }
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Main API port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Scheduler loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between due-export checks.
    #[serde(default = "default_tick")]
    pub tick_secs: u64,
    /// Maximum run-history entries returned per export.
    #[serde(default = "default_run_history")]
    pub run_history_limit: usize,
}

fn default_tick() -> u64 {
    30
}

fn default_run_history() -> usize {
    100
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick(),
            run_history_limit: default_run_history(),
        }
    }
}

/// Export defaults and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportsConfig {
    /// Timezone applied when a request does not name one.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// Maximum recipients per scheduled export.
    #[serde(default = "default_max_recipients")]
    pub max_recipients: usize,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_max_recipients() -> usize {
    20
}

impl Default for ExportsConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            max_recipients: default_max_recipients(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to use JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
