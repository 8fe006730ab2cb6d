//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::fmt;
use std::str::FromStr;
use tally_core::{OriginPolicy, ReportSchedule, ReportTemplate, TargetEmojiSet};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub instance: InstanceConfig,
    pub tally: TallyConfig,
    pub report: ReportConfig,
    pub transport: TransportConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue("APP_ENV", s.to_string())),
        }
    }
}

/// Server the agent watches and posts to
#[derive(Clone)]
pub struct InstanceConfig {
    /// Host name, optionally with `:port`
    pub domain: String,
    /// Access token used for streaming and note creation
    pub token: String,
    /// Use `wss`/`https` (true) or `ws`/`http` (false)
    pub secure: bool,
}

impl InstanceConfig {
    /// Streaming endpoint with the token in the query string
    #[must_use]
    pub fn streaming_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}/streaming?i={}", self.domain, self.token)
    }

    /// Note creation endpoint
    #[must_use]
    pub fn notes_create_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/api/notes/create", self.domain)
    }
}

impl fmt::Debug for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceConfig")
            .field("domain", &self.domain)
            .field("token", &"<redacted>")
            .field("secure", &self.secure)
            .finish()
    }
}

/// Which reactions are counted
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub target_emojis: TargetEmojiSet,
    /// Count reactions whose emoji comes from other servers too
    pub count_all_origins: bool,
}

impl TallyConfig {
    #[must_use]
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::from_count_all(self.count_all_origins)
    }
}

/// Report cadence and text
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    pub schedule: ReportSchedule,
    pub template: ReportTemplate,
}

/// Stream transport settings
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub reconnect_delay_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "reaction-tally".to_string()
}

fn default_report_interval_secs() -> i64 {
    3600
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(var, other.to_string())),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let target_list = required("TARGET_EMOJIS")?;
        let target_emojis = TargetEmojiSet::parse(&target_list)
            .map_err(|e| ConfigError::InvalidValue("TARGET_EMOJIS", e.to_string()))?;

        let interval = match lookup("REPORT_INTERVAL_SECS") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REPORT_INTERVAL_SECS", s.clone()))?,
            None => default_report_interval_secs(),
        };
        let schedule = ReportSchedule::new(interval)
            .map_err(|e| ConfigError::InvalidValue("REPORT_INTERVAL_SECS", e.to_string()))?;

        let template = match lookup("REPORT_TEMPLATE") {
            // `.env` files cannot hold a literal newline in every dialect
            Some(s) => ReportTemplate::new(s.replace("\\n", "\n"))
                .map_err(|e| ConfigError::InvalidValue("REPORT_TEMPLATE", e.to_string()))?,
            None => ReportTemplate::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .map(|s| s.parse())
                    .transpose()?
                    .unwrap_or_default(),
            },
            instance: InstanceConfig {
                domain: required("INSTANCE_DOMAIN")?.trim().to_string(),
                token: required("TOKEN")?.trim().to_string(),
                secure: lookup("INSTANCE_SECURE")
                    .map(|s| parse_bool("INSTANCE_SECURE", &s))
                    .transpose()?
                    .unwrap_or(true),
            },
            tally: TallyConfig {
                target_emojis,
                count_all_origins: lookup("COUNT_ALL_ORIGINS")
                    .map(|s| parse_bool("COUNT_ALL_ORIGINS", &s))
                    .transpose()?
                    .unwrap_or(true),
            },
            report: ReportConfig { schedule, template },
            transport: TransportConfig {
                reconnect_delay_ms: match lookup("RECONNECT_DELAY_MS") {
                    Some(s) => s
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("RECONNECT_DELAY_MS", s.clone()))?,
                    None => default_reconnect_delay_ms(),
                },
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
