//! Server configuration management with validation

use crate::error::{RecError, RecResult};
use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::net::lookup_host;
use tracing::info;
use validator::{Validate, ValidationError};

/// Environment variable prefix, nested keys are separated by `__`
pub const ENV_PREFIX: &str = "CONTENTREC_";

/// Main server configuration with validation
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(nested)]
    pub server: ServerSettings,

    #[validate(nested)]
    pub model: ModelConfig,

    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Server-level settings with validation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,

    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            cors: false,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind. `host` may be an IPv4 or IPv6 literal or a
    /// hostname; the first resolved address wins.
    pub async fn resolve_addr(&self) -> RecResult<SocketAddr> {
        let invalid = |reason: String| {
            RecError::configuration(format!(
                "Invalid bind address {}:{}: {reason}",
                self.host, self.port
            ))
        };
        lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no addresses resolved".to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Shape and seeding of the preference matrix and scoring network
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_model_config"))]
pub struct ModelConfig {
    /// Rows of the preference matrix
    #[validate(range(min = 1))]
    pub num_users: usize,

    /// Columns of the preference matrix, also the network's input and output width
    #[validate(range(min = 1))]
    pub num_items: usize,

    /// Number of recommendations returned per request
    #[validate(range(min = 1))]
    pub top_k: usize,

    /// Seed for the matrix and the weight initialization
    pub seed: u64,

    /// Widths of the hidden layers between input and output
    #[validate(custom(function = "validate_hidden_layers"))]
    pub hidden_layers: Vec<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_users: 10,
            num_items: 20,
            top_k: 3,
            seed: 42,
            hidden_layers: vec![64, 32],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    #[validate(length(min = 1))]
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
    Compact,
}

fn validate_model_config(model: &ModelConfig) -> Result<(), ValidationError> {
    if model.top_k > model.num_items {
        return Err(ValidationError::new("top_k_exceeds_num_items"));
    }
    Ok(())
}

fn validate_hidden_layers(layers: &Vec<usize>) -> Result<(), ValidationError> {
    if layers.iter().any(|&width| width == 0) {
        return Err(ValidationError::new("zero_width_hidden_layer"));
    }
    Ok(())
}

impl ServerConfig {
    /// Load configuration from the default locations (TOML, YAML, env vars)
    pub fn load() -> RecResult<Self> {
        let figment = Self::base_figment()
            .merge(Toml::file("contentrec.toml"))
            .merge(Yaml::file("contentrec.yaml"))
            .merge(Yaml::file("contentrec.yml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment, "default locations")
    }

    /// Load configuration from a specific file, env vars still take precedence
    pub fn from_file<P: AsRef<Path>>(path: P) -> RecResult<Self> {
        let path = path.as_ref();
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::base_figment().merge(Toml::file(path)),
            Some("yaml") | Some("yml") => Self::base_figment().merge(Yaml::file(path)),
            _ => {
                return Err(RecError::configuration(format!(
                    "Unsupported configuration file format: {:?}",
                    path
                )));
            }
        };

        if !path.exists() {
            return Err(RecError::configuration(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let config = Self::extract(
            figment.merge(Env::prefixed(ENV_PREFIX).split("__")),
            &format!("{:?}", path),
        )?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Validate and return self
    pub fn validated(self) -> RecResult<Self> {
        self.validate()
            .map_err(|e| RecError::validation(format!("Configuration validation failed: {e}")))?;
        Ok(self)
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(ServerConfig::default()))
    }

    fn extract(figment: Figment, source: &str) -> RecResult<Self> {
        let config: Self = figment.extract().map_err(|e| {
            RecError::configuration(format!(
                "Failed to load configuration from {source}: {e}"
            ))
        })?;
        config.validated()
    }
}
