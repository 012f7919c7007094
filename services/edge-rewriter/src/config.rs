use serde::Deserialize;

/// Configuration for the edge rewriter
///
/// Edge-replicated functions receive no environment variables, so the deployed
/// handler reads `config/edge-rewriter.toml` bundled beside the binary.
/// Environment overrides only matter for local runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name for logging
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_service_name() -> String {
    "edge-rewriter".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the bundled file and the process environment
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(None)
    }

    /// Load configuration, reading environment variables from `env` when given
    pub fn from_env(env: Option<config::Map<String, String>>) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::File::with_name("config/edge-rewriter")
                    .required(false)
            )
            // EDGE_REWRITER__SERVICE__LOG_LEVEL -> service.log_level
            .add_source(
                config::Environment::with_prefix("EDGE_REWRITER")
                    .separator("__")
                    .source(env)
            )
            .build()?;

        config.try_deserialize().map_err(Into::into)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}
