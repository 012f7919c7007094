use anyhow::bail;
use serde::Deserialize;

/// Deployment binding carrying the public hostname of the distribution
pub const DISTRIBUTION_DOMAIN_VAR: &str = "CLOUDFRONT_DISTRIBUTION_DOMAIN";

/// Main configuration for the metadata sync function
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// S3 configuration
    #[serde(default)]
    pub s3: S3Config,
    /// Metadata sync configuration
    pub sync: SyncConfig,
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

/// S3 client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint URL (for MinIO, LocalStack, etc.)
    pub endpoint_url: Option<String>,
    /// Force path-style access (required for MinIO)
    #[serde(default)]
    pub force_path_style: bool,
}

/// How metadata sidecars are named and what they point at
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Public hostname used to build `_source_uri`, without scheme
    pub distribution_domain: String,
    /// Key prefix under which sidecars are written
    #[serde(default = "default_metadata_prefix")]
    pub metadata_prefix: String,
    /// Suffix appended to the object key to form the sidecar name
    #[serde(default = "default_metadata_suffix")]
    pub metadata_suffix: String,
    /// Ignore events for keys that are themselves sidecars
    #[serde(default = "default_true")]
    pub skip_metadata_keys: bool,
}

// Default value functions
fn default_service_name() -> String {
    "metadata-sync".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_metadata_prefix() -> String {
    "metadata".to_string()
}

fn default_metadata_suffix() -> String {
    ".metadata.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from config files and the process environment
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(None)
    }

    /// Load configuration, reading environment variables from `env` instead of
    /// the process environment when given
    pub fn from_env(env: Option<config::Map<String, String>>) -> anyhow::Result<Self> {
        let distribution_domain = match &env {
            Some(vars) => vars.get(DISTRIBUTION_DOMAIN_VAR).cloned(),
            None => std::env::var(DISTRIBUTION_DOMAIN_VAR).ok(),
        };

        let config = config::Config::builder()
            // Start with default values
            .set_default("service.name", "metadata-sync")?
            .set_default("service.log_level", "info")?
            // Add config file if present
            .add_source(
                config::File::with_name("config/metadata-sync")
                    .required(false)
            )
            .add_source(
                config::File::with_name("/etc/metadata-sync/metadata-sync")
                    .required(false)
            )
            // Override with environment variables
            // METADATA_SYNC__SYNC__METADATA_PREFIX -> sync.metadata_prefix
            .add_source(
                config::Environment::with_prefix("METADATA_SYNC")
                    .separator("__")
                    .try_parsing(true)
                    .source(env)
            )
            // The deployment binding wins over everything else
            .set_override_option("sync.distribution_domain", distribution_domain)?
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.sync.validate()?;

        Ok(config)
    }
}

impl SyncConfig {
    /// Reject values that would produce a malformed `_source_uri` or sidecar key
    pub fn validate(&self) -> anyhow::Result<()> {
        let domain = &self.distribution_domain;

        if domain.trim().is_empty() {
            bail!("sync.distribution_domain must not be empty");
        }
        if domain.contains("://") {
            bail!("sync.distribution_domain must be a bare hostname, got {domain:?}");
        }
        if domain.ends_with('/') {
            bail!("sync.distribution_domain must not end with '/', got {domain:?}");
        }
        let prefix = &self.metadata_prefix;
        if prefix.is_empty() {
            bail!("sync.metadata_prefix must not be empty");
        }
        // The layout inserts the separator itself
        if prefix.starts_with('/') || prefix.ends_with('/') {
            bail!("sync.metadata_prefix must not start or end with '/', got {prefix:?}");
        }

        Ok(())
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

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint_url: None,
            force_path_style: false,
        }
    }
}
