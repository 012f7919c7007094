use crate::config::SyncConfig;
use serde::{Deserialize, Serialize};

/// Sidecar document describing a content object to the downstream indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "Attributes")]
    pub attributes: MetadataAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttributes {
    /// Public URL of the content object
    #[serde(rename = "_source_uri")]
    pub source_uri: String,
}

impl MetadataRecord {
    /// Build the record for `object_key` served from `domain`
    pub fn for_object(domain: &str, object_key: &str) -> Self {
        Self {
            attributes: MetadataAttributes {
                source_uri: source_uri(domain, object_key),
            },
        }
    }

    /// Serialized body as stored in the bucket (two-space indented JSON)
    pub fn to_body(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}

/// Naming rules for sidecar objects
#[derive(Debug, Clone)]
pub struct MetadataLayout {
    prefix: String,
    suffix: String,
}

impl MetadataLayout {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Key of the sidecar for `object_key`
    /// Format: {prefix}/{object_key}{suffix}
    pub fn metadata_key(&self, object_key: &str) -> String {
        format!("{}/{}{}", self.prefix, object_key, self.suffix)
    }

    /// Whether `key` is itself a sidecar written by this layout
    pub fn is_metadata_key(&self, key: &str) -> bool {
        let under_prefix = key
            .strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('/'));

        under_prefix || (!self.suffix.is_empty() && key.ends_with(self.suffix.as_str()))
    }
}

impl From<&SyncConfig> for MetadataLayout {
    fn from(config: &SyncConfig) -> Self {
        Self::new(config.metadata_prefix.clone(), config.metadata_suffix.clone())
    }
}

impl Default for MetadataLayout {
    fn default() -> Self {
        Self::new("metadata", ".metadata.json")
    }
}

/// Public URL of `object_key` behind the distribution at `domain`
pub fn source_uri(domain: &str, object_key: &str) -> String {
    format!("https://{domain}/{object_key}")
}
