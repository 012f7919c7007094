use crate::config::SyncConfig;
use crate::event::{EventKind, StorageEvent};
use crate::metadata::{MetadataLayout, MetadataRecord};
use crate::storage::{MetadataStorage, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Reasons a single invocation did not sync
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unsupported event type: {0}")]
    UnsupportedEventType(String),

    #[error("Failed to serialize metadata record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a successful invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Sidecar written at `metadata_key`
    Created { metadata_key: String },
    /// Sidecar at `metadata_key` removed (or already absent)
    Deleted { metadata_key: String },
    /// Event concerned a sidecar itself; nothing touched
    Skipped { object_key: String },
}

/// Status returned to the invoking event system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub status_code: u16,
}

impl SyncResponse {
    pub const OK: SyncResponse = SyncResponse { status_code: 200 };
    pub const FAILED: SyncResponse = SyncResponse { status_code: 500 };

    pub fn is_success(&self) -> bool {
        self.status_code == Self::OK.status_code
    }
}

impl From<&Result<SyncAction, SyncError>> for SyncResponse {
    fn from(outcome: &Result<SyncAction, SyncError>) -> Self {
        match outcome {
            Ok(_) => SyncResponse::OK,
            Err(_) => SyncResponse::FAILED,
        }
    }
}

/// Keeps one metadata sidecar per content object in step with storage events
pub struct MetadataSynchronizer<S> {
    storage: S,
    layout: MetadataLayout,
    distribution_domain: String,
    skip_metadata_keys: bool,
}

impl<S: MetadataStorage> MetadataSynchronizer<S> {
    pub fn new(storage: S, config: &SyncConfig) -> Self {
        Self {
            storage,
            layout: MetadataLayout::from(config),
            distribution_domain: config.distribution_domain.clone(),
            skip_metadata_keys: config.skip_metadata_keys,
        }
    }

    /// Apply one storage event. Performs at most one write or one delete.
    #[instrument(
        skip(self, event),
        fields(kind = %event.kind(), bucket = %event.bucket(), object_key = %event.object_key())
    )]
    pub async fn handle(&self, event: &StorageEvent) -> Result<SyncAction, SyncError> {
        let object_key = event.object_key();

        match event.kind() {
            EventKind::Unsupported(tag) => {
                warn!(detail_type = %tag, "Ignoring unsupported event type");
                Err(SyncError::UnsupportedEventType(tag))
            }
            _ if self.is_self_triggered(object_key) => {
                info!("Event is for a metadata object, skipping");
                Ok(SyncAction::Skipped {
                    object_key: object_key.to_string(),
                })
            }
            EventKind::ObjectCreated => self.create_metadata(event.bucket(), object_key).await,
            EventKind::ObjectDeleted => self.delete_metadata(event.bucket(), object_key).await,
        }
    }

    /// Writing a sidecar raises its own Object Created event
    fn is_self_triggered(&self, object_key: &str) -> bool {
        self.skip_metadata_keys && self.layout.is_metadata_key(object_key)
    }

    /// Handle an event and reduce the outcome to a status
    pub async fn handle_with_status(&self, event: &StorageEvent) -> SyncResponse {
        SyncResponse::from(&self.handle(event).await)
    }

    /// Write (or overwrite) the sidecar for a newly created object
    async fn create_metadata(&self, bucket: &str, object_key: &str) -> Result<SyncAction, SyncError> {
        info!("Creating metadata");

        let metadata_key = self.layout.metadata_key(object_key);
        let body = MetadataRecord::for_object(&self.distribution_domain, object_key).to_body()?;

        if let Err(e) = self.storage.put_object(bucket, &metadata_key, body).await {
            error!(error = %e, metadata_key = %metadata_key, "Error uploading metadata file");
            return Err(e.into());
        }

        info!(metadata_key = %metadata_key, "Uploaded metadata file");
        Ok(SyncAction::Created { metadata_key })
    }

    /// Remove the sidecar of a deleted object
    async fn delete_metadata(&self, bucket: &str, object_key: &str) -> Result<SyncAction, SyncError> {
        let metadata_key = self.layout.metadata_key(object_key);

        if let Err(e) = self.storage.delete_object(bucket, &metadata_key).await {
            error!(error = %e, metadata_key = %metadata_key, "Error deleting metadata file");
            return Err(e.into());
        }

        info!(metadata_key = %metadata_key, "Deleted metadata file");
        Ok(SyncAction::Deleted { metadata_key })
    }
}
