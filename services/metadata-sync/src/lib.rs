//! Metadata Sync
//!
//! Keeps a JSON metadata sidecar next to every content object in an S3 bucket.
//! The function is invoked by EventBridge for `Object Created` and
//! `Object Deleted` notifications and writes or removes
//! `metadata/<key>.metadata.json`, whose `_source_uri` attribute points at the
//! object's public URL behind the CloudFront distribution. A downstream
//! indexer reads the sidecars to attribute documents to their public URL.
//!
//! ## Architecture
//!
//! ```text
//! S3 bucket ──events──▶ EventBridge ──▶ MetadataSynchronizer ──put/delete──▶ S3 bucket
//!                                              │                         metadata/{key}.metadata.json
//!                                              ▼
//!                                  {"status_code": 200 | 500}
//! ```

pub mod config;
pub mod event;
pub mod handler;
pub mod metadata;
pub mod storage;

pub use config::{Config, S3Config, ServiceConfig, SyncConfig};
pub use event::{EventKind, StorageEvent};
pub use handler::{MetadataSynchronizer, SyncAction, SyncError, SyncResponse};
pub use metadata::{source_uri, MetadataLayout, MetadataRecord};
pub use storage::{MetadataStorage, S3MetadataStorage, StorageError};
