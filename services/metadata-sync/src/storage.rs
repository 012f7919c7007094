use crate::config::S3Config;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{operation} s3://{bucket}/{key} failed: {message}")]
    Backend {
        operation: &'static str,
        bucket: String,
        key: String,
        message: String,
    },
}

/// Object store the synchronizer writes sidecars to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataStorage: Send + Sync {
    /// Write `body` at `key`, replacing any existing object
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError>;

    /// Remove the object at `key`; an absent object is not an error
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}

/// S3-backed storage, created once per process and shared by all invocations
pub struct S3MetadataStorage {
    client: S3Client,
}

impl S3MetadataStorage {
    /// Create a new S3 client from configuration
    pub async fn new(config: &S3Config) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut s3_config_builder = S3ConfigBuilder::from(&aws_config);

        // Configure custom endpoint for MinIO/LocalStack
        if let Some(ref endpoint_url) = config.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint_url);
        }

        // Force path-style access for MinIO compatibility
        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = S3Client::from_conf(s3_config_builder.build());

        info!(
            region = %config.region,
            endpoint_url = ?config.endpoint_url,
            "S3 metadata storage initialized"
        );

        Self { client }
    }

    /// Wrap an already configured client
    pub fn from_client(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataStorage for S3MetadataStorage {
    #[instrument(skip(self, body), fields(size_bytes = body.len()))]
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "PutObject",
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(bucket = %bucket, key = %key, "Object written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        match self.client.delete_object().bucket(bucket).key(key).send().await {
            Ok(_) => {
                debug!(bucket = %bucket, key = %key, "Object deleted");
                Ok(())
            }
            Err(e) => {
                // S3 normally answers 204 for absent keys; some compatible stores do not
                if e.as_service_error().and_then(|se| se.code()) == Some("NoSuchKey") {
                    debug!(bucket = %bucket, key = %key, "Object already absent");
                    return Ok(());
                }

                Err(StorageError::Backend {
                    operation: "DeleteObject",
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::delete_object::{DeleteObjectError, DeleteObjectOutput};
    use aws_sdk_s3::operation::put_object::{PutObjectError, PutObjectOutput};
    use aws_smithy_mocks::{mock, mock_client};

    fn service_error(code: &str) -> ErrorMetadata {
        ErrorMetadata::builder().code(code).message("mocked").build()
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_success() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .then_error(|| DeleteObjectError::generic(service_error("NoSuchKey")));
        let storage = S3MetadataStorage::from_client(mock_client!(aws_sdk_s3, [&rule]));

        let result = storage
            .delete_object("docs", "metadata/readme.pdf.metadata.json")
            .await;
        assert!(result.is_ok(), "NoSuchKey should be treated as deleted: {:?}", result);
    }

    #[tokio::test]
    async fn test_delete_existing_object() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|req| {
                req.bucket() == Some("docs") && req.key() == Some("metadata/readme.pdf.metadata.json")
            })
            .then_output(|| DeleteObjectOutput::builder().build());
        let storage = S3MetadataStorage::from_client(mock_client!(aws_sdk_s3, [&rule]));

        storage
            .delete_object("docs", "metadata/readme.pdf.metadata.json")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_access_denied_is_backend_error() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .then_error(|| DeleteObjectError::generic(service_error("AccessDenied")));
        let storage = S3MetadataStorage::from_client(mock_client!(aws_sdk_s3, [&rule]));

        match storage.delete_object("docs", "metadata/a.txt.metadata.json").await {
            Err(StorageError::Backend { operation, bucket, key, .. }) => {
                assert_eq!(operation, "DeleteObject");
                assert_eq!(bucket, "docs");
                assert_eq!(key, "metadata/a.txt.metadata.json");
            }
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_put_sends_json_body() {
        let rule = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|req| {
                req.bucket() == Some("docs")
                    && req.key() == Some("metadata/a.txt.metadata.json")
                    && req.content_type() == Some("application/json")
            })
            .then_output(|| PutObjectOutput::builder().build());
        let storage = S3MetadataStorage::from_client(mock_client!(aws_sdk_s3, [&rule]));

        storage
            .put_object("docs", "metadata/a.txt.metadata.json", b"{}".to_vec())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_failure_is_backend_error() {
        let rule = mock!(aws_sdk_s3::Client::put_object)
            .then_error(|| PutObjectError::generic(service_error("AccessDenied")));
        let storage = S3MetadataStorage::from_client(mock_client!(aws_sdk_s3, [&rule]));

        let err = storage
            .put_object("docs", "metadata/a.txt.metadata.json", b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend { operation: "PutObject", .. }));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Backend {
            operation: "PutObject",
            bucket: "docs".to_string(),
            key: "metadata/a.txt.metadata.json".to_string(),
            message: "AccessDenied".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "PutObject s3://docs/metadata/a.txt.metadata.json failed: AccessDenied"
        );
    }
}
