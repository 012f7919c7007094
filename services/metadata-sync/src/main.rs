use anyhow::Context;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use metadata_sync::{Config, MetadataSynchronizer, S3MetadataStorage, StorageEvent, SyncResponse};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_tracing(&config.service.log_level);

    info!(
        service = %config.service.name,
        distribution_domain = %config.sync.distribution_domain,
        "Starting metadata sync function"
    );

    // One client for the lifetime of the execution environment
    let storage = S3MetadataStorage::new(&config.s3).await;
    let synchronizer = MetadataSynchronizer::new(storage, &config.sync);

    run(service_fn(|event| function_handler(event, &synchronizer))).await
}

/// Handle a single EventBridge delivery
async fn function_handler(
    event: LambdaEvent<Value>,
    synchronizer: &MetadataSynchronizer<S3MetadataStorage>,
) -> Result<SyncResponse, Error> {
    let (payload, context) = event.into_parts();

    info!(request_id = %context.request_id, event = %payload, "Event received");

    // Malformed events fail the invocation so EventBridge can retry or dead-letter them
    let event = StorageEvent::from_value(payload).context("Malformed storage event")?;

    let response = synchronizer.handle_with_status(&event).await;
    if !response.is_success() {
        warn!(request_id = %context.request_id, status_code = response.status_code, "Metadata sync failed");
    }

    Ok(response)
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();
}
