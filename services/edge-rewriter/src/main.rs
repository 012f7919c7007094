use anyhow::Context;
use edge_rewriter::{handle_event, CloudFrontEvent, CloudFrontRequest, Config};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load().context("Failed to load configuration")?;

    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "Starting edge rewriter");

    run(service_fn(function_handler)).await
}

/// Rewrite the path of a single origin request
async fn function_handler(event: LambdaEvent<CloudFrontEvent>) -> Result<CloudFrontRequest, Error> {
    let (event, context) = event.into_parts();

    let rewritten = handle_event(event)?;

    debug!(
        request_id = %context.request_id,
        uri = %rewritten.uri,
        "Origin request rewritten"
    );

    Ok(rewritten)
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
