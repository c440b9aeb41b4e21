// AWS Lambda runtime adapter
//
// Enables CloudFormation termination protection on the stack named in each
// invocation event.
//
// lambda_runtime drives tokio; the CloudFormation client is built once at
// cold start and shared across warm invocations.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use stack_protect_config::{LogFormat, Platform, RuntimeConfig};
use std::sync::Arc;
use tracing::{info, Instrument};

pub mod client;
pub mod error;
pub mod event;
pub mod handler;

pub use client::{CloudFormationProtector, ProtectionResponse, StackProtector};
pub use error::{ApiError, ApiErrorKind, RemediationError};
pub use event::RemediationEvent;
pub use handler::{remediate, RemediationOutcome, PROTECTION_ENABLED_PREFIX};

/// State shared by every invocation of a warm container
#[derive(Clone)]
pub struct LambdaState {
    pub protector: Arc<dyn StackProtector>,
    pub resource_id_field: String,
}

/// Lambda handler for remediation events
pub async fn handle_request(
    event: LambdaEvent<Value>,
    state: Arc<LambdaState>,
) -> Result<RemediationOutcome, Error> {
    let (payload, context) = event.into_parts();
    let span = tracing::info_span!("remediation", request_id = %context.request_id);

    async move {
        remediate(&payload, &state.resource_id_field, state.protector.as_ref())
            .await
            .map_err(Error::from)
    }
    .instrument(span)
    .await
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let platform = Platform::detect();
    let config = RuntimeConfig::load_for_platform(platform)
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;
    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_timestamp = env!("BUILD_TIMESTAMP"),
        platform = %platform,
        log_format = %config.log.format,
        resource_id_field = %config.event.resource_id_field,
        "stack-protect starting"
    );

    let protector = CloudFormationProtector::from_config(&config.cloudformation).await;
    let state = Arc::new(LambdaState {
        protector: Arc::new(protector),
        resource_id_field: config.event.resource_id_field,
    });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let state = state.clone();
        async move { handle_request(event, state).await }
    }))
    .await
}

/// Initialize tracing/logging from RuntimeConfig
fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log.format {
        LogFormat::Json => {
            registry
                .with(fmt::layer().json().with_current_span(true))
                .init();
        }
        LogFormat::Text => {
            // No ANSI colours: CloudWatch renders escape codes literally.
            registry.with(fmt::layer().with_ansi(false)).init();
        }
    }
}
