// CloudFormation client seam
//
// The handler only sees `StackProtector`, so tests substitute a recording or
// fault-injecting stub and never reach a real endpoint.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::update_termination_protection::UpdateTerminationProtectionError;
use aws_sdk_cloudformation::Client;
use stack_protect_config::CloudFormationConfig;
use tracing::debug;

use crate::error::{ApiError, ApiErrorKind};

/// The part of the `UpdateTerminationProtection` response the handler reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionResponse {
    /// Canonical stack ARN
    pub stack_id: Option<String>,
}

/// Sets the termination-protection flag on a stack
#[async_trait]
pub trait StackProtector: Send + Sync {
    async fn update_termination_protection(
        &self,
        stack_name: &str,
        enable: bool,
    ) -> Result<ProtectionResponse, ApiError>;
}

/// `StackProtector` backed by the AWS SDK
#[derive(Clone, Debug)]
pub struct CloudFormationProtector {
    client: Client,
}

impl CloudFormationProtector {
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient credential chain, applying the
    /// configured region and endpoint overrides.
    pub async fn from_config(config: &CloudFormationConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        debug!(
            region = ?sdk_config.region(),
            endpoint_url = ?config.endpoint_url,
            "CloudFormation client configured"
        );

        Self::from_client(Client::new(&sdk_config))
    }
}

#[async_trait]
impl StackProtector for CloudFormationProtector {
    async fn update_termination_protection(
        &self,
        stack_name: &str,
        enable: bool,
    ) -> Result<ProtectionResponse, ApiError> {
        let output = self
            .client
            .update_termination_protection()
            .enable_termination_protection(enable)
            .stack_name(stack_name)
            .send()
            .await
            .map_err(api_error_from_sdk)?;

        Ok(ProtectionResponse {
            stack_id: output.stack_id().map(str::to_string),
        })
    }
}

fn api_error_from_sdk(err: SdkError<UpdateTerminationProtectionError>) -> ApiError {
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    let mut api = ApiError::new(code, message);
    // A response arrived, so this is not a transport fault even without a code.
    if api.code.is_none() && matches!(err, SdkError::ServiceError(_)) {
        api.kind = ApiErrorKind::Service;
    }
    api.with_source(err)
}
