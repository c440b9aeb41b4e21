// Remediation handler
//
// One event in, one UpdateTerminationProtection call out. Failures are
// returned to the caller untouched; nothing here retries or swallows.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::client::StackProtector;
use crate::error::{RemediationError, Result};
use crate::event::RemediationEvent;

/// Fixed prefix of the success log line
pub const PROTECTION_ENABLED_PREFIX: &str = "TERMINATION PROTECTION ENABLED ON CFN STACK WITH ID:";

/// Value handed back to the Lambda host on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemediationOutcome {
    /// Identifier taken from the event
    pub stack_name: String,
    /// Identifier returned by CloudFormation
    pub stack_id: String,
    pub termination_protection: bool,
}

pub fn protection_enabled_message(stack_id: &str) -> String {
    format!("{} {}", PROTECTION_ENABLED_PREFIX, stack_id)
}

/// Enable termination protection on the stack named by `payload[resource_id_field]`.
///
/// The identifier is checked for presence before any remote call. The
/// success line logs the `StackId` CloudFormation returns, which is usually
/// an ARN even when the event carried a plain stack name.
pub async fn remediate(
    payload: &Value,
    resource_id_field: &str,
    protector: &dyn StackProtector,
) -> Result<RemediationOutcome> {
    let event = RemediationEvent::from_payload(payload, resource_id_field)?;

    let response = protector
        .update_termination_protection(&event.resource_id, true)
        .await?;

    let stack_id = response
        .stack_id
        .ok_or_else(|| RemediationError::MissingStackId {
            stack_name: event.resource_id.clone(),
        })?;

    info!("{}", protection_enabled_message(&stack_id));

    Ok(RemediationOutcome {
        stack_name: event.resource_id,
        stack_id,
        termination_protection: true,
    })
}
