//! Invocation event model
//!
//! The payload is kept as raw JSON: only the resource identifier field is
//! consumed and the rest of the event is ignored.

use serde_json::Value;

use crate::error::{RemediationError, Result};

/// A remediation request naming the stack to protect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationEvent {
    /// Stack name or stack ARN, passed to CloudFormation as-is
    pub resource_id: String,
}

impl RemediationEvent {
    /// Extract the resource identifier from `payload[field]`.
    ///
    /// Presence and type are the only checks. An empty string is forwarded
    /// and left for CloudFormation to reject.
    pub fn from_payload(payload: &Value, field: &str) -> Result<Self> {
        match payload.get(field) {
            None | Some(Value::Null) => Err(RemediationError::MissingResourceId {
                field: field.to_string(),
            }),
            Some(Value::String(resource_id)) => Ok(Self {
                resource_id: resource_id.clone(),
            }),
            Some(other) => Err(RemediationError::InvalidResourceId {
                field: field.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
