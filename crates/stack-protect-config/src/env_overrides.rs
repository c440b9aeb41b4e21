use super::{LogFormat, RuntimeConfig};
use anyhow::{bail, Context, Result};

pub const ENV_PREFIX: &str = "STACK_PROTECT_";

/// Abstraction over environment-variable lookups so tests can supply an
/// in-memory source instead of mutating the process environment.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the STACK_PROTECT_ prefix
    /// Used for variables set by the Lambda service (AWS_LAMBDA_LOG_LEVEL, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Lambda advanced logging controls; our own variables still win below.
    if let Some(level) = get_raw_env_string(env, "AWS_LAMBDA_LOG_LEVEL") {
        config.log.level = lambda_log_level(&level)?.to_string();
    }
    if let Some(format) = get_raw_env_string(env, "AWS_LAMBDA_LOG_FORMAT") {
        config.log.format = format
            .parse::<LogFormat>()
            .context("Invalid AWS_LAMBDA_LOG_FORMAT value")?;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.log.format = format
            .parse::<LogFormat>()
            .with_context(|| format!("Invalid {}LOG_FORMAT value", ENV_PREFIX))?;
    }

    // CloudFormation client
    if let Some(region) = get_env_string(env, "REGION") {
        config.cloudformation.region = Some(region);
    }
    if let Some(endpoint) = get_env_string(env, "ENDPOINT_URL") {
        config.cloudformation.endpoint_url = Some(endpoint);
    }

    // Event shape
    if let Some(field) = get_env_string(env, "RESOURCE_ID_FIELD") {
        config.event.resource_id_field = field;
    }

    Ok(())
}

/// Translate a Lambda application log level into an `EnvFilter` directive.
/// tracing has no FATAL, so it narrows to `error`. Anything else is rejected
/// rather than handed to `EnvFilter`, which would read it as a target name.
fn lambda_log_level(level: &str) -> Result<&'static str> {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Ok("trace"),
        "DEBUG" => Ok("debug"),
        "INFO" => Ok("info"),
        "WARN" => Ok("warn"),
        "ERROR" | "FATAL" => Ok("error"),
        _ => bail!(
            "Invalid AWS_LAMBDA_LOG_LEVEL value: {}. Supported: TRACE, DEBUG, INFO, WARN, ERROR, FATAL",
            level
        ),
    }
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|val| !val.trim().is_empty())
}

/// Get a raw environment variable without the STACK_PROTECT_ prefix
fn get_raw_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get_raw(key).filter(|val| !val.trim().is_empty())
}
