// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_log_config(&config.log)?;
    validate_cloudformation_config(&config.cloudformation)?;
    validate_event_config(&config.event)?;
    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level must not be empty");
    }

    if let Err(e) = EnvFilter::try_new(&config.level) {
        bail!("log.level '{}' is not a valid filter: {}", config.level, e);
    }

    Ok(())
}

fn validate_cloudformation_config(config: &CloudFormationConfig) -> Result<()> {
    if let Some(ref region) = config.region {
        if region.trim().is_empty() {
            bail!("cloudformation.region must not be empty when set");
        }
    }

    if let Some(ref endpoint) = config.endpoint_url {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            bail!("cloudformation.endpoint_url must start with http:// or https://");
        }

        if endpoint.starts_with("http://") {
            warn!(
                endpoint_url = %endpoint,
                "cloudformation.endpoint_url is not TLS; only use this against a local emulator"
            );
        }
    }

    Ok(())
}

fn validate_event_config(config: &EventConfig) -> Result<()> {
    if config.resource_id_field.trim().is_empty() {
        bail!("event.resource_id_field must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RuntimeConfig {
        RuntimeConfig::from_platform_defaults(Platform::Local)
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&base()).is_ok());
        assert!(
            validate_config(&RuntimeConfig::from_platform_defaults(Platform::Lambda)).is_ok()
        );
    }

    #[test]
    fn rejects_empty_log_level() {
        let mut config = base();
        config.log.level = " ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("log.level"));
    }

    #[test]
    fn accepts_directive_lists() {
        let mut config = base();
        config.log.level = "stack_protect_lambda=debug,aws_smithy_runtime=warn,info".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_endpoint_without_scheme() {
        let mut config = base();
        config.cloudformation.endpoint_url = Some("localhost:4566".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("endpoint_url"));
    }

    #[test]
    fn rejects_blank_region() {
        let mut config = base();
        config.cloudformation.region = Some(String::new());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_empty_resource_id_field() {
        let mut config = base();
        config.event.resource_id_field = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("resource_id_field"));
    }
}
