// stack-protect-config - Runtime configuration for the remediation function
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from STACK_PROTECT_CONFIG env var
// 3. Config file contents from STACK_PROTECT_CONFIG_CONTENT env var
// 4. Default config file location (./stack-protect.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use platform::{Platform, PlatformDefaults};

/// Event field that carries the target stack name when nothing else is configured.
pub const DEFAULT_RESOURCE_ID_FIELD: &str = "ResourceId";

/// Main runtime configuration, fully resolved. Files are read through
/// `ConfigFile` and merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeConfig {
    pub log: LogConfig,
    pub cloudformation: CloudFormationConfig,
    pub event: EventConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `stack_protect_lambda=debug,info`
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

/// CloudFormation client overrides. Credentials always come from the
/// ambient provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudFormationConfig {
    /// Region override; the SDK default chain (AWS_REGION) is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Endpoint override for LocalStack and similar emulators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

/// Invocation event shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventConfig {
    pub resource_id_field: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            resource_id_field: DEFAULT_RESOURCE_ID_FIELD.to_string(),
        }
    }
}

/// TOML file layer. Every key is optional so a file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub log: Option<LogFile>,
    #[serde(default)]
    pub cloudformation: Option<CloudFormationConfig>,
    #[serde(default)]
    pub event: Option<EventFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogFile {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventFile {
    pub resource_id_field: Option<String>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources for the given platform
    /// (normally `Platform::detect()`).
    pub fn load_for_platform(platform: Platform) -> Result<Self> {
        sources::load_config(platform)
    }

    /// Build a configuration for the given platform from inline TOML plus
    /// overrides supplied by an `EnvSource`, without touching the process
    /// environment or the filesystem.
    pub fn load_for_platform_with_env<E: EnvSource>(
        platform: Platform,
        inline_config: Option<&str>,
        env: &E,
    ) -> Result<Self> {
        let mut config = RuntimeConfig::from_platform_defaults(platform);

        if let Some(inline) = inline_config {
            config.merge(ConfigFile::parse(inline)?);
        }

        env_overrides::apply_env_overrides(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_platform_defaults(platform: Platform) -> Self {
        let defaults = platform.defaults();
        Self {
            log: LogConfig {
                level: defaults.log_level.to_string(),
                format: defaults.log_format,
            },
            cloudformation: CloudFormationConfig::default(),
            event: EventConfig::default(),
        }
    }

    /// Merge a file layer into this one; only keys present in the file win.
    pub fn merge(&mut self, other: ConfigFile) {
        if let Some(log) = other.log {
            if let Some(level) = log.level {
                self.log.level = level;
            }
            if let Some(format) = log.format {
                self.log.format = format;
            }
        }

        if let Some(cfn) = other.cloudformation {
            if cfn.region.is_some() {
                self.cloudformation.region = cfn.region;
            }
            if cfn.endpoint_url.is_some() {
                self.cloudformation.endpoint_url = cfn.endpoint_url;
            }
        }

        if let Some(event) = other.event {
            if let Some(field) = event.resource_id_field {
                self.event.resource_id_field = field;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_default_configs() {
        let event = EventConfig::default();
        assert_eq!(event.resource_id_field, "ResourceId");

        let cfn = CloudFormationConfig::default();
        assert!(cfn.region.is_none());
        assert!(cfn.endpoint_url.is_none());
    }

    #[test]
    fn test_merge_only_overrides_present_keys() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        let file = ConfigFile::parse(
            r#"
            [log]
            level = "debug"

            [cloudformation]
            region = "eu-west-1"
            "#,
        )
        .unwrap();

        config.merge(file);

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.cloudformation.region.as_deref(), Some("eu-west-1"));
        assert!(config.cloudformation.endpoint_url.is_none());
        assert_eq!(config.event.resource_id_field, "ResourceId");
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() {
        let err = ConfigFile::parse("[log]\nverbosity = 3\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }

    #[test]
    fn test_runtime_config_serializes_without_empty_overrides() {
        let config = RuntimeConfig::from_platform_defaults(Platform::Local);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["log"]["format"], "text");
        assert!(value["cloudformation"].get("region").is_none());
    }
}
