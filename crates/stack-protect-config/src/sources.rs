// Configuration source loading.
//
// Priority order:
// 1. Environment variables (STACK_PROTECT_* prefix, plus Lambda log controls)
// 2. Config file path from STACK_PROTECT_CONFIG
// 3. Inline config content from STACK_PROTECT_CONFIG_CONTENT
// 4. Default config file (./stack-protect.toml)
// 5. Platform defaults (based on auto-detected Platform)

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::platform::Platform;
use crate::*;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "./stack-protect.toml";

/// Load configuration for the detected platform using the process environment
/// and the filesystem.
pub fn load_config(platform: Platform) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_platform_defaults(platform);

    if let Some(file_config) = load_from_file()? {
        config.merge(file_config);
    }

    let env_source = StdEnvSource;
    env_overrides::apply_env_overrides(&mut config, &env_source)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<ConfigFile>> {
    if let Ok(path) = env::var(format!("{}CONFIG", ENV_PREFIX)) {
        return read_config_file(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var(format!("{}CONFIG_CONTENT", ENV_PREFIX)) {
        let config = ConfigFile::parse(&content)
            .context("Failed to parse inline config from STACK_PROTECT_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        return read_config_file(default_path).map(Some);
    }

    Ok(None)
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    ConfigFile::parse(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_defaults_match_expectations() {
        let lambda = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        assert_eq!(lambda.log.format, LogFormat::Json);
        assert_eq!(lambda.event.resource_id_field, DEFAULT_RESOURCE_ID_FIELD);

        let local = RuntimeConfig::from_platform_defaults(Platform::Local);
        assert_eq!(local.log.format, LogFormat::Text);
        assert_eq!(local.log.level, "info");
    }

    #[test]
    fn read_config_file_reports_missing_path() {
        let err = read_config_file(Path::new("/nonexistent/stack-protect.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
