// Platform detection based on environment variables
//
// - AWS Lambda: AWS_LAMBDA_FUNCTION_NAME env var present
// - Local: anything else (developer machine, CI, sam local without the var)

use crate::LogFormat;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Lambda,
    Local,
}

impl Platform {
    /// Auto-detect the current platform based on environment variables
    pub fn detect() -> Self {
        Self::detect_from(env::var("AWS_LAMBDA_FUNCTION_NAME").ok().as_deref())
    }

    fn detect_from(function_name: Option<&str>) -> Self {
        match function_name {
            Some(name) if !name.is_empty() => Platform::Lambda,
            _ => Platform::Local,
        }
    }

    /// Get platform-specific defaults
    pub fn defaults(&self) -> PlatformDefaults {
        match self {
            // CloudWatch Logs indexes JSON lines; keep them machine readable.
            Platform::Lambda => PlatformDefaults {
                log_level: "info",
                log_format: LogFormat::Json,
            },
            Platform::Local => PlatformDefaults {
                log_level: "info",
                log_format: LogFormat::Text,
            },
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Lambda => write!(f, "lambda"),
            Platform::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformDefaults {
    pub log_level: &'static str,
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_defaults() {
        let lambda = Platform::Lambda.defaults();
        assert_eq!(lambda.log_level, "info");
        assert_eq!(lambda.log_format, LogFormat::Json);

        let local = Platform::Local.defaults();
        assert_eq!(local.log_format, LogFormat::Text);
    }

    #[test]
    fn test_detect_from_function_name() {
        assert_eq!(
            Platform::detect_from(Some("remediate-termination-protection")),
            Platform::Lambda
        );
        assert_eq!(Platform::detect_from(Some("")), Platform::Local);
        assert_eq!(Platform::detect_from(None), Platform::Local);
        assert_eq!(Platform::Lambda.to_string(), "lambda");
    }
}
