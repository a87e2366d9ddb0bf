//! Deployment environment and log output settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::env_string;

/// Where the service is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Read `ENVIRONMENT` (or `ENV`), falling back to development
    pub fn from_env() -> Self {
        env_string("ENVIRONMENT")
            .or_else(|| env_string("ENV"))
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Dotenv file loaded before the plain `.env`
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Print file and line of each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::default(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults per environment: verbose pretty output locally, JSON elsewhere
    pub fn for_environment(env: Environment) -> Self {
        let (level, format) = match env {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("info,otp_core=warn", LogFormat::Json),
        };

        Self {
            level: level.to_string(),
            format,
            source_location: env == Environment::Development,
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        if let Some(level) = env_string("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = env_string("LOG_FORMAT").and_then(|f| f.parse().ok()) {
            config.format = format;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_aliases() {
        assert_eq!("dev".parse(), Ok(Environment::Development));
        assert_eq!(" Test ".parse(), Ok(Environment::Staging));
        assert_eq!("prod".parse(), Ok(Environment::Production));
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_env_file_follows_name() {
        assert_eq!(Environment::Development.env_file(), ".env.development");
        assert_eq!(Environment::Production.env_file(), ".env.production");
        assert_eq!(Environment::Staging.to_string(), "staging");
    }

    #[test]
    fn test_logging_defaults_per_environment() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.source_location);

        let prod = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod.format, LogFormat::Json);
        assert!(prod.level.contains("otp_core=warn"));
        assert!(!prod.source_location);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
