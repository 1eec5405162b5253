use crate::api::Credentials;
use crate::config::SecretString;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

const ENV_PRODUCTION: &str = "production";
const ENV_MODE: &str = "CONNECTOR_ENV";

#[derive(Debug, Deserialize, Clone)]
pub struct Logger {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    pub directory: bool,
    pub console: bool,
}

/// Layout of the log file. The console always prints the pretty layout.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
pub struct Manager {
    pub name: String,
    pub logger: Logger,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenCTI {
    pub url: String,
    pub token: SecretString,
    #[serde(default)]
    pub continue_on_fail: bool,
}

impl OpenCTI {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.url.clone(), self.token.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub manager: Manager,
    pub opencti: OpenCTI,
}

impl Settings {
    pub fn mode() -> String {
        env::var(ENV_MODE).unwrap_or_else(|_| ENV_PRODUCTION.into())
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = Self::mode();
        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::default().try_parsing(true).separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const SAMPLE: &str = r#"
manager:
  name: "OpenCTI connector"
  logger:
    level: info
    directory: false
    console: true
opencti:
  url: "https://opencti.example.com/"
  token: "a-very-secret-token"
"#;

    fn sample_settings() -> Settings {
        Config::builder()
            .add_source(File::from_str(SAMPLE, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings = sample_settings();
        assert_eq!(settings.manager.logger.format, LogFormat::Json);
        assert!(!settings.opencti.continue_on_fail);
        assert_eq!(settings.opencti.token.expose_secret(), "a-very-secret-token");
    }

    #[test]
    fn test_settings_log_format() {
        let text = SAMPLE.replace("console: true", "console: true\n    format: text");
        let settings: Settings = Config::builder()
            .add_source(File::from_str(&text, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.manager.logger.format, LogFormat::Text);

        let unknown = SAMPLE.replace("console: true", "console: true\n    format: xml");
        let result = Config::builder()
            .add_source(File::from_str(&unknown, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<Settings>();
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_debug_hides_token() {
        let settings = sample_settings();
        let debug_output = format!("{:?}", settings);
        assert!(!debug_output.contains("a-very-secret-token"));
    }

    #[test]
    fn test_settings_credentials_endpoint() {
        let settings = sample_settings();
        let credentials = settings.opencti.credentials();
        assert_eq!(credentials.endpoint(), "https://opencti.example.com/graphql");
    }
}
