use std::{env, time::Duration};

use story_llm::gemini::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::core::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    /// Only the literal `dev` (or nothing) selects development mode.
    pub fn from_env() -> Self {
        Self::parse(env::var("APP_ENVIRONMENT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("dev") => Environment::Dev,
            Some(_) => Environment::Prod,
        }
    }
}

#[derive(Clone)]
pub struct Settings {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()`
    /// first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let gemini_api_key = non_blank("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let generation_timeout = match non_blank("GENERATION_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "GENERATION_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let port = match non_blank("APP_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid {
                    name: "APP_PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        let environment = Environment::parse(lookup("APP_ENVIRONMENT").as_deref());

        Ok(Self {
            gemini_api_key,
            gemini_model: non_blank("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: non_blank("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            generation_timeout,
            host: non_blank("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::new(self.gemini_api_key.clone())
            .with_model(self.gemini_model.clone())
            .with_base_url(self.gemini_base_url.clone())
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("generation_timeout", &self.generation_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = settings(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));

        let err = settings(&[("GEMINI_API_KEY", "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let settings = settings(&[("GEMINI_API_KEY", "abc")]).unwrap();
        assert_eq!(settings.gemini_model, "gemini-1.5-flash");
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
        assert_eq!(settings.generation_timeout, Duration::from_secs(60));
        assert_eq!(settings.environment, Environment::Dev);
    }

    #[test]
    fn overrides_are_read() {
        let settings = settings(&[
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "9090"),
            ("GENERATION_TIMEOUT_SECS", "15"),
            ("APP_ENVIRONMENT", "prod"),
        ])
        .unwrap();
        assert_eq!(settings.gemini_config().model, "gemini-pro");
        assert_eq!(settings.bind_address(), "127.0.0.1:9090");
        assert_eq!(settings.generation_timeout, Duration::from_secs(15));
        assert_eq!(settings.environment, Environment::Prod);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = settings(&[("GEMINI_API_KEY", "abc"), ("APP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "APP_PORT", .. }));

        let err =
            settings(&[("GEMINI_API_KEY", "abc"), ("GENERATION_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "GENERATION_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let settings = settings(&[("GEMINI_API_KEY", "super-secret")]).unwrap();
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }
}
