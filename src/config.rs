//! Configuration management for the PDF server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::templates::CachePolicy;

/// Value shipped in `.env.example`; treated as "no token configured"
pub const PLACEHOLDER_API_TOKEN: &str = "your_secure_api_token_here_change_this";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gotenberg: GotenbergConfig,
    pub auth: AuthConfig,
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted JSON body size
    pub body_limit: usize,
    /// Allowed CORS origins; empty means any origin (without credentials)
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GotenbergConfig {
    pub url: String,
    /// Timeout of one conversion call
    pub timeout: Duration,
    pub health_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub api_token: Option<String>,
}

impl AuthConfig {
    /// The token callers must present, if one is really configured
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != PLACEHOLDER_API_TOKEN)
    }
}

#[derive(Debug, Clone)]
pub struct TemplatesConfig {
    pub dir: PathBuf,
    pub cache: CachePolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                body_limit: 10 * 1024 * 1024,
                cors_origins: Vec::new(),
            },
            gotenberg: GotenbergConfig {
                url: "http://gotenberg:3000".to_string(),
                timeout: Duration::from_millis(30_000),
                health_timeout: Duration::from_millis(5_000),
            },
            auth: AuthConfig::default(),
            templates: TemplatesConfig {
                dir: PathBuf::from("templates"),
                cache: CachePolicy::Lazy,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source (the process environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cache = match get("TEMPLATE_CACHE") {
            Some(value) => CachePolicy::from_str(&value).map_err(|message| ConfigError::Invalid {
                var: "TEMPLATE_CACHE",
                message,
            })?,
            None => defaults.templates.cache,
        };

        Ok(Config {
            server: ServerConfig {
                host: get("HOST").unwrap_or(defaults.server.host),
                port: parse_or(get("PORT"), "PORT", defaults.server.port),
                body_limit: parse_or(
                    get("BODY_LIMIT_BYTES"),
                    "BODY_LIMIT_BYTES",
                    defaults.server.body_limit,
                ),
                cors_origins: get("CORS_ORIGIN")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            gotenberg: GotenbergConfig {
                url: get("GOTENBERG_URL").unwrap_or(defaults.gotenberg.url),
                timeout: Duration::from_millis(parse_or(
                    get("PDF_GENERATION_TIMEOUT"),
                    "PDF_GENERATION_TIMEOUT",
                    defaults.gotenberg.timeout.as_millis() as u64,
                )),
                health_timeout: Duration::from_millis(parse_or(
                    get("GOTENBERG_HEALTH_TIMEOUT"),
                    "GOTENBERG_HEALTH_TIMEOUT",
                    defaults.gotenberg.health_timeout.as_millis() as u64,
                )),
            },
            auth: AuthConfig {
                api_token: get("API_TOKEN"),
            },
            templates: TemplatesConfig {
                dir: get("TEMPLATES_DIR").map(PathBuf::from).unwrap_or(defaults.templates.dir),
                cache,
            },
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, var: &str, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var, value = %raw, "Invalid number in environment, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:3001");
        assert_eq!(config.gotenberg.url, "http://gotenberg:3000");
        assert_eq!(config.gotenberg.timeout, Duration::from_secs(30));
        assert_eq!(config.templates.cache, CachePolicy::Lazy);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.auth.token(), None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("GOTENBERG_URL", "http://localhost:3000"),
            ("PDF_GENERATION_TIMEOUT", "5000"),
            ("CORS_ORIGIN", "https://a.example, https://b.example,"),
            ("API_TOKEN", "s3cret"),
            ("TEMPLATE_CACHE", "preload"),
            ("TEMPLATES_DIR", "/srv/templates"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gotenberg.url, "http://localhost:3000");
        assert_eq!(config.gotenberg.timeout, Duration::from_secs(5));
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.auth.token(), Some("s3cret"));
        assert_eq!(config.templates.cache, CachePolicy::Preload);
        assert_eq!(config.templates.dir, PathBuf::from("/srv/templates"));
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = config(&[("PORT", "http"), ("PDF_GENERATION_TIMEOUT", "-1")]).unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.gotenberg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_cache_policy_is_an_error() {
        let err = config(&[("TEMPLATE_CACHE", "forever")]).unwrap_err();
        assert!(err.to_string().contains("TEMPLATE_CACHE"));
    }

    #[test]
    fn test_invalid_policy_fails_instead_of_defaulting() {
        let result = config(&[("API_TOKEN", "s3cret"), ("TEMPLATE_CACHE", "forever")]);
        match result {
            Err(ConfigError::Invalid { var, message }) => {
                assert_eq!(var, "TEMPLATE_CACHE");
                assert!(message.contains("forever"));
            }
            Ok(_) => panic!("an invalid TEMPLATE_CACHE must not produce a config"),
        }
    }

    #[test]
    fn test_placeholder_token_is_not_configured() {
        let config = config(&[("API_TOKEN", PLACEHOLDER_API_TOKEN)]).unwrap();
        assert_eq!(config.auth.token(), None);
    }
}
