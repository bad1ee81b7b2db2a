use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use hotelbot_search::{ReplyMode, DEFAULT_ENDPOINT};

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LINE_API: &str = "https://api.line.me";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Bot runtime configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Route the platform posts webhooks to
    pub webhook_path: String,
    pub line_channel_secret: String,
    pub line_channel_token: String,
    pub rakuten_app_id: String,
    pub reply_mode: ReplyMode,
    /// Bound on each outbound call (search and reply)
    pub http_timeout: Duration,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Directory for rolling JSON logs; console only when unset
    pub log_dir: Option<PathBuf>,
    pub rakuten_api_url: String,
    pub line_api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("webhook_path", &self.webhook_path)
            .field("line_channel_secret", &"<redacted>")
            .field("line_channel_token", &"<redacted>")
            .field("rakuten_app_id", &"<redacted>")
            .field("reply_mode", &self.reply_mode)
            .field("http_timeout", &self.http_timeout)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("rakuten_api_url", &self.rakuten_api_url)
            .field("line_api_url", &self.line_api_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails on the first missing credential so the process never starts
    /// half-configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from a provided map (useful for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| get(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("HOTELBOT_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "HOTELBOT_PORT",
                reason: format!("'{raw}' is not a port number"),
            })?,
            None => DEFAULT_PORT,
        };

        let reply_mode = match get("HOTELBOT_REPLY_MODE") {
            Some(raw) => raw.parse::<ReplyMode>().map_err(|reason| ConfigError::Invalid {
                name: "HOTELBOT_REPLY_MODE",
                reason,
            })?,
            None => ReplyMode::default(),
        };

        let timeout_secs: u64 = match get("HOTELBOT_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HOTELBOT_HTTP_TIMEOUT_SECS",
                        reason: format!("'{raw}' is not a positive number of seconds"),
                    })
                }
            },
            None => 5,
        };

        let mut webhook_path = get("HOTELBOT_WEBHOOK_PATH").unwrap_or_else(|| "/callback".to_string());
        if !webhook_path.starts_with('/') {
            webhook_path.insert(0, '/');
        }

        Ok(Self {
            bind_address: get("HOTELBOT_BIND").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            webhook_path,
            line_channel_secret: required("LINE_CHANNEL_SECRET")?,
            line_channel_token: required("LINE_CHANNEL_TOKEN")?,
            rakuten_app_id: required("RAKUTEN_APPID")?,
            reply_mode,
            http_timeout: Duration::from_secs(timeout_secs),
            log_level: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_dir: get("HOTELBOT_LOG_DIR").map(PathBuf::from),
            rakuten_api_url: get("RAKUTEN_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            line_api_url: get("LINE_API_URL").unwrap_or_else(|| DEFAULT_LINE_API.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required_only() -> HashMap<String, String> {
        vars(&[
            ("LINE_CHANNEL_SECRET", "secret"),
            ("LINE_CHANNEL_TOKEN", "token"),
            ("RAKUTEN_APPID", "app-id"),
        ])
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_vars(&required_only()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.webhook_path, "/callback");
        assert_eq!(config.reply_mode, ReplyMode::Flex);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.rakuten_api_url, DEFAULT_ENDPOINT);
        assert_eq!(config.line_api_url, "https://api.line.me");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn each_credential_is_required() {
        for name in ["LINE_CHANNEL_SECRET", "LINE_CHANNEL_TOKEN", "RAKUTEN_APPID"] {
            let mut env = required_only();
            env.remove(name);
            assert_eq!(Config::from_vars(&env).unwrap_err(), ConfigError::Missing(name));

            env.insert(name.to_string(), "  ".to_string());
            assert_eq!(Config::from_vars(&env).unwrap_err(), ConfigError::Missing(name));
        }
    }

    #[test]
    fn overrides_are_read() {
        let mut env = required_only();
        env.extend(vars(&[
            ("PORT", "3000"),
            ("HOTELBOT_REPLY_MODE", "text"),
            ("HOTELBOT_HTTP_TIMEOUT_SECS", "2"),
            ("HOTELBOT_WEBHOOK_PATH", "line/callback"),
            ("HOTELBOT_LOG_DIR", "/var/log/hotelbot"),
        ]));
        let config = Config::from_vars(&env).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.reply_mode, ReplyMode::Text);
        assert_eq!(config.http_timeout, Duration::from_secs(2));
        assert_eq!(config.webhook_path, "/line/callback");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/hotelbot")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut env = required_only();
        env.insert("HOTELBOT_REPLY_MODE".into(), "carousel".into());
        assert!(matches!(
            Config::from_vars(&env),
            Err(ConfigError::Invalid { name: "HOTELBOT_REPLY_MODE", .. })
        ));

        let mut env = required_only();
        env.insert("HOTELBOT_HTTP_TIMEOUT_SECS".into(), "0".into());
        assert!(matches!(
            Config::from_vars(&env),
            Err(ConfigError::Invalid { name: "HOTELBOT_HTTP_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn debug_output_hides_credentials() {
        let rendered = format!("{:?}", Config::from_vars(&required_only()).unwrap());
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("app-id"));
        assert!(rendered.contains("<redacted>"));
    }
}
