//! Runtime configuration read from the environment (and `.env`).
//!
//! | Variable              | Meaning                                        |
//! |-----------------------|------------------------------------------------|
//! | `SINPE_API_URL`       | API base URL                                   |
//! | `SINPE_API_TOKEN`     | Bearer token, plain text                       |
//! | `SINPE_API_TOKEN_ENC` | Bearer token sealed with `ENCRYPTION_KEY`      |
//! | `ENCRYPTION_KEY`      | 64 hex chars (AES-256)                         |
//! | `SINPE_RATE_LIMIT`    | Max API requests per second (default 10)       |
//! | `FEED_TIMEOUT_SECS`   | Movement page timeout, `0` disables (default 15) |
//! | `CONTACTS_FILE`       | JSON contacts export                           |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::api::sinpe::SinpeClient;
use crate::utils::{CryptoError, TokenCipher};

const DEFAULT_RATE_LIMIT: usize = 10;
const DEFAULT_FEED_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment or .env file")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("Failed to decrypt SINPE_API_TOKEN_ENC: {0}")]
    Token(#[from] CryptoError),
}

pub struct AppConfig {
    pub api_url: String,
    pub api_token: String,
    pub requests_per_second: usize,
    pub feed_timeout: Option<Duration>,
    pub contacts_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = var("SINPE_API_URL").unwrap_or_else(|| SinpeClient::DEFAULT_BASE_URL.to_string());

        let api_token = match (var("SINPE_API_TOKEN"), var("SINPE_API_TOKEN_ENC")) {
            (Some(token), _) => token,
            (None, Some(sealed)) => {
                let key = var("ENCRYPTION_KEY").ok_or(ConfigError::Missing("ENCRYPTION_KEY"))?;
                TokenCipher::from_hex(&key)?.open(&sealed)?
            }
            (None, None) => return Err(ConfigError::Missing("SINPE_API_TOKEN")),
        };

        let requests_per_second = match var("SINPE_RATE_LIMIT") {
            Some(raw) => parse_number::<usize>("SINPE_RATE_LIMIT", &raw)?,
            None => DEFAULT_RATE_LIMIT,
        };
        if requests_per_second == 0 {
            return Err(ConfigError::Invalid {
                name: "SINPE_RATE_LIMIT",
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = match var("FEED_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("FEED_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_FEED_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            api_token,
            requests_per_second,
            feed_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            contacts_file: var("CONTACTS_FILE").map(PathBuf::from),
        })
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{:?}: {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SINPE_API_TOKEN", "t0k3n")]).unwrap();

        assert_eq!(config.api_url, SinpeClient::DEFAULT_BASE_URL);
        assert_eq!(config.api_token, "t0k3n");
        assert_eq!(config.requests_per_second, 10);
        assert_eq!(config.feed_timeout, Some(Duration::from_secs(15)));
        assert!(config.contacts_file.is_none());
    }

    #[test]
    fn test_missing_token() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("SINPE_API_TOKEN"))));
    }

    #[test]
    fn test_sealed_token() {
        let sealed = TokenCipher::from_hex(KEY).unwrap().seal("secret").unwrap();

        let config = load(&[("SINPE_API_TOKEN_ENC", sealed.as_str()), ("ENCRYPTION_KEY", KEY)]).unwrap();
        assert_eq!(config.api_token, "secret");

        assert!(matches!(
            load(&[("SINPE_API_TOKEN_ENC", sealed.as_str())]),
            Err(ConfigError::Missing("ENCRYPTION_KEY"))
        ));
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = load(&[
            ("SINPE_API_TOKEN", "t"),
            ("SINPE_API_URL", "http://localhost:8080"),
            ("SINPE_RATE_LIMIT", "3"),
            ("FEED_TIMEOUT_SECS", "0"),
            ("CONTACTS_FILE", "contacts.json"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.requests_per_second, 3);
        assert_eq!(config.feed_timeout, None);
        assert_eq!(config.contacts_file, Some(PathBuf::from("contacts.json")));

        assert!(matches!(
            load(&[("SINPE_API_TOKEN", "t"), ("SINPE_RATE_LIMIT", "fast")]),
            Err(ConfigError::Invalid { name: "SINPE_RATE_LIMIT", .. })
        ));
        assert!(matches!(
            load(&[("SINPE_API_TOKEN", "t"), ("SINPE_RATE_LIMIT", "0")]),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
