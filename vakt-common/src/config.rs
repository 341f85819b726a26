//! Key-value store configuration and config file resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Connection settings for the hosted key-value store REST API
#[derive(Debug, Clone)]
pub struct KvConfig {
    pub url: String,
    pub token: String,
}

/// Accepted environment naming conventions, in priority order.
/// The first pair with a non-empty URL and token wins.
const ENV_CONVENTIONS: [(&str, &str); 2] = [
    ("VAKT_KV_REST_API_URL", "VAKT_KV_REST_API_TOKEN"),
    ("UPSTASH_REDIS_REST_URL", "UPSTASH_REDIS_REST_TOKEN"),
];

impl KvConfig {
    /// Resolve store credentials from the environment
    pub fn from_env() -> Result<Self> {
        for (url_var, token_var) in ENV_CONVENTIONS {
            let url = std::env::var(url_var).unwrap_or_default();
            let token = std::env::var(token_var).unwrap_or_default();
            if !url.is_empty() && !token.is_empty() {
                return Ok(KvConfig {
                    url: url.trim_end_matches('/').to_string(),
                    token,
                });
            }
        }
        Err(Error::Config(format!(
            "no key-value store credentials found; set {}/{} (or {}/{})",
            ENV_CONVENTIONS[0].0, ENV_CONVENTIONS[0].1, ENV_CONVENTIONS[1].0, ENV_CONVENTIONS[1].1,
        )))
    }
}

/// Default configuration file location for the platform
///
/// Linux prefers `~/.config/vakt/config.toml`, then `/etc/vakt/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("vakt").join("config.toml"));

    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/vakt/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for (url_var, token_var) in ENV_CONVENTIONS {
            std::env::remove_var(url_var);
            std::env::remove_var(token_var);
        }
    }

    #[test]
    #[serial]
    fn test_primary_convention_wins() {
        clear_env();
        std::env::set_var("VAKT_KV_REST_API_URL", "https://kv.primary.example/");
        std::env::set_var("VAKT_KV_REST_API_TOKEN", "tok-primary");
        std::env::set_var("UPSTASH_REDIS_REST_URL", "https://kv.fallback.example");
        std::env::set_var("UPSTASH_REDIS_REST_TOKEN", "tok-fallback");

        let config = KvConfig::from_env().unwrap();
        assert_eq!(config.url, "https://kv.primary.example");
        assert_eq!(config.token, "tok-primary");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_primary_falls_through() {
        clear_env();
        std::env::set_var("VAKT_KV_REST_API_URL", "");
        std::env::set_var("VAKT_KV_REST_API_TOKEN", "");
        std::env::set_var("UPSTASH_REDIS_REST_URL", "https://kv.fallback.example");
        std::env::set_var("UPSTASH_REDIS_REST_TOKEN", "tok-fallback");

        let config = KvConfig::from_env().unwrap();
        assert_eq!(config.url, "https://kv.fallback.example");
        assert_eq!(config.token, "tok-fallback");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_credentials_is_config_error() {
        clear_env();
        match KvConfig::from_env() {
            Err(Error::Config(_)) => {}
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
