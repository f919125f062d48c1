use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub storage_root: PathBuf,
    pub storage_public_url: String,
    pub notify_webhook_url: Option<String>,
    pub per_page: u32,
    pub seed_demo: bool,
}

impl Config {
    /// Reads settings from the environment, loading `.env` first when present.
    pub fn new_from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `new_from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://marketplace.db".to_string());

        let storage_root = lookup("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./storage"));

        let storage_public_url =
            lookup("STORAGE_PUBLIC_URL").unwrap_or_else(|| "/storage".to_string());

        let notify_webhook_url = lookup("NOTIFY_WEBHOOK_URL").filter(|url| !url.trim().is_empty());

        let per_page = match lookup("PER_PAGE") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("PER_PAGE".to_string(), raw))?,
            None => 9,
        };

        let seed_demo = match lookup("SEED_DEMO").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "SEED_DEMO".to_string(),
                    other.to_string(),
                ));
            }
        };

        Ok(Self {
            bind_address,
            database_url,
            storage_root,
            storage_public_url,
            notify_webhook_url,
            per_page,
            seed_demo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.per_page, 9);
        assert!(!config.seed_demo);
        assert!(config.notify_webhook_url.is_none());
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            config(&[("PER_PAGE", "0")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "PER_PAGE"
        ));
        assert!(matches!(
            config(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "BIND_ADDRESS"
        ));
        assert!(config(&[("SEED_DEMO", "maybe")]).is_err());
    }

    #[test]
    fn blank_webhook_is_ignored() {
        let config = config(&[("NOTIFY_WEBHOOK_URL", "  "), ("SEED_DEMO", "true")]).unwrap();
        assert!(config.notify_webhook_url.is_none());
        assert!(config.seed_demo);
    }
}
