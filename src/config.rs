//! Process configuration read from the environment (and `.env`).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_MODEL_PATH: &str = "nb_model.json";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            model_path,
            host,
            port,
        })
    }

    /// `host:port` string handed to the listener, which resolves host names.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.model_path, PathBuf::from("nb_model.json"));
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MODEL_PATH", "/models/imdb.json"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/imdb.json"));
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_port() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("PORT", "70000")]).is_err());
    }
}
