use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

/// Server settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    /// Only this origin may call the API. `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("HUDDLE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("HUDDLE_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("HUDDLE_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let db_path: PathBuf = get("HUDDLE_DB_PATH").unwrap_or_else(|| "huddle.db".into()).into();

        let cors_origin = get("HUDDLE_CORS_ORIGIN")
            .filter(|v| !v.is_empty())
            .map(|v| HeaderValue::from_str(&v).context("HUDDLE_CORS_ORIGIN is not a valid origin"))
            .transpose()?;

        Ok(Self {
            addr,
            db_path,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(cfg.db_path, PathBuf::from("huddle.db"));
        assert!(cfg.cors_origin.is_none());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("HUDDLE_HOST", "127.0.0.1"),
            ("HUDDLE_PORT", "8080"),
            ("HUDDLE_DB_PATH", "/tmp/chat.db"),
            ("HUDDLE_CORS_ORIGIN", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/chat.db"));
        assert_eq!(cfg.cors_origin.unwrap(), "http://localhost:3000");
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("HUDDLE_PORT", "not-a-port")]).is_err());
        assert!(config(&[("HUDDLE_PORT", "70000")]).is_err());
    }
}
