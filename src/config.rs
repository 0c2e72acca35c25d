// Application Configuration
//
// Reads settings from the environment (after loading an optional .env file).
// Every setting has a default so a bare `nontonanime` run works locally.

use crate::render::RenderOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000/api/otakudesu";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway_url: String,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub render: RenderOptions,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway_url = lookup("NONTON_GATEWAY_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

        let bind_raw = lookup("NONTON_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "NONTON_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let static_dir = lookup("NONTON_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let defaults = RenderOptions::default();
        let render = RenderOptions {
            title_max: parse_len(&lookup, "NONTON_TITLE_MAX", defaults.title_max)?,
            hero_title_max: parse_len(&lookup, "NONTON_HERO_TITLE_MAX", defaults.hero_title_max)?,
        };

        Ok(Self {
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            bind_addr,
            static_dir,
            render,
        })
    }

    pub fn for_test() -> Self {
        Self {
            gateway_url: "http://test-gateway/api/otakudesu".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            static_dir: PathBuf::from("public"),
            render: RenderOptions::default(),
        }
    }
}

fn parse_len<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
    }
}
