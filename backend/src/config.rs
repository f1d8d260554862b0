//! Server configuration.
//!
//! Built once at startup and handed to the server; nothing reads the
//! environment after that. Precedence, lowest first: defaults, environment
//! (including a `.env` file loaded by the binary), command-line flags.
//!
//! | Variable                    | Default     |
//! |-----------------------------|-------------|
//! | `GRIDCALC_HOST`             | `127.0.0.1` |
//! | `GRIDCALC_PORT`             | `8080`      |
//! | `GRIDCALC_MAX_UPLOAD_BYTES` | 10 MiB      |

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_HOST: &str = "GRIDCALC_HOST";
pub const ENV_PORT: &str = "GRIDCALC_PORT";
pub const ENV_MAX_UPLOAD_BYTES: &str = "GRIDCALC_MAX_UPLOAD_BYTES";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Everything the HTTP server needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Interface to bind. Use `0.0.0.0` to listen on all interfaces.
    pub host: IpAddr,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `GRIDCALC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = parse_var(&lookup, ENV_HOST)? {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, ENV_PORT)? {
            config.port = port;
        }
        if let Some(limit) = parse_var(&lookup, ENV_MAX_UPLOAD_BYTES)? {
            config.max_upload_bytes = limit;
        }

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
