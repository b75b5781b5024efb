use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5001;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const MEMORY_URL: &str = "memory";

/// Ports the frontend dev servers usually hold.
const RESERVED_PORTS: [u16; 2] = [3000, 5000];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match lookup("HOST") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value,
            })?,
            None => DEFAULT_HOST,
        };

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };
        let port = if RESERVED_PORTS.contains(&port) {
            warn!(from = port, to = DEFAULT_PORT, "port clashes with the frontend, overriding");
            DEFAULT_PORT
        } else {
            port
        };
        info!(port, "configured port");

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            warn!("DATABASE_URL not set, records will only live in memory");
            MEMORY_URL.to_string()
        });

        Ok(Self {
            host,
            port,
            database_url,
        })
    }
}
