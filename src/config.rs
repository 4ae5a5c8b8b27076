use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_var("HOST", "127.0.0.1")?,
            port: parse_var("PORT", "3000")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://todos.db".to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "5")?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default() {
        let port: u16 = parse_var("TODO_API_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn parse_var_rejects_garbage_default() {
        let err = parse_var::<u16>("TODO_API_TEST_UNSET_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("TODO_API_TEST_UNSET_PORT"));
    }
}
