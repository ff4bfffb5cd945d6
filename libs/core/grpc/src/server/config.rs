//! Server configuration loaded from environment variables.

use core_config::{ConfigError, FromEnv, env_flag, env_or_default, env_parse};
use std::net::SocketAddr;

const DEFAULT_MAX_MESSAGE_SIZE: usize = 8 * 1024 * 1024;

/// Configuration for a gRPC server listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: [::1] for IPv6 localhost)
    pub host: String,
    pub port: u16,
    /// Accept and send Zstd-compressed messages (default: true)
    pub enable_compression: bool,
    /// Maximum message size, both directions (default: 8MB)
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "[::1]".to_string(),
            port: 50051,
            enable_compression: true,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.addr_string().parse()
    }

    pub fn addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads:
/// - `GRPC_HOST` (default: [::1])
/// - `GRPC_PORT` (default: 50051)
/// - `GRPC_COMPRESSION` (default: true)
/// - `GRPC_MAX_MESSAGE_SIZE` (default: 8388608)
impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or_default("GRPC_HOST", &defaults.host),
            port: env_parse("GRPC_PORT", defaults.port)?,
            enable_compression: env_flag("GRPC_COMPRESSION", defaults.enable_compression)?,
            max_message_size: env_parse("GRPC_MAX_MESSAGE_SIZE", defaults.max_message_size)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr_string(), "[::1]:50051");
        assert!(config.enable_compression);
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ServerConfig::default()
            .with_host("0.0.0.0")
            .with_port(8080)
            .with_compression(false);

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("GRPC_HOST", Some("0.0.0.0")),
                ("GRPC_PORT", Some("6000")),
                ("GRPC_COMPRESSION", Some("false")),
                ("GRPC_MAX_MESSAGE_SIZE", None),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.addr_string(), "0.0.0.0:6000");
                assert!(!config.enable_compression);
                assert_eq!(config.max_message_size, DEFAULT_MAX_MESSAGE_SIZE);
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        temp_env::with_var("GRPC_PORT", Some("eighty"), || {
            assert!(matches!(
                ServerConfig::from_env(),
                Err(ConfigError::ParseError { .. })
            ));
        });
    }
}
