//! Process configuration.

use core_config::{ConfigError, Environment, FromEnv, env_or_default, env_parse};
use database::mongodb::MongoConfig;
use domain_users::{EventDelivery, KafkaConfig};
use grpc_client::server::ServerConfig;
use std::time::Duration;

pub const DEFAULT_COLLECTION: &str = "users";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongo: MongoConfig,
    /// `USERS_COLLECTION` (default: users)
    pub collection: String,
    /// `USERS_CALL_TIMEOUT_MS` (default: 5000)
    pub call_timeout: Duration,
    /// `USERS_EVENT_DELIVERY` best_effort | required (default: best_effort)
    pub event_delivery: EventDelivery,
    /// `None` when `KAFKA_BROKERS` is unset
    pub kafka: Option<KafkaConfig>,
    /// `HEALTH_POLL_INTERVAL_SECS` (default: 5)
    pub health_poll_interval: Duration,
}

impl FromEnv for AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let call_timeout_ms: u64 = env_parse("USERS_CALL_TIMEOUT_MS", 5000)?;
        if call_timeout_ms == 0 {
            return Err(ConfigError::ParseError {
                key: "USERS_CALL_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            mongo: MongoConfig::from_env()?.with_app_name("users-grpc"),
            collection: env_or_default("USERS_COLLECTION", DEFAULT_COLLECTION),
            call_timeout: Duration::from_millis(call_timeout_ms),
            event_delivery: env_parse("USERS_EVENT_DELIVERY", EventDelivery::BestEffort)?,
            kafka: KafkaConfig::from_env_optional()?,
            health_poll_interval: Duration::from_secs(env_parse("HEALTH_POLL_INTERVAL_SECS", 5u64)?.max(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [(&str, Option<&str>); 2] = [
        ("MONGODB_URL", Some("mongodb://localhost:27017")),
        ("MONGODB_DATABASE", Some("userDB")),
    ];

    #[test]
    fn test_defaults() {
        let vars = BASE.into_iter().chain([
            ("USERS_COLLECTION", None),
            ("USERS_CALL_TIMEOUT_MS", None),
            ("USERS_EVENT_DELIVERY", None),
            ("KAFKA_BROKERS", None),
            ("HEALTH_POLL_INTERVAL_SECS", None),
            ("GRPC_PORT", None),
        ]);
        temp_env::with_vars(vars.collect::<Vec<_>>(), || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.collection, "users");
            assert_eq!(config.call_timeout, Duration::from_secs(5));
            assert_eq!(config.event_delivery, EventDelivery::BestEffort);
            assert!(config.kafka.is_none());
            assert_eq!(config.health_poll_interval, Duration::from_secs(5));
            assert_eq!(config.server.port, 50051);
            assert_eq!(config.mongo.app_name.as_deref(), Some("users-grpc"));
        });
    }

    #[test]
    fn test_overrides() {
        let vars = BASE.into_iter().chain([
            ("USERS_COLLECTION", Some("accounts")),
            ("USERS_CALL_TIMEOUT_MS", Some("250")),
            ("USERS_EVENT_DELIVERY", Some("required")),
            ("KAFKA_BROKERS", Some("kafka:9092")),
            ("USERS_KAFKA_TOPIC", None),
            ("HEALTH_POLL_INTERVAL_SECS", Some("0")),
        ]);
        temp_env::with_vars(vars.collect::<Vec<_>>(), || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.collection, "accounts");
            assert_eq!(config.call_timeout, Duration::from_millis(250));
            assert_eq!(config.event_delivery, EventDelivery::Required);
            let kafka = config.kafka.unwrap();
            assert_eq!(kafka.brokers, vec!["kafka:9092".to_string()]);
            assert_eq!(kafka.topic, "user-topic");
            assert_eq!(config.health_poll_interval, Duration::from_secs(1));
        });
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let vars = BASE.into_iter().chain([("USERS_CALL_TIMEOUT_MS", Some("0"))]);
        temp_env::with_vars(vars.collect::<Vec<_>>(), || {
            assert!(AppConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_requires_mongo_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGODB_DATABASE", Some("userDB")),
            ],
            || {
                assert!(matches!(
                    AppConfig::from_env(),
                    Err(ConfigError::MissingEnvVar(_))
                ));
            },
        );
    }
}
