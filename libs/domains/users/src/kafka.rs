//! Kafka-backed [`EventNotifier`].
//!
//! The `kafka` crate is synchronous, so the producer sits behind a mutex
//! and every call runs on tokio's blocking pool.

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse};
use kafka::client::{KafkaClient, ProduceConfirm};
use kafka::producer::{Producer, Record, RequiredAcks};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::events::UserEvent;
use crate::notifier::{Delivery, EventNotifier, NotifyError};

pub const DEFAULT_TOPIC: &str = "user-topic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acks {
    None,
    One,
    #[default]
    All,
}

impl FromStr for Acks {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "0" => Ok(Acks::None),
            "one" | "1" => Ok(Acks::One),
            "all" | "-1" => Ok(Acks::All),
            other => Err(format!("unknown acks setting '{other}'")),
        }
    }
}

impl From<Acks> for RequiredAcks {
    fn from(acks: Acks) -> Self {
        match acks {
            Acks::None => RequiredAcks::None,
            Acks::One => RequiredAcks::One,
            Acks::All => RequiredAcks::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub ack_timeout: Duration,
    pub required_acks: Acks,
    pub client_id: String,
}

impl KafkaConfig {
    pub fn new(brokers: Vec<String>) -> Self {
        Self {
            brokers,
            topic: DEFAULT_TOPIC.to_string(),
            ack_timeout: Duration::from_secs(1),
            required_acks: Acks::All,
            client_id: "users-grpc".to_string(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_required_acks(mut self, acks: Acks) -> Self {
        self.required_acks = acks;
        self
    }

    /// `None` when `KAFKA_BROKERS` is not set, which disables publishing.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        if env_optional("KAFKA_BROKERS").is_none() {
            return Ok(None);
        }
        Self::from_env().map(Some)
    }
}

fn split_brokers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

/// Environment variables:
/// - `KAFKA_BROKERS` comma separated `host:port` list (required)
/// - `USERS_KAFKA_TOPIC` (default: user-topic)
/// - `KAFKA_ACK_TIMEOUT_MS` (default: 1000)
/// - `KAFKA_REQUIRED_ACKS` none | one | all (default: all)
/// - `KAFKA_CLIENT_ID` (default: users-grpc)
impl FromEnv for KafkaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_optional("KAFKA_BROKERS")
            .ok_or_else(|| ConfigError::MissingEnvVar("KAFKA_BROKERS".to_string()))?;
        let brokers = split_brokers(&raw);
        if brokers.is_empty() {
            return Err(ConfigError::ParseError {
                key: "KAFKA_BROKERS".to_string(),
                details: "no broker addresses".to_string(),
            });
        }

        Ok(Self {
            brokers,
            topic: env_or_default("USERS_KAFKA_TOPIC", DEFAULT_TOPIC),
            ack_timeout: Duration::from_millis(env_parse("KAFKA_ACK_TIMEOUT_MS", 1000u64)?),
            required_acks: env_parse("KAFKA_REQUIRED_ACKS", Acks::All)?,
            client_id: env_or_default("KAFKA_CLIENT_ID", "users-grpc"),
        })
    }
}

pub struct KafkaNotifier {
    topic: String,
    producer: Arc<Mutex<Producer>>,
    metadata: Arc<Mutex<KafkaClient>>,
}

impl KafkaNotifier {
    /// Open a producer against `config.brokers`.
    ///
    /// Blocks while the producer fetches cluster metadata; call it from
    /// `spawn_blocking` inside a runtime.
    pub fn connect(config: &KafkaConfig) -> Result<Self, NotifyError> {
        let producer = Producer::from_hosts(config.brokers.clone())
            .with_ack_timeout(config.ack_timeout)
            .with_required_acks(config.required_acks.into())
            .with_client_id(config.client_id.clone())
            .create()
            .map_err(|e| NotifyError::Kafka(e.to_string()))?;

        let mut metadata = KafkaClient::new(config.brokers.clone());
        metadata.set_client_id(config.client_id.clone());

        tracing::info!(
            brokers = ?config.brokers,
            topic = %config.topic,
            acks = ?config.required_acks,
            "Kafka producer ready"
        );

        Ok(Self {
            topic: config.topic.clone(),
            producer: Arc::new(Mutex::new(producer)),
            metadata: Arc::new(Mutex::new(metadata)),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Reduce the broker's confirmations for a single record to one [`Delivery`].
///
/// Without acks the broker sends nothing back and the delivery is reported
/// with partition and offset `-1`.
pub fn delivery_from_confirms(confirms: Vec<ProduceConfirm>) -> Result<Delivery, NotifyError> {
    let Some(confirm) = confirms.into_iter().next() else {
        return Ok(Delivery { partition: -1, offset: -1 });
    };
    let Some(partition) = confirm.partition_confirms.into_iter().next() else {
        return Ok(Delivery { partition: -1, offset: -1 });
    };

    match partition.offset {
        Ok(offset) => Ok(Delivery {
            partition: partition.partition,
            offset,
        }),
        Err(code) => Err(NotifyError::Rejected {
            partition: partition.partition,
            reason: format!("{code:?}"),
        }),
    }
}

#[async_trait]
impl EventNotifier for KafkaNotifier {
    #[instrument(skip(self, event), fields(event = %event.event, topic = %self.topic))]
    async fn publish(&self, event: &UserEvent) -> Result<Delivery, NotifyError> {
        let payload = event.to_json().map_err(|e| NotifyError::Encode(e.to_string()))?;
        let producer = Arc::clone(&self.producer);
        let topic = self.topic.clone();

        let confirms = tokio::task::spawn_blocking(move || {
            let mut producer = producer
                .lock()
                .map_err(|_| NotifyError::Unavailable("producer lock poisoned".to_string()))?;
            producer
                .send_all(&[Record::from_value(topic.as_str(), payload.as_slice())])
                .map_err(|e| NotifyError::Kafka(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Unavailable(e.to_string()))??;

        let delivery = delivery_from_confirms(confirms)?;
        debug!(partition = delivery.partition, offset = delivery.offset, "Event published");
        Ok(delivery)
    }

    async fn ping(&self) -> Result<(), NotifyError> {
        let metadata = Arc::clone(&self.metadata);
        let topic = self.topic.clone();

        tokio::task::spawn_blocking(move || {
            let mut client = metadata
                .lock()
                .map_err(|_| NotifyError::Unavailable("metadata client lock poisoned".to_string()))?;
            client
                .load_metadata(&[topic])
                .map_err(|e| NotifyError::Kafka(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Unavailable(e.to_string()))?
    }
}
