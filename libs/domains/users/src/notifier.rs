use async_trait::async_trait;
use std::str::FromStr;
use thiserror::Error;

use crate::events::UserEvent;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Kafka error: {0}")]
    Kafka(String),

    #[error("Failed to encode event: {0}")]
    Encode(String),

    #[error("Broker rejected event for partition {partition}: {reason}")]
    Rejected { partition: i32, reason: String },

    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

/// Where a published event landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// Sink for user domain events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventNotifier: Send + Sync {
    /// Publish one event. Resolves once the broker acknowledged it.
    async fn publish(&self, event: &UserEvent) -> Result<Delivery, NotifyError>;

    /// Reachability check used by the health aggregator
    async fn ping(&self) -> Result<(), NotifyError>;
}

/// What a failed publish does to the request that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDelivery {
    /// Log and return the operation's result anyway
    #[default]
    BestEffort,
    /// Fail the request with an internal error. The store change stays.
    Required,
}

impl FromStr for EventDelivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(EventDelivery::BestEffort),
            "required" => Ok(EventDelivery::Required),
            other => Err(format!("unknown event delivery mode '{other}'")),
        }
    }
}
