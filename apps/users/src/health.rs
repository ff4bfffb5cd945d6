//! Dependency health.
//!
//! A background task checks every dependency on a fixed interval and feeds
//! the combined result to `grpc.health.v1.Health`. The service reports
//! `SERVING` only while every check passes.

use async_trait::async_trait;
use database::mongodb::{Client, check_health_detailed};
use domain_users::EventNotifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;
use tracing::{info, warn};

#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    /// `Err` carries the reason the dependency is unusable
    async fn check(&self) -> Result<(), String>;
}

pub struct MongoCheck {
    client: Client,
}

impl MongoCheck {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthCheck for MongoCheck {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn check(&self) -> Result<(), String> {
        let status = check_health_detailed(&self.client).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
        }
    }
}

pub struct NotifierCheck {
    notifier: Arc<dyn EventNotifier>,
}

impl NotifierCheck {
    pub fn new(notifier: Arc<dyn EventNotifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl HealthCheck for NotifierCheck {
    fn name(&self) -> &str {
        "kafka"
    }

    async fn check(&self) -> Result<(), String> {
        self.notifier.ping().await.map_err(|e| e.to_string())
    }
}

/// Latest aggregated result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub serving: bool,
    /// `(check name, reason)` for every failing check
    pub failures: Vec<(String, String)>,
}

impl HealthSnapshot {
    fn starting() -> Self {
        Self {
            serving: false,
            failures: vec![("startup".to_string(), "not checked yet".to_string())],
        }
    }

    pub fn status(&self) -> ServingStatus {
        if self.serving {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        }
    }
}

pub struct HealthAggregator {
    checks: Vec<Arc<dyn HealthCheck>>,
    interval: Duration,
    state: watch::Sender<HealthSnapshot>,
}

impl HealthAggregator {
    pub fn new(checks: Vec<Arc<dyn HealthCheck>>, interval: Duration) -> Self {
        let (state, _) = watch::channel(HealthSnapshot::starting());
        Self {
            checks,
            interval,
            state,
        }
    }

    pub fn current(&self) -> HealthSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.state.subscribe()
    }

    /// Run every check once and store the result. Returns `true` when the
    /// overall status flipped.
    pub async fn poll_once(&self) -> bool {
        let mut failures = Vec::new();
        for check in &self.checks {
            let outcome = match tokio::time::timeout(self.interval, check.check()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(format!("no answer within {}ms", self.interval.as_millis())),
            };
            if let Err(reason) = outcome {
                failures.push((check.name().to_string(), reason));
            }
        }

        let next = HealthSnapshot {
            serving: failures.is_empty(),
            failures,
        };

        let mut flipped = false;
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            flipped = current.serving != next.serving;
            *current = next;
            true
        });

        if flipped {
            let snapshot = self.current();
            if snapshot.serving {
                info!("All dependencies healthy, serving");
            } else {
                warn!(failures = ?snapshot.failures, "Dependency unhealthy, not serving");
            }
        }
        flipped
    }

    /// Poll forever, mirroring each change into `reporter` under
    /// `service_name` and the empty (whole server) name. Both entries read
    /// `NOT_SERVING` by the time this returns and stay there until a poll
    /// passes.
    ///
    /// Abort the returned handle to stop.
    pub async fn spawn(self: Arc<Self>, reporter: HealthReporter, service_name: &'static str) -> JoinHandle<()> {
        let initial = self.current().status();
        reporter.set_service_status(service_name, initial).await;
        reporter.set_service_status("", initial).await;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last = Some(initial);

            loop {
                ticker.tick().await;
                self.poll_once().await;

                let status = self.current().status();
                if last != Some(status) {
                    reporter.set_service_status(service_name, status).await;
                    reporter.set_service_status("", status).await;
                    last = Some(status);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tonic::Request;
    use tonic_health::pb::HealthCheckRequest;
    use tonic_health::pb::health_check_response::ServingStatus as PbServingStatus;
    use tonic_health::pb::health_server::Health;
    use tonic_health::server::HealthService;

    struct Toggle {
        name: &'static str,
        up: AtomicBool,
    }

    impl Toggle {
        fn new(name: &'static str, up: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                up: AtomicBool::new(up),
            })
        }

        fn set(&self, up: bool) {
            self.up.store(up, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl HealthCheck for Toggle {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> Result<(), String> {
            if self.up.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err("down".to_string())
            }
        }
    }

    struct Hangs;

    #[async_trait]
    impl HealthCheck for Hangs {
        fn name(&self) -> &str {
            "hangs"
        }

        async fn check(&self) -> Result<(), String> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_starts_not_serving() {
        let aggregator = HealthAggregator::new(vec![], Duration::from_secs(5));
        assert!(!aggregator.current().serving);
        assert_eq!(aggregator.current().status(), ServingStatus::NotServing);
    }

    #[tokio::test]
    async fn test_serving_only_when_all_pass() {
        let mongo = Toggle::new("mongodb", true);
        let kafka = Toggle::new("kafka", false);
        let aggregator = HealthAggregator::new(
            vec![mongo.clone() as Arc<dyn HealthCheck>, kafka.clone()],
            Duration::from_secs(1),
        );

        aggregator.poll_once().await;
        let snapshot = aggregator.current();
        assert!(!snapshot.serving);
        assert_eq!(snapshot.failures, vec![("kafka".to_string(), "down".to_string())]);

        kafka.set(true);
        assert!(aggregator.poll_once().await);
        assert!(aggregator.current().serving);
        assert!(aggregator.current().failures.is_empty());

        // no flip when nothing changed
        assert!(!aggregator.poll_once().await);

        mongo.set(false);
        assert!(aggregator.poll_once().await);
        assert_eq!(aggregator.current().status(), ServingStatus::NotServing);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let check = Toggle::new("mongodb", true);
        let aggregator =
            HealthAggregator::new(vec![check as Arc<dyn HealthCheck>], Duration::from_secs(1));
        let mut rx = aggregator.subscribe();

        aggregator.poll_once().await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().serving);
    }

    #[tokio::test]
    async fn test_hanging_check_counts_as_failure() {
        let hangs: Arc<dyn HealthCheck> = Arc::new(Hangs);
        let aggregator = HealthAggregator::new(vec![hangs], Duration::from_millis(20));
        aggregator.poll_once().await;

        let snapshot = aggregator.current();
        assert!(!snapshot.serving);
        assert_eq!(snapshot.failures[0].0, "hangs");
    }

    #[tokio::test]
    async fn test_spawned_task_polls_until_aborted() {
        let check = Toggle::new("mongodb", true);
        let aggregator = Arc::new(HealthAggregator::new(
            vec![check as Arc<dyn HealthCheck>],
            Duration::from_millis(10),
        ));
        let mut rx = aggregator.subscribe();
        let (reporter, _service) = tonic_health::server::health_reporter();

        let handle = Arc::clone(&aggregator).spawn(reporter, "users.v1.UsersService").await;
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(aggregator.current().serving);

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }

    async fn reported(service: &HealthService, name: &str) -> i32 {
        service
            .check(Request::new(HealthCheckRequest {
                service: name.to_string(),
            }))
            .await
            .unwrap()
            .into_inner()
            .status
    }

    struct SlowFailure;

    #[async_trait]
    impl HealthCheck for SlowFailure {
        fn name(&self) -> &str {
            "mongodb"
        }

        async fn check(&self) -> Result<(), String> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Err("connection refused".to_string())
        }
    }

    #[tokio::test]
    async fn test_not_serving_before_first_poll_finishes() {
        let slow: Arc<dyn HealthCheck> = Arc::new(SlowFailure);
        let aggregator = Arc::new(HealthAggregator::new(vec![slow], Duration::from_secs(2)));
        let reporter = HealthReporter::new();
        let service = HealthService::from_health_reporter(reporter.clone());

        let handle = Arc::clone(&aggregator).spawn(reporter, "users.v1.UsersService").await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let not_serving = PbServingStatus::NotServing as i32;
        assert_eq!(reported(&service, "").await, not_serving);
        assert_eq!(reported(&service, "users.v1.UsersService").await, not_serving);

        handle.abort();
    }

    #[tokio::test]
    async fn test_reporter_follows_passing_poll() {
        let check = Toggle::new("mongodb", true);
        let aggregator = Arc::new(HealthAggregator::new(
            vec![check as Arc<dyn HealthCheck>],
            Duration::from_millis(10),
        ));
        let reporter = HealthReporter::new();
        let service = HealthService::from_health_reporter(reporter.clone());

        let handle = Arc::clone(&aggregator).spawn(reporter, "users.v1.UsersService").await;

        let serving = PbServingStatus::Serving as i32;
        tokio::time::timeout(Duration::from_secs(2), async {
            while reported(&service, "").await != serving {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(reported(&service, "users.v1.UsersService").await, serving);

        handle.abort();
    }
}
