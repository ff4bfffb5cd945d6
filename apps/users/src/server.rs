//! gRPC server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - MongoDB connection and index creation
//! - Optional Kafka producer
//! - Service creation
//! - Health aggregation (grpc.health.v1.Health)
//! - gRPC server startup and graceful shutdown

use std::sync::Arc;

use core_config::FromEnv;
use database::common::RetryConfig;
use domain_users::{EventNotifier, KafkaNotifier, MongoUserRepository, UserService};
use eyre::{Result, WrapErr};
use grpc_client::server::{GrpcServer, create_health_service};
use rpc::users::v1::users_service_server::{SERVICE_NAME, UsersServiceServer};
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::info;

use crate::config::AppConfig;
use crate::health::{HealthAggregator, HealthCheck, MongoCheck, NotifierCheck};
use crate::service::UsersGrpcService;

/// Run the gRPC server
///
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to MongoDB with retry logic and ensures indexes
/// 3. Opens the Kafka producer when `KAFKA_BROKERS` is set
/// 4. Starts health polling and the gRPC server
/// 5. Drains in-flight calls on SIGINT/SIGTERM
pub async fn run() -> Result<()> {
    let config = AppConfig::from_env().wrap_err("Failed to load configuration")?;
    core_config::tracing::init_tracing(&config.environment);

    info!(url = %config.mongo.redacted_url(), database = %config.mongo.database, "Connecting to MongoDB...");
    let client = database::mongodb::connect_with_retry(&config.mongo, RetryConfig::default())
        .await
        .wrap_err("Failed to connect to MongoDB")?;

    let repository =
        MongoUserRepository::with_collection(client.database(&config.mongo.database), &config.collection);
    repository
        .init_indexes()
        .await
        .wrap_err("Failed to create user indexes")?;

    let mut checks: Vec<Arc<dyn HealthCheck>> = vec![Arc::new(MongoCheck::new(client.clone()))];

    let mut service = UserService::new(repository)
        .with_call_timeout(config.call_timeout)
        .with_event_delivery(config.event_delivery);

    match config.kafka.clone() {
        Some(kafka) => {
            let notifier = tokio::task::spawn_blocking(move || KafkaNotifier::connect(&kafka))
                .await
                .wrap_err("Kafka connect task failed")?
                .wrap_err("Failed to create Kafka producer")?;
            let notifier: Arc<dyn EventNotifier> = Arc::new(notifier);

            checks.push(Arc::new(NotifierCheck::new(Arc::clone(&notifier))));
            service = service.with_notifier(notifier);
        }
        None => info!("KAFKA_BROKERS not set, user events are not published"),
    }

    let (health_reporter, health_service) = create_health_service();
    let aggregator = Arc::new(HealthAggregator::new(checks, config.health_poll_interval));
    let health_task = Arc::clone(&aggregator).spawn(health_reporter, SERVICE_NAME).await;

    let mut users_server = UsersServiceServer::new(UsersGrpcService::new(service))
        .max_decoding_message_size(config.server.max_message_size)
        .max_encoding_message_size(config.server.max_message_size);
    if config.server.enable_compression {
        users_server = users_server
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    let addr = config
        .server
        .socket_addr()
        .wrap_err_with(|| format!("Failed to parse server address: {}", config.server.addr_string()))?;
    GrpcServer::log_startup(&config.server, &[SERVICE_NAME]);

    let served = Server::builder()
        .add_service(health_service)
        .add_service(users_server)
        .serve_with_shutdown(addr, GrpcServer::shutdown_signal())
        .await;

    health_task.abort();
    served.wrap_err("gRPC server failed")?;

    info!("Server stopped");
    Ok(())
}
