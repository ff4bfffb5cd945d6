//! Users gRPC Service
//!
//! A microservice for managing user accounts via gRPC.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   ↓ (gRPC, optional Zstd compression, grpc-timeout honoured)
//! UsersGrpcService (service.rs)
//!   ↓ (proto ↔ domain conversions, conversions.rs)
//! UserService (domain_users)
//!   ├─→ MongoUserRepository → MongoDB
//!   └─→ KafkaNotifier       → Kafka topic (optional)
//! ```
//!
//! ## Modules
//!
//! - `config`: Process configuration from the environment
//! - `server`: Server initialization and lifecycle
//! - `service`: gRPC service implementation (UsersGrpcService)
//! - `health`: Dependency checks feeding grpc.health.v1.Health

pub mod config;
pub mod conversions;
pub mod health;
pub mod server;
pub mod service;

// Re-export for convenience
pub use config::AppConfig;
pub use server::run;
pub use service::UsersGrpcService;
