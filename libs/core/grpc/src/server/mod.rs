//! gRPC server helpers.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use grpc_client::server::{GrpcServer, ServerConfig, create_health_service};
//! use rpc::users::v1::users_service_server::{UsersServiceServer, SERVICE_NAME};
//! use tonic::codec::CompressionEncoding;
//! use tonic::transport::Server;
//!
//! let config = ServerConfig::from_env()?;
//! let (health_reporter, health_service) = create_health_service();
//! GrpcServer::log_startup(&config, &[SERVICE_NAME]);
//!
//! Server::builder()
//!     .add_service(health_service)
//!     .add_service(
//!         UsersServiceServer::new(my_impl)
//!             .accept_compressed(CompressionEncoding::Zstd)
//!             .send_compressed(CompressionEncoding::Zstd),
//!     )
//!     .serve_with_shutdown(config.socket_addr()?, GrpcServer::shutdown_signal())
//!     .await?;
//! ```

mod builder;
mod config;

pub use builder::{GrpcServer, create_health_service};
pub use config::ServerConfig;
