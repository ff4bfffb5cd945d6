//! # gRPC helpers
//!
//! Shared plumbing for the gRPC services in this workspace and their clients.
//!
//! - [`server`]: listener configuration, startup logging, health reporter,
//!   shutdown signal
//! - [`conversions`]: wire formats that protobuf does not model natively
//!   (RFC 3339 timestamps, the `grpc-timeout` header)
//! - [`channel`]: client channel creation with sane timeouts
//! - [`interceptors`]: request-id propagation for outgoing calls
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::{create_channel, ChannelConfig, TracingInterceptor};
//! use rpc::users::v1::users_service_client::UsersServiceClient;
//!
//! let channel = create_channel("http://[::1]:50051", ChannelConfig::default()).await?;
//! let client = UsersServiceClient::with_interceptor(channel, TracingInterceptor::new("cli"));
//! ```

pub mod channel;
pub mod conversions;
pub mod error;
pub mod interceptors;
pub mod server;

pub use channel::{ChannelConfig, create_channel};
pub use error::{GrpcError, GrpcResult};
pub use interceptors::TracingInterceptor;
