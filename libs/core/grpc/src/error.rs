use std::time::Duration;
use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while creating a client channel
#[derive(Error, Debug)]
pub enum GrpcError {
  #[error("Invalid URI: {0}")]
  InvalidUri(#[source] tonic::transport::Error),

  #[error("Connection failed: {0}")]
  ConnectionFailed(#[source] tonic::transport::Error),

  #[error("Connection timeout after {0:?}")]
  ConnectionTimeout(Duration),
}

impl From<GrpcError> for tonic::Status {
  fn from(err: GrpcError) -> Self {
    match err {
      GrpcError::InvalidUri(_) => tonic::Status::invalid_argument(err.to_string()),
      GrpcError::ConnectionFailed(_) | GrpcError::ConnectionTimeout(_) => {
        tonic::Status::unavailable(err.to_string())
      }
    }
  }
}
