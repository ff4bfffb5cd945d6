use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

use crate::error::{GrpcError, GrpcResult};

/// Client channel settings
#[derive(Debug, Clone)]
pub struct ChannelConfig {
  pub connect_timeout: Duration,
  /// Client-side limit for every RPC on the channel
  pub request_timeout: Duration,
  pub http2_keep_alive_interval: Option<Duration>,
  pub keep_alive_timeout: Duration,
  pub tcp_nodelay: bool,
}

impl Default for ChannelConfig {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(5),
      request_timeout: Duration::from_secs(30),
      http2_keep_alive_interval: Some(Duration::from_secs(30)),
      keep_alive_timeout: Duration::from_secs(10),
      tcp_nodelay: true,
    }
  }
}

impl ChannelConfig {
  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = timeout;
    self
  }

  pub fn without_keep_alive(mut self) -> Self {
    self.http2_keep_alive_interval = None;
    self
  }

  fn apply_to_endpoint(&self, mut endpoint: Endpoint) -> Endpoint {
    if let Some(interval) = self.http2_keep_alive_interval {
      endpoint = endpoint
        .http2_keep_alive_interval(interval)
        .keep_alive_timeout(self.keep_alive_timeout)
        .keep_alive_while_idle(true);
    }

    endpoint
      .connect_timeout(self.connect_timeout)
      .timeout(self.request_timeout)
      .tcp_nodelay(self.tcp_nodelay)
  }
}

/// Connect eagerly to `addr` so a wrong address fails here rather than on the first RPC.
///
/// ```ignore
/// let channel = create_channel("http://[::1]:50051", ChannelConfig::default()).await?;
/// ```
pub async fn create_channel(addr: impl Into<String>, config: ChannelConfig) -> GrpcResult<Channel> {
  let addr = addr.into();

  let endpoint = Endpoint::from_shared(addr.clone()).map_err(|e| {
    tracing::error!(target: "grpc_client", addr = %addr, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  tracing::debug!(target: "grpc_client", addr = %addr, "Creating gRPC channel");

  let endpoint = config.apply_to_endpoint(endpoint);
  let connect = endpoint.connect();
  match tokio::time::timeout(config.connect_timeout, connect).await {
    Ok(Ok(channel)) => Ok(channel),
    Ok(Err(e)) => {
      tracing::error!(target: "grpc_client", addr = %addr, error = ?e, "Failed to connect");
      Err(GrpcError::ConnectionFailed(e))
    }
    Err(_) => Err(GrpcError::ConnectionTimeout(config.connect_timeout)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builder() {
    let config = ChannelConfig::default()
      .with_connect_timeout(Duration::from_secs(1))
      .with_request_timeout(Duration::from_secs(2))
      .without_keep_alive();

    assert_eq!(config.connect_timeout, Duration::from_secs(1));
    assert_eq!(config.request_timeout, Duration::from_secs(2));
    assert!(config.http2_keep_alive_interval.is_none());
  }

  #[tokio::test]
  async fn test_invalid_uri() {
    let result = create_channel("not a valid uri", ChannelConfig::default()).await;
    assert!(matches!(result, Err(GrpcError::InvalidUri(_))));
  }

  #[tokio::test]
  async fn test_nothing_listening() {
    let config = ChannelConfig::default().with_connect_timeout(Duration::from_millis(500));
    let result = create_channel("http://127.0.0.1:9", config).await;
    assert!(result.is_err());
  }
}
