use tonic::metadata::MetadataValue;
use tonic::{Request, Status};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CLIENT_NAME_HEADER: &str = "x-client-name";

/// Tags each outgoing call with a fresh `x-request-id` and the caller's name,
/// so server logs can be correlated with client logs.
///
/// ```ignore
/// let client = UsersServiceClient::with_interceptor(channel, TracingInterceptor::new("users-demo-client"));
/// ```
#[derive(Clone, Debug)]
pub struct TracingInterceptor {
    client_name: MetadataValue<tonic::metadata::Ascii>,
}

impl TracingInterceptor {
    /// Non-ASCII names are replaced with `unknown`.
    pub fn new(client_name: &str) -> Self {
        let client_name = client_name
            .parse()
            .unwrap_or_else(|_| MetadataValue::from_static("unknown"));
        Self { client_name }
    }
}

impl tonic::service::Interceptor for TracingInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let value = request_id
            .parse()
            .map_err(|_| Status::internal("Failed to create request ID"))?;

        let metadata = request.metadata_mut();
        metadata.insert(REQUEST_ID_HEADER, value);
        metadata.insert(CLIENT_NAME_HEADER, self.client_name.clone());

        tracing::debug!(target: "grpc_client", request_id = %request_id, "Outgoing gRPC request");

        Ok(request)
    }
}
