//! Users gRPC Service binary

use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    core_config::tracing::install_color_eyre();
    users_grpc::run().await
}
