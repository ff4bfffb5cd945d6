//! Walks a running server through create → get → update → get → list → delete.
//!
//! ```text
//! USERS_SERVER_ADDR=http://[::1]:50051 cargo run --bin users-demo-client
//! ```

use core_config::{Environment, env_or_default};
use eyre::{Result, WrapErr};
use grpc_client::{ChannelConfig, TracingInterceptor, create_channel};
use rpc::users::v1::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UpdateUserRequest,
    users_service_client::UsersServiceClient,
};
use tonic::codec::CompressionEncoding;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    core_config::tracing::install_color_eyre();
    core_config::tracing::init_tracing(&Environment::from_env());

    let addr = env_or_default("USERS_SERVER_ADDR", "http://[::1]:50051");
    let channel = create_channel(addr.clone(), ChannelConfig::default())
        .await
        .wrap_err_with(|| format!("Failed to connect to {addr}"))?;
    let mut client =
        UsersServiceClient::with_interceptor(channel, TracingInterceptor::new("users-demo-client"))
            .send_compressed(CompressionEncoding::Zstd)
            .accept_compressed(CompressionEncoding::Zstd);

    let created = client
        .create_user(CreateUserRequest {
            first_name: "Mohammed".into(),
            last_name: "Salah".into(),
            nickname: "Mo".into(),
            password: "word5678".into(),
            email: "mo.salah@example.com".into(),
            country: "EG".into(),
        })
        .await
        .wrap_err("CreateUser failed")?
        .into_inner();
    info!(id = %created.id, created_at = %created.created_at, "Created user");

    let fetched = client
        .get_user(GetUserRequest { id: created.id.clone() })
        .await
        .wrap_err("GetUser failed")?
        .into_inner();
    info!(user = ?fetched, "Fetched user");

    let updated = client
        .update_user(UpdateUserRequest {
            id: created.id.clone(),
            nickname: Some("Egyptian King".into()),
            ..Default::default()
        })
        .await
        .wrap_err("UpdateUser failed")?
        .into_inner();
    info!(nickname = %updated.nickname, updated_at = %updated.updated_at, "Updated user");

    let refetched = client
        .get_user(GetUserRequest { id: created.id.clone() })
        .await
        .wrap_err("GetUser failed")?
        .into_inner();
    info!(user = ?refetched, "Fetched user after update");

    let page = client
        .list_users(ListUsersRequest {
            page: 1,
            page_size: 10,
            country: Some("EG".into()),
            last_name: None,
        })
        .await
        .wrap_err("ListUsers failed")?
        .into_inner();
    info!(returned = page.users.len(), total_count = page.total_count, "Listed users in EG");

    let deleted = client
        .delete_user(DeleteUserRequest { id: created.id.clone() })
        .await
        .wrap_err("DeleteUser failed")?
        .into_inner();
    info!(id = %created.id, success = deleted.success, "Deleted user");

    Ok(())
}
