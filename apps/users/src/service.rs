//! Users gRPC service implementation
//!
//! Thin adapter: convert the request, run the domain operation under the
//! caller's deadline, convert the result. Error classification happens in
//! `From<UserError> for Status`.

use std::future::Future;
use std::time::Duration;

use domain_users::{UserRepository, UserResult, UserService};
use grpc_client::conversions::request_deadline;
use rpc::users::v1::{
    CreateUserRequest, DeleteUserRequest, DeleteUserResponse, GetUserRequest, ListUsersRequest,
    ListUsersResponse, UpdateUserRequest, User, users_service_server::UsersService,
};
use tonic::{Request, Response, Status};
use tracing::instrument;

use crate::conversions::{
    create_request_to_domain, list_request_to_domain, page_to_proto, update_request_to_domain,
    user_to_proto,
};

/// gRPC service implementation for users
///
/// Generic over the repository type for testability.
pub struct UsersGrpcService<R>
where
    R: UserRepository + 'static,
{
    service: UserService<R>,
}

impl<R> UsersGrpcService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(service: UserService<R>) -> Self {
        Self { service }
    }
}

/// Run `call`, giving up with `DEADLINE_EXCEEDED` once the caller's budget is spent.
///
/// Dropping the future on expiry cancels whatever store or broker call is in flight.
async fn within_deadline<T, F>(deadline: Option<Duration>, call: F) -> Result<T, Status>
where
    F: Future<Output = UserResult<T>>,
{
    let Some(limit) = deadline else {
        return call.await.map_err(Status::from);
    };

    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(Status::from),
        Err(_) => Err(Status::deadline_exceeded(format!(
            "Request deadline of {}ms elapsed",
            limit.as_millis()
        ))),
    }
}

#[tonic::async_trait]
impl<R> UsersService for UsersGrpcService<R>
where
    R: UserRepository + 'static,
{
    #[instrument(skip(self, request))]
    async fn create_user(&self, request: Request<CreateUserRequest>) -> Result<Response<User>, Status> {
        let deadline = request_deadline(request.metadata());
        let input = create_request_to_domain(request.into_inner());

        let user = within_deadline(deadline, self.service.create_user(input)).await?;
        Ok(Response::new(user_to_proto(user)))
    }

    #[instrument(skip(self, request))]
    async fn get_user(&self, request: Request<GetUserRequest>) -> Result<Response<User>, Status> {
        let deadline = request_deadline(request.metadata());
        let id = request.into_inner().id;

        let user = within_deadline(deadline, self.service.get_user(&id)).await?;
        Ok(Response::new(user_to_proto(user)))
    }

    #[instrument(skip(self, request))]
    async fn update_user(&self, request: Request<UpdateUserRequest>) -> Result<Response<User>, Status> {
        let deadline = request_deadline(request.metadata());
        let (id, patch) = update_request_to_domain(request.into_inner());

        let user = within_deadline(deadline, self.service.update_user(&id, patch)).await?;
        Ok(Response::new(user_to_proto(user)))
    }

    #[instrument(skip(self, request))]
    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteUserResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let id = request.into_inner().id;

        within_deadline(deadline, self.service.delete_user(&id)).await?;
        Ok(Response::new(DeleteUserResponse { success: true }))
    }

    #[instrument(skip(self, request))]
    async fn list_users(
        &self,
        request: Request<ListUsersRequest>,
    ) -> Result<Response<ListUsersResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let query = list_request_to_domain(request.into_inner());

        let page = within_deadline(deadline, self.service.list_users(query)).await?;
        Ok(Response::new(page_to_proto(page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_users::UserError;
    use tonic::Code;

    #[tokio::test]
    async fn test_within_deadline_passes_result_through() {
        let ok = within_deadline(Some(Duration::from_secs(1)), async { Ok::<_, UserError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = within_deadline(None, async {
            Err::<(), _>(UserError::NotFound("x".into()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_within_deadline_expires() {
        let status = within_deadline(Some(Duration::from_millis(20)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, UserError>(())
        })
        .await
        .unwrap_err();
        assert_eq!(status.code(), Code::DeadlineExceeded);
    }
}
