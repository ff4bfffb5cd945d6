//! Calls the gRPC trait directly, without a transport.

use std::time::Duration;

use async_trait::async_trait;
use domain_users::{
    InMemoryUserRepository, User, UserFilter, UserRepository, UserResult, UserService,
};
use rpc::users::v1::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UpdateUserRequest,
    users_service_server::UsersService,
};
use tonic::{Code, Request};
use users_grpc::UsersGrpcService;

fn grpc_service() -> UsersGrpcService<InMemoryUserRepository> {
    UsersGrpcService::new(UserService::new(InMemoryUserRepository::new()))
}

fn create_request(first_name: &str, country: &str) -> CreateUserRequest {
    CreateUserRequest {
        first_name: first_name.into(),
        last_name: "Player".into(),
        nickname: first_name.to_lowercase(),
        password: "word5678".into(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        country: country.into(),
    }
}

#[tokio::test]
async fn full_lifecycle_over_the_trait() {
    let service = grpc_service();

    let created = service
        .create_user(Request::new(create_request("Cristiano", "PT")))
        .await
        .unwrap()
        .into_inner();
    assert!(!created.id.is_empty());
    assert_ne!(created.password, "word5678");
    assert_eq!(created.created_at, created.updated_at);
    assert!(created.created_at.ends_with('Z'));

    let fetched = service
        .get_user(Request::new(GetUserRequest { id: created.id.clone() }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched, created);

    let updated = service
        .update_user(Request::new(UpdateUserRequest {
            id: created.id.clone(),
            country: Some("ES".into()),
            ..Default::default()
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(updated.country, "ES");
    assert_eq!(updated.first_name, "Cristiano");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let deleted = service
        .delete_user(Request::new(DeleteUserRequest { id: created.id.clone() }))
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.success);

    let status = service
        .delete_user(Request::new(DeleteUserRequest { id: created.id }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn list_filters_by_country_and_reports_unfiltered_total() {
    let service = grpc_service();
    service
        .create_user(Request::new(create_request("Cristiano", "PT")))
        .await
        .unwrap();
    let b = service
        .create_user(Request::new(create_request("Mohammed", "EG")))
        .await
        .unwrap()
        .into_inner();

    let response = service
        .list_users(Request::new(ListUsersRequest {
            page: 1,
            page_size: 10,
            country: Some("EG".into()),
            last_name: None,
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.users, vec![b]);
    assert_eq!(response.total_count, 2);
}

#[tokio::test]
async fn error_codes() {
    let service = grpc_service();

    let status = service
        .get_user(Request::new(GetUserRequest { id: "missing".into() }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = service
        .get_user(Request::new(GetUserRequest { id: String::new() }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = service
        .update_user(Request::new(UpdateUserRequest {
            id: "missing".into(),
            ..Default::default()
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = service
        .list_users(Request::new(ListUsersRequest {
            page: 0,
            page_size: 10,
            ..Default::default()
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let response = service
        .list_users(Request::new(ListUsersRequest {
            page: 1,
            page_size: 5000,
            ..Default::default()
        }))
        .await
        .unwrap()
        .into_inner();
    assert!(response.users.len() <= 5000);
}

struct StalledRepository;

#[async_trait]
impl UserRepository for StalledRepository {
    async fn insert(&self, user: User) -> UserResult<User> {
        Ok(user)
    }

    async fn find_by_id(&self, _id: &str) -> UserResult<Option<User>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn replace(&self, user: User) -> UserResult<Option<User>> {
        Ok(Some(user))
    }

    async fn delete(&self, _id: &str) -> UserResult<bool> {
        Ok(true)
    }

    async fn list(&self, _filter: UserFilter, _skip: u64, _limit: u32) -> UserResult<Vec<User>> {
        Ok(Vec::new())
    }

    async fn count_all(&self) -> UserResult<u64> {
        Ok(0)
    }

    async fn ping(&self) -> UserResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn caller_deadline_is_deadline_exceeded() {
    let service = UsersGrpcService::new(UserService::new(StalledRepository));

    let mut request = Request::new(GetUserRequest { id: "slow".into() });
    request
        .metadata_mut()
        .insert("grpc-timeout", "50m".parse().unwrap());

    let status = service.get_user(request).await.unwrap_err();
    assert_eq!(status.code(), Code::DeadlineExceeded);
}

#[tokio::test]
async fn service_call_timeout_is_deadline_exceeded() {
    let service = UsersGrpcService::new(
        UserService::new(StalledRepository).with_call_timeout(Duration::from_millis(50)),
    );

    let status = service
        .get_user(Request::new(GetUserRequest { id: "slow".into() }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::DeadlineExceeded);
}
