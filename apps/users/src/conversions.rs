//! Proto ↔ domain conversions
//!
//! Both sides are foreign to this crate, so these are plain functions rather
//! than `From` impls.

use domain_users::{CreateUser, ListUsers, UpdateUser, User, UserPage};
use grpc_client::conversions::datetime_to_rfc3339;
use rpc::users::v1 as proto;

pub fn user_to_proto(user: User) -> proto::User {
    proto::User {
        created_at: datetime_to_rfc3339(&user.created_at),
        updated_at: datetime_to_rfc3339(&user.updated_at),
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        nickname: user.nickname,
        password: user.password,
        email: user.email,
        country: user.country,
    }
}

pub fn create_request_to_domain(req: proto::CreateUserRequest) -> CreateUser {
    CreateUser {
        first_name: req.first_name,
        last_name: req.last_name,
        nickname: req.nickname,
        password: req.password,
        email: req.email,
        country: req.country,
    }
}

/// Split an update request into the target id and the patch
pub fn update_request_to_domain(req: proto::UpdateUserRequest) -> (String, UpdateUser) {
    (
        req.id,
        UpdateUser {
            first_name: req.first_name,
            last_name: req.last_name,
            nickname: req.nickname,
            email: req.email,
            country: req.country,
        },
    )
}

pub fn list_request_to_domain(req: proto::ListUsersRequest) -> ListUsers {
    ListUsers {
        page: req.page,
        page_size: req.page_size,
        country: req.country,
        last_name: req.last_name,
    }
}

pub fn page_to_proto(page: UserPage) -> proto::ListUsersResponse {
    proto::ListUsersResponse {
        users: page.users.into_iter().map(user_to_proto).collect(),
        total_count: page.total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn user() -> User {
        let created = Utc.timestamp_millis_opt(1_714_555_800_123).unwrap();
        let mut user = User::new(
            "5a2f".into(),
            CreateUser {
                first_name: "Mohammed".into(),
                last_name: "Salah".into(),
                nickname: "Mo".into(),
                password: String::new(),
                email: "mo@example.com".into(),
                country: "EG".into(),
            },
            "$argon2id$hash".into(),
            created,
        );
        user.touch(created + Duration::seconds(1));
        user
    }

    #[test]
    fn test_user_to_proto() {
        let proto = user_to_proto(user());
        assert_eq!(proto.id, "5a2f");
        assert_eq!(proto.password, "$argon2id$hash");
        assert_eq!(proto.created_at, "2024-05-01T09:30:00.123Z");
        assert_eq!(proto.updated_at, "2024-05-01T09:30:01.123Z");
        assert_eq!(proto.country, "EG");
    }

    #[test]
    fn test_update_request_keeps_absent_fields_absent() {
        let (id, patch) = update_request_to_domain(proto::UpdateUserRequest {
            id: "5a2f".into(),
            nickname: Some("King".into()),
            ..Default::default()
        });
        assert_eq!(id, "5a2f");
        assert_eq!(patch.nickname.as_deref(), Some("King"));
        assert!(patch.first_name.is_none());
        assert!(patch.country.is_none());
    }

    #[test]
    fn test_list_request_to_domain() {
        let query = list_request_to_domain(proto::ListUsersRequest {
            page: 2,
            page_size: 25,
            country: Some("EG".into()),
            last_name: None,
        });
        assert_eq!(query, ListUsers::new(2, 25).with_country("EG"));
        assert_eq!(query.skip(), 25);
    }

    #[test]
    fn test_page_to_proto() {
        let response = page_to_proto(UserPage {
            users: vec![user()],
            total_count: 9,
        });
        assert_eq!(response.users.len(), 1);
        assert_eq!(response.total_count, 9);
    }
}
