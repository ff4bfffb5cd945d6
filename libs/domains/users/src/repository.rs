use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails if the id is already taken.
    async fn insert(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>>;

    /// Replace the stored user with the same id. `None` if it no longer exists.
    async fn replace(&self, user: User) -> UserResult<Option<User>>;

    /// Returns whether a user was removed
    async fn delete(&self, id: &str) -> UserResult<bool>;

    /// Users matching `filter`, ordered by creation time then id.
    ///
    /// Users created within the same millisecond fall back to id order, which
    /// is random for uuid ids. Pages over a fixed dataset stay disjoint either way.
    async fn list(&self, filter: UserFilter, skip: u64, limit: u32) -> UserResult<Vec<User>>;

    /// Size of the whole collection, ignoring any filter
    async fn count_all(&self) -> UserResult<u64>;

    async fn ping(&self) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(UserError::Database(format!("duplicate id {}", user.id)));
        }
        users.insert(user.id.clone(), user.clone());

        tracing::debug!(user_id = %user.id, "Stored user in memory");
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn replace(&self, user: User) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(id).is_some())
    }

    async fn list(&self, filter: UserFilter, skip: u64, limit: u32) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().filter(|u| filter.matches(u)).cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(result.into_iter().skip(skip).take(limit as usize).collect())
    }

    async fn count_all(&self) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }

    async fn ping(&self) -> UserResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use chrono::{Duration, TimeZone, Utc};

    fn user(id: &str, country: &str, offset_ms: i64) -> User {
        let base = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        User::new(
            id.to_string(),
            CreateUser {
                first_name: "Test".into(),
                last_name: "User".into(),
                country: country.into(),
                ..Default::default()
            },
            "hash".into(),
            base + Duration::milliseconds(offset_ms),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a", "PT", 0)).await.unwrap();

        assert_eq!(repo.find_by_id("a").await.unwrap().unwrap().country, "PT");
        assert!(repo.find_by_id("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a", "PT", 0)).await.unwrap();
        assert!(repo.insert(user("a", "EG", 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_replace_missing_returns_none() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.replace(user("ghost", "PT", 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a", "PT", 0)).await.unwrap();

        assert!(repo.delete("a").await.unwrap());
        assert!(!repo.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_created_then_id() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("c", "PT", 5)).await.unwrap();
        repo.insert(user("b", "PT", 0)).await.unwrap();
        repo.insert(user("a", "PT", 0)).await.unwrap();

        let ids: Vec<String> = repo
            .list(UserFilter::default(), 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_list_filter_and_count_all() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a", "PT", 0)).await.unwrap();
        repo.insert(user("b", "EG", 1)).await.unwrap();

        let filter = UserFilter {
            country: Some("EG".into()),
            last_name: None,
        };
        let users = repo.list(filter, 0, 10).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "b");
        assert_eq!(repo.count_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_skip_past_end() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a", "PT", 0)).await.unwrap();
        assert!(repo.list(UserFilter::default(), 5, 10).await.unwrap().is_empty());
    }
}
