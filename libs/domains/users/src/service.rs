use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::events::UserEvent;
use crate::id::{IdGenerator, UuidGenerator, ensure_id};
use crate::models::{CreateUser, ListUsers, UpdateUser, User, UserPage, now_millis};
use crate::notifier::{EventDelivery, EventNotifier};
use crate::password::{Argon2Hasher, PasswordHasher};
use crate::repository::UserRepository;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Service layer for User business logic.
///
/// Every operation touches the store once (Update reads, then replaces) and,
/// when a notifier is attached, publishes one event after the store step
/// succeeded.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    notifier: Option<Arc<dyn EventNotifier>>,
    hasher: Arc<dyn PasswordHasher>,
    ids: Arc<dyn IdGenerator>,
    delivery: EventDelivery,
    call_timeout: Duration,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: self.notifier.clone(),
            hasher: Arc::clone(&self.hasher),
            ids: Arc::clone(&self.ids),
            delivery: self.delivery,
            call_timeout: self.call_timeout,
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier: None,
            hasher: Arc::new(Argon2Hasher::default()),
            ids: Arc::new(UuidGenerator),
            delivery: EventDelivery::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn EventNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_event_delivery(mut self, delivery: EventDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn notifier(&self) -> Option<&Arc<dyn EventNotifier>> {
        self.notifier.as_ref()
    }

    /// Create a user with a freshly hashed password and a new id
    #[instrument(skip(self, input), fields(country = %input.country))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let password_hash = self.hash_password(input.password.clone()).await?;
        let user = User::new(self.ids.generate(), input, password_hash, now_millis());

        let created = self
            .bounded("insert user", self.repository.insert(user))
            .await?;
        tracing::info!(user_id = %created.id, "Created user");

        self.notify(UserEvent::created(created.clone())).await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        ensure_id(id)?;

        let user = self
            .bounded("find user", self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        self.notify(UserEvent::fetched(user.clone())).await?;
        Ok(user)
    }

    /// Patch the fields present in `input`. Concurrent updates are
    /// last-writer-wins.
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<User> {
        ensure_id(id)?;

        let mut user = self
            .bounded("find user", self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        user.apply_update(input);
        user.touch(now_millis());

        let updated = self
            .bounded("replace user", self.repository.replace(user))
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        tracing::info!(user_id = %updated.id, "Updated user");

        self.notify(UserEvent::updated(updated.clone())).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        ensure_id(id)?;

        let deleted = self
            .bounded("delete user", self.repository.delete(id))
            .await?;
        if !deleted {
            return Err(UserError::NotFound(id.to_string()));
        }
        tracing::info!(user_id = %id, "Deleted user");

        self.notify(UserEvent::deleted(id)).await?;
        Ok(())
    }

    /// One page of users. `total_count` ignores the filters.
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: ListUsers) -> UserResult<UserPage> {
        query.validate()?;

        let users = self
            .bounded(
                "list users",
                self.repository
                    .list(query.filter(), query.skip(), query.page_size),
            )
            .await?;
        let total_count = self
            .bounded("count users", self.repository.count_all())
            .await?;

        self.notify(UserEvent::listed(users.clone())).await?;
        Ok(UserPage { users, total_count })
    }

    async fn hash_password(&self, password: String) -> UserResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::PasswordHash(e.to_string()))?
    }

    async fn bounded<T, F>(&self, what: &str, call: F) -> UserResult<T>
    where
        F: Future<Output = UserResult<T>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(UserError::Timeout(format!(
                "{what} did not finish within {}ms",
                self.call_timeout.as_millis()
            ))),
        }
    }

    async fn notify(&self, event: UserEvent) -> UserResult<()> {
        let Some(notifier) = &self.notifier else {
            return Ok(());
        };

        let kind = event.event;
        let result = match tokio::time::timeout(self.call_timeout, notifier.publish(&event)).await {
            Ok(published) => published.map_err(UserError::from),
            Err(_) => Err(UserError::Timeout(format!(
                "publishing {kind} did not finish within {}ms",
                self.call_timeout.as_millis()
            ))),
        };

        match (result, self.delivery) {
            (Ok(_), _) => Ok(()),
            (Err(err), EventDelivery::BestEffort) => {
                warn!(event = %kind, error = %err, "Failed to publish user event");
                Ok(())
            }
            (Err(err), EventDelivery::Required) => Err(err),
        }
    }
}
