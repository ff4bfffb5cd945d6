//! Users Domain
//!
//! User accounts backed by MongoDB, with change events published to Kafka.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← hashing, ids, timeouts, event publishing policy
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼────┐ ┌▼─────────┐
//! │ Repo  │ │ Notifier │  ← traits + MongoDB / Kafka / in-memory impls
//! └──┬────┘ └┬─────────┘
//!    │       │
//! ┌──▼───────▼──┐
//! │   Models    │  ← User, patches, pages, event envelope
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{CreateUser, InMemoryUserRepository, UserService};
//!
//! # async fn run() -> domain_users::UserResult<()> {
//! let service = UserService::new(InMemoryUserRepository::new());
//! let user = service
//!     .create_user(CreateUser {
//!         first_name: "Ada".into(),
//!         password: "s3cret".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("created {}", user.id);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod id;
pub mod kafka;
pub mod models;
pub mod mongodb;
pub mod notifier;
pub mod password;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use events::{EventKind, EventValue, UserEvent};
pub use id::{IdGenerator, UuidGenerator};
pub use self::kafka::{Acks, KafkaConfig, KafkaNotifier};
pub use models::{CreateUser, ListUsers, UpdateUser, User, UserFilter, UserPage};
pub use self::mongodb::MongoUserRepository;
pub use notifier::{Delivery, EventDelivery, EventNotifier, NotifyError};
pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
