//! Domain events.
//!
//! Each event is one JSON object on the topic:
//!
//! ```json
//! { "event": "user.created", "value": { "id": "…", "first_name": "…", … } }
//! { "event": "user.delete",  "value": "<id>" }
//! { "event": "user.list",    "value": [ { … }, { … } ] }
//! ```

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::UserResult;
use crate::models::User;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum EventKind {
    #[serde(rename = "user.created")]
    #[strum(serialize = "user.created")]
    Created,
    #[serde(rename = "user.get")]
    #[strum(serialize = "user.get")]
    Fetched,
    #[serde(rename = "user.update")]
    #[strum(serialize = "user.update")]
    Updated,
    #[serde(rename = "user.delete")]
    #[strum(serialize = "user.delete")]
    Deleted,
    #[serde(rename = "user.list")]
    #[strum(serialize = "user.list")]
    Listed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    User(User),
    Users(Vec<User>),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    pub event: EventKind,
    pub value: EventValue,
}

impl UserEvent {
    pub fn created(user: User) -> Self {
        Self { event: EventKind::Created, value: EventValue::User(user) }
    }

    pub fn fetched(user: User) -> Self {
        Self { event: EventKind::Fetched, value: EventValue::User(user) }
    }

    pub fn updated(user: User) -> Self {
        Self { event: EventKind::Updated, value: EventValue::User(user) }
    }

    pub fn deleted(id: impl Into<String>) -> Self {
        Self { event: EventKind::Deleted, value: EventValue::Id(id.into()) }
    }

    pub fn listed(users: Vec<User>) -> Self {
        Self { event: EventKind::Listed, value: EventValue::Users(users) }
    }

    pub fn to_json(&self) -> UserResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
