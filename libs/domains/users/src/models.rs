use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Current time at the precision the store keeps (milliseconds)
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A user account.
///
/// `password` always holds a hash. `id`, `created_at` and `password` are
/// fixed at creation; everything else changes through [`UpdateUser`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub password: String,
    pub email: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, input: CreateUser, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            nickname: input.nickname,
            password: password_hash,
            email: input.email,
            country: input.country,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields present in `update`, leave the rest alone
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(nickname) = update.nickname {
            self.nickname = nickname;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(country) = update.country {
            self.country = country;
        }
    }

    /// Refresh `updated_at`. The new value is always later than the old one,
    /// even when the clock has not moved past it.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::milliseconds(1);
        self.updated_at = now.max(floor);
    }
}

// Keeps the hash out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("country", &self.country)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Input for creating a user. All fields are required; the password is plaintext.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub password: String,
    pub email: String,
    pub country: String,
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("nickname", &self.nickname)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("country", &self.country)
            .finish()
    }
}

/// Patch for an existing user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

/// Exact-match filters for listing, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub country: Option<String>,
    pub last_name: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.country.as_ref().is_none_or(|c| *c == user.country)
            && self.last_name.as_ref().is_none_or(|l| *l == user.last_name)
    }
}

/// A page request. `page` is 1-based. `page_size` has no upper bound; a
/// zero size would read as "no limit" to the store and is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ListUsers {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, message = "page_size must be at least 1"))]
    pub page_size: u32,
    pub country: Option<String>,
    pub last_name: Option<String>,
}

impl ListUsers {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            country: None,
            last_name: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Documents to skip before this page
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn filter(&self) -> UserFilter {
        UserFilter {
            country: self.country.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// One page of users.
///
/// `total_count` is the size of the whole collection and ignores the
/// filters of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total_count: u64,
}
