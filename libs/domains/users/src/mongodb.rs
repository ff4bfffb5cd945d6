//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
    options::{FindOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserFilter};
use crate::repository::UserRepository;

pub const DEFAULT_COLLECTION: &str = "users";

/// Stored shape of a [`User`]: the id lives in `_id` and timestamps are BSON dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    first_name: String,
    last_name: String,
    nickname: String,
    password: String,
    email: String,
    country: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            nickname: user.nickname.clone(),
            password: user.password.clone(),
            email: user.email.clone(),
            country: user.country.clone(),
            created_at: bson::DateTime::from_millis(user.created_at.timestamp_millis()),
            updated_at: bson::DateTime::from_millis(user.updated_at.timestamp_millis()),
        }
    }
}

fn to_utc(value: bson::DateTime) -> UserResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis())
        .ok_or_else(|| UserError::Database(format!("timestamp out of range: {value}")))
}

impl TryFrom<UserDocument> for User {
    type Error = UserError;

    fn try_from(doc: UserDocument) -> UserResult<Self> {
        Ok(User {
            created_at: to_utc(doc.created_at)?,
            updated_at: to_utc(doc.updated_at)?,
            id: doc.id,
            first_name: doc.first_name,
            last_name: doc.last_name,
            nickname: doc.nickname,
            password: doc.password,
            email: doc.email,
            country: doc.country,
        })
    }
}

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    db: Database,
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// ```ignore
    /// let client = database::mongodb::connect(&config).await?;
    /// let repo = MongoUserRepository::new(client.database("userDB"));
    /// repo.init_indexes().await?;
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self { db, collection }
    }

    /// Secondary indexes for the list filters and ordering. Safe to call repeatedly.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = [
            doc! { "country": 1 },
            doc! { "last_name": 1 },
            doc! { "created_at": 1, "_id": 1 },
        ]
        .into_iter()
        .map(|keys| IndexModel::builder().keys(keys).build());

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = %self.collection.name(), "User indexes ensured");
        Ok(())
    }

    fn build_filter(filter: &UserFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref country) = filter.country {
            doc.insert("country", country.as_str());
        }

        if let Some(ref last_name) = filter.last_name {
            doc.insert("last_name", last_name.as_str());
        }

        doc
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(UserDocument::from(&user)).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn replace(&self, user: User) -> UserResult<Option<User>> {
        self.collection
            .find_one_and_replace(doc! { "_id": user.id.as_str() }, UserDocument::from(&user))
            .return_document(ReturnDocument::After)
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> UserResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter, skip: u64, limit: u32) -> UserResult<Vec<User>> {
        let options = FindOptions::builder()
            .skip(skip)
            .limit(i64::from(limit))
            .sort(doc! { "created_at": 1, "_id": 1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let docs: Vec<UserDocument> = cursor.try_collect().await?;

        docs.into_iter().map(User::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count_all(&self) -> UserResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn ping(&self) -> UserResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
