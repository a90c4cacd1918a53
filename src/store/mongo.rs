//! MongoDB user store
//!
//! The driver's `Client` owns a connection pool; each operation checks out a
//! connection and returns it when the operation future finishes or is
//! dropped.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use futures::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{User, UserId};
use crate::{Error, Result};

use super::UserStore;

/// Connection settings for the MongoDB backend
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
    pub require_on_startup: bool,
}

/// User document as stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub address: String,
    pub age: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            address: user.address.clone(),
            age: user.age,
            created_at: DateTime::from_chrono(user.created_at),
            updated_at: DateTime::from_chrono(user.updated_at),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            address: doc.address,
            age: doc.age,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

/// MongoDB-backed store for one fixed database and collection
pub struct MongoStore {
    client: Client,
    database: String,
    users: Collection<UserDocument>,
}

impl MongoStore {
    /// Build the driver client. No server round-trip happens here; the pool
    /// connects lazily on first use.
    pub async fn connect(settings: MongoSettings) -> Result<Self> {
        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            max_pool_size = settings.max_pool_size,
            "Configuring MongoDB client"
        );

        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(|e| Error::Config(format!("invalid MongoDB URI: {}", e)))?;

        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(settings.max_pool_size);
        options.min_pool_size = Some(settings.min_pool_size);
        options.connect_timeout = Some(settings.connect_timeout);
        options.server_selection_timeout = Some(settings.server_selection_timeout);

        let client = Client::with_options(options)
            .map_err(|e| Error::Config(format!("failed to build MongoDB client: {}", e)))?;

        let users = client
            .database(&settings.database)
            .collection::<UserDocument>(&settings.collection);

        Ok(Self {
            client,
            database: settings.database,
            users,
        })
    }
}

#[async_trait]
impl UserStore for MongoStore {
    fn name(&self) -> &'static str {
        "mongo"
    }

    async fn list(&self) -> Result<Vec<User>> {
        let cursor = self.users.find(doc! {}).await?;

        let docs: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        self.users.insert_one(UserDocument::from(user)).await?;
        Ok(())
    }

    async fn get(&self, id: &UserId) -> Result<User> {
        self.users
            .find_one(doc! { "_id": *id })
            .await?
            .map(User::from)
            .ok_or_else(|| Error::UserNotFound(id.to_hex()))
    }

    async fn replace(&self, user: &User) -> Result<()> {
        let result = self
            .users
            .replace_one(doc! { "_id": user.id }, UserDocument::from(user))
            .await?;

        if result.matched_count == 0 {
            return Err(Error::UserNotFound(user.id.to_hex()));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<()> {
        let result = self.users.delete_one(doc! { "_id": *id }).await?;

        if result.deleted_count == 0 {
            return Err(Error::UserNotFound(id.to_hex()));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
