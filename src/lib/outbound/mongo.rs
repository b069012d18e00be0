use anyhow::{Context, anyhow};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::outbound::document_store::{DocumentCollection, Filter, StoreError};

#[derive(Debug, Clone)]
pub struct Mongo {
    database: Database,
}

impl Mongo {
    pub async fn connect(url: &str, database: &str) -> Result<Mongo, anyhow::Error> {
        let client = Client::with_uri_str(url)
            .await
            .context("invalid MongoDB connection string")?;
        let database = client.database(database);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("failed to reach MongoDB database {}", database.name()))?;

        Ok(Mongo { database })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> MongoCollection<T> {
        MongoCollection {
            collection: self.database.collection(name),
        }
    }
}

#[derive(Debug)]
pub struct MongoCollection<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T: Send + Sync> Clone for MongoCollection<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<T: Send + Sync> MongoCollection<T> {
    /// Creates a unique ascending index on `field` unless it already exists.
    pub async fn ensure_unique_index(&self, field: &str) -> Result<(), anyhow::Error> {
        let mut keys = Document::new();
        keys.insert(field, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await.with_context(|| {
            format!(
                "failed to create unique index on {}.{}",
                self.collection.name(),
                field
            )
        })?;

        tracing::debug!(
            collection = self.collection.name(),
            field,
            "unique index ensured"
        );

        Ok(())
    }
}

impl<T> DocumentCollection<T> for MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static,
{
    async fn insert_one(&self, document: &T) -> Result<ObjectId, StoreError> {
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(into_store_error)?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow!("store returned a non ObjectId key {}", result.inserted_id).into())
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        self.collection
            .find_one(filter.to_document())
            .await
            .map_err(into_store_error)
    }

    async fn find(&self, filter: Filter) -> Result<Vec<T>, StoreError> {
        let cursor = self
            .collection
            .find(filter.to_document())
            .await
            .map_err(into_store_error)?;

        cursor.try_collect().await.map_err(into_store_error)
    }
}

const DUPLICATE_KEY_ERROR_CODE: i32 = 11000;

fn into_store_error(err: mongodb::error::Error) -> StoreError {
    match duplicate_key_message(&err) {
        Some(message) => StoreError::DuplicateKey {
            index: duplicate_key_index(message),
        },
        None => StoreError::Unknown(anyhow!(err)),
    }
}

fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_ERROR_CODE =>
        {
            Some(&write_error.message)
        }
        ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY_ERROR_CODE => {
            Some(&command_error.message)
        }
        _ => None,
    }
}

/// Extracts the index name from a server message such as
/// `E11000 duplicate key error collection: db.device index: serial_number_1 dup key: { ... }`.
fn duplicate_key_index(message: &str) -> String {
    message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("unknown")
        .to_string()
}
