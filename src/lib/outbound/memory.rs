use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, anyhow};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::outbound::document_store::{DocumentCollection, Filter, StoreError, index_name};

const PRIMARY_KEY: &str = "_id";

/// In-process [DocumentCollection] with the same key generation and uniqueness semantics as the
/// real store. Documents are kept in insertion order.
#[derive(Debug)]
pub struct InMemoryCollection<T> {
    documents: Arc<Mutex<Vec<Document>>>,
    unique_fields: Arc<Vec<&'static str>>,
    _document: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            unique_fields: Arc::clone(&self.unique_fields),
            _document: PhantomData,
        }
    }
}

impl<T> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(Vec::new())),
            unique_fields: Arc::new(Vec::new()),
            _document: PhantomData,
        }
    }

    /// Declares a unique index on `field`.
    pub fn with_unique_field(self, field: &'static str) -> Self {
        let mut unique_fields = self.unique_fields.as_ref().clone();
        unique_fields.push(field);

        Self {
            unique_fields: Arc::new(unique_fields),
            ..self
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|documents| documents.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Document>>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| anyhow!("in-memory collection lock poisoned").into())
    }

    fn violated_index(&self, documents: &[Document], candidate: &Document) -> Option<String> {
        std::iter::once(PRIMARY_KEY)
            .chain(self.unique_fields.iter().copied())
            .find(|field| match candidate.get(*field) {
                Some(value) => documents
                    .iter()
                    .any(|existing| existing.get(*field) == Some(value)),
                None => false,
            })
            .map(index_name)
    }
}

impl<T> DocumentCollection<T> for InMemoryCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn insert_one(&self, document: &T) -> Result<ObjectId, StoreError> {
        let mut document = bson::to_document(document).context("failed to encode document")?;

        let id = match document.get(PRIMARY_KEY) {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => return Err(anyhow!("unsupported primary key {}", other).into()),
            None => {
                let id = ObjectId::new();
                document.insert(PRIMARY_KEY, id);
                id
            }
        };

        let mut documents = self.lock()?;
        if let Some(index) = self.violated_index(&documents, &document) {
            return Err(StoreError::DuplicateKey { index });
        }
        documents.push(document);

        Ok(id)
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        let documents = self.lock()?;

        documents
            .iter()
            .find(|document| filter.matches(document))
            .map(decode)
            .transpose()
    }

    async fn find(&self, filter: Filter) -> Result<Vec<T>, StoreError> {
        let documents = self.lock()?;

        documents
            .iter()
            .filter(|document| filter.matches(document))
            .map(decode)
            .collect()
    }
}

fn decode<T: DeserializeOwned>(document: &Document) -> Result<T, StoreError> {
    bson::from_document(document.clone())
        .context("failed to decode document")
        .map_err(StoreError::from)
}
