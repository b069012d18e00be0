use std::future::Future;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use thiserror::Error;

/// Single key/value equality predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: &'static str,
    value: Bson,
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Bson>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn value(&self) -> &Bson {
        &self.value
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(self.field, self.value.clone());
        document
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.get(self.field) == Some(&self.value)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key on index {index}")]
    DuplicateKey { index: String },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

/// Name of the index backing a field, following the store's naming convention.
pub fn index_name(field: &str) -> String {
    if field == "_id" {
        "_id_".to_string()
    } else {
        format!("{}_1", field)
    }
}

/// `DocumentCollection` is the narrow set of document store operations the repositories rely on.
///
/// Implementations must be safe to share between concurrent calls.
pub trait DocumentCollection<T>: Clone + Send + Sync + 'static {
    /// Inserts `document` and returns its primary key, generated by the store when absent.
    fn insert_one(&self, document: &T) -> impl Future<Output = Result<ObjectId, StoreError>> + Send;

    fn find_one(&self, filter: Filter) -> impl Future<Output = Result<Option<T>, StoreError>> + Send;

    fn find(&self, filter: Filter) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;

    #[test]
    fn test_filter_to_document() {
        let filter = Filter::eq("user_id", "user-1");

        assert_eq!(filter.field(), "user_id");
        assert_eq!(filter.value(), &Bson::String("user-1".to_string()));
        assert_eq!(filter.to_document(), doc! { "user_id": "user-1" });
    }

    #[test]
    fn test_filter_matches_on_equality_only() {
        let id = ObjectId::new();
        let filter = Filter::eq("_id", id);

        assert!(filter.matches(&doc! { "_id": id, "name": "a" }));
        assert!(!filter.matches(&doc! { "_id": ObjectId::new() }));
        assert!(!filter.matches(&doc! { "_id": id.to_hex() }));
        assert!(!filter.matches(&doc! { "name": "a" }));
    }

    #[test]
    fn test_index_name() {
        assert_eq!(index_name("_id"), "_id_");
        assert_eq!(index_name("serial_number"), "serial_number_1");
    }
}
