//! Storer contract
//!
//! The operation set every backend implements with the same observable
//! behavior. The HTTP binding and the binaries only talk to this trait.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::Document;
use crate::error::Result;

/// One page of a collection listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPage {
    /// Entries of this page, ordered by key
    pub items: BTreeMap<String, Document>,

    /// Number of entries in the whole collection, independent of paging
    pub total: u64,
}

/// CRUD operations over collections of JSON documents
///
/// Implementations must be safe to share between threads; each call is
/// atomic on its own, sequences of calls are not.
pub trait Storer: Send + Sync {
    /// Insert or replace `key` in `collection`, creating the collection if needed
    fn set(&self, collection: &str, key: &str, value: Document) -> Result<()>;

    /// Fetch `key` from `collection`
    ///
    /// Returns `Ok(None)` when the collection exists but the key does not,
    /// and `StoreError::CollectionNotFound` when the collection was never created.
    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// Remove `key` from `collection`, reporting whether anything was removed
    fn delete(&self, collection: &str, key: &str) -> Result<bool>;

    /// Return page `page` (1-based) of at most `limit` entries in key order
    fn list(&self, collection: &str, limit: i64, page: i64) -> Result<ListPage>;
}
