//! File-backed store engine
//!
//! Keeps the whole content tree in memory and mirrors it to a single JSON
//! file according to the configured flush policy.

use std::path::Path;

use parking_lot::{RwLock, RwLockUpgradableReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::config::{EmptyCollectionPolicy, FlushPolicy, StoreConfig, StoreLocation};
use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::storer::{ListPage, Storer};

use super::pagination::PageWindow;
use super::snapshot::{self, ContentTree};

/// The document store engine
///
/// ## Concurrency Model
///
/// One `RwLock` guards the entire content tree:
///
/// - **Mutations** (set/delete/delete_collection/flush): exclusive lock.
///   With `FlushPolicy::Auto` the snapshot is written while the lock is
///   held, so the file always matches some serial order of mutations.
/// - **List**: shared lock, never touches the file.
/// - **Get**: shared lock when in memory. When file-backed, Get re-reads the
///   file on every call under an upgradable read, then upgrades to merge the
///   file into memory. Only one upgradable guard exists at a time, so
///   file-backed Gets serialize with each other on the file read while
///   Lists keep running.
///
/// ## Persistence States (fixed at open)
///
/// | location | policy | behavior                                   |
/// |----------|--------|--------------------------------------------|
/// | memory   | any    | nothing written, `flush()` is a no-op      |
/// | file     | Auto   | every mutation rewrites the whole file     |
/// | file     | Manual | file written only by `flush()`             |
///
/// A failed write-through does not roll back the in-memory change.
pub struct FileStore {
    /// Engine configuration
    config: StoreConfig,

    /// Collection name → key → document
    content: RwLock<ContentTree>,
}

impl FileStore {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the backing file if it doesn't exist
    /// 3. Load the existing snapshot (empty file = empty tree)
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let content = match &config.location {
            StoreLocation::Memory => ContentTree::new(),
            StoreLocation::File(path) => {
                snapshot::ensure_exists(path)?;
                let tree = snapshot::read(path)?;
                info!(
                    path = %path.display(),
                    collections = tree.len(),
                    policy = ?config.flush_policy,
                    "opened document store"
                );
                tree
            }
        };

        Ok(Self {
            config,
            content: RwLock::new(content),
        })
    }

    /// Open a store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            config: StoreConfig::default(),
            content: RwLock::new(ContentTree::new()),
        }
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified backing file.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(StoreConfig::builder().path(path).build())
    }

    /// Insert or replace a document
    pub fn set(&self, collection: &str, key: &str, value: Document) -> Result<()> {
        let collection = self.collection_name(collection)?;
        Self::check_key(key)?;

        let mut content = self.content.write();
        content
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        debug!(collection, key, "set document");

        if self.writes_through() {
            self.persist(&content)?;
        }
        Ok(())
    }

    /// Get a document
    ///
    /// File-backed stores reload the backing file first, so writes made by
    /// another process sharing the file become visible. A key that is
    /// absent from an existing collection yields `Ok(None)`.
    pub fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let collection = self.collection_name(collection)?;
        Self::check_key(key)?;

        let found = match self.path() {
            None => {
                let content = self.content.read();
                Self::lookup(&content, collection, key)?
            }
            Some(path) => {
                let content = self.content.upgradable_read();
                let disk = snapshot::read(path)?;
                let mut content = RwLockUpgradableReadGuard::upgrade(content);
                snapshot::merge(&mut content, disk);
                let content = RwLockWriteGuard::downgrade(content);
                Self::lookup(&content, collection, key)?
            }
        };

        debug!(collection, key, found = found.is_some(), "get document");
        Ok(found)
    }

    /// Delete a document, returning whether it existed
    pub fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let collection = self.collection_name(collection)?;
        Self::check_key(key)?;

        let mut content = self.content.write();
        let removed = content
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?
            .remove(key)
            .is_some();
        debug!(collection, key, removed, "delete document");

        if removed && self.writes_through() {
            self.persist(&content)?;
        }
        Ok(removed)
    }

    /// List one page of a collection in key order
    ///
    /// Does not reload the backing file.
    pub fn list(&self, collection: &str, limit: i64, page: i64) -> Result<ListPage> {
        let collection = self.collection_name(collection)?;
        let window = PageWindow::clamp(limit, page, self.config.max_page_size);

        let content = self.content.read();
        let table = content
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let listing = ListPage {
            items: window.slice(table),
            total: table.len() as u64,
        };
        debug!(
            collection,
            limit = window.limit,
            page = window.page,
            returned = listing.items.len(),
            total = listing.total,
            "list documents"
        );
        Ok(listing)
    }

    /// Drop a whole collection, returning whether it existed
    pub fn delete_collection(&self, collection: &str) -> Result<bool> {
        let collection = self.collection_name(collection)?;

        let mut content = self.content.write();
        let removed = content.remove(collection).is_some();
        debug!(collection, removed, "delete collection");

        if removed && self.writes_through() {
            self.persist(&content)?;
        }
        Ok(removed)
    }

    /// Names of all collections held in memory, sorted
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.content.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Write the full tree to the backing file
    ///
    /// Works under either flush policy; a no-op for in-memory stores.
    pub fn flush(&self) -> Result<()> {
        if self.path().is_none() {
            return Ok(());
        }
        let content = self.content.write();
        self.persist(&content)?;
        info!(collections = content.len(), "flushed document store");
        Ok(())
    }

    /// The snapshot encoding of the current tree
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let content = self.content.read();
        snapshot::encode(&content, self.config.json_format)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Backing file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        match &self.config.location {
            StoreLocation::Memory => None,
            StoreLocation::File(path) => Some(path),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.config.location.is_memory()
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn writes_through(&self) -> bool {
        !self.is_in_memory() && self.config.flush_policy == FlushPolicy::Auto
    }

    /// Called with the write lock held
    fn persist(&self, content: &ContentTree) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let bytes = snapshot::encode(content, self.config.json_format)?;
        snapshot::write_atomic(path, &bytes).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to persist snapshot");
            e
        })
    }

    fn collection_name<'a>(&'a self, name: &'a str) -> Result<&'a str> {
        if !name.is_empty() {
            return Ok(name);
        }
        match self.config.empty_collection {
            EmptyCollectionPolicy::Substitute => Ok(&self.config.default_collection),
            EmptyCollectionPolicy::Reject => Err(StoreError::Validation(
                "collection cannot be empty".to_string(),
            )),
        }
    }

    fn check_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::Validation("key cannot be empty".to_string()));
        }
        Ok(())
    }

    fn lookup(content: &ContentTree, collection: &str, key: &str) -> Result<Option<Document>> {
        content
            .get(collection)
            .map(|table| table.get(key).cloned())
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))
    }
}

impl Storer for FileStore {
    fn set(&self, collection: &str, key: &str, value: Document) -> Result<()> {
        FileStore::set(self, collection, key, value)
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        FileStore::get(self, collection, key)
    }

    fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        FileStore::delete(self, collection, key)
    }

    fn list(&self, collection: &str, limit: i64, page: i64) -> Result<ListPage> {
        FileStore::list(self, collection, limit, page)
    }
}
