//! Configuration for docstore
//!
//! Centralized configuration with sensible defaults. Every policy the store
//! engine applies is carried here, so independent engine instances can run
//! side by side with different settings.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Path value reserved for a store that never touches disk
pub const IN_MEMORY: &str = "memory";

/// Largest page List hands out unless configured otherwise
pub const DEFAULT_MAX_PAGE_SIZE: usize = 20;

/// Collection used when a caller passes an empty name
pub const DEFAULT_COLLECTION: &str = "default";

/// Configuration for a single store engine
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// Where the content tree lives
    pub location: StoreLocation,

    /// When mutations reach the backing file
    pub flush_policy: FlushPolicy,

    /// Indentation mode of the snapshot file
    pub json_format: JsonFormat,

    // -------------------------------------------------------------------------
    // Listing Configuration
    // -------------------------------------------------------------------------
    /// Upper bound for List's limit; out-of-range limits clamp to this
    pub max_page_size: usize,

    // -------------------------------------------------------------------------
    // Naming Configuration
    // -------------------------------------------------------------------------
    /// Name substituted for an empty collection under `EmptyCollectionPolicy::Substitute`
    pub default_collection: String,

    /// What to do with an empty collection name
    pub empty_collection: EmptyCollectionPolicy,
}

/// Backing location of a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Content only lives in memory; Flush is a no-op
    Memory,

    /// Content is snapshotted to this JSON file
    File(PathBuf),
}

impl StoreLocation {
    /// Interpret a user-supplied path; `""` and `"memory"` mean in-memory
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.as_os_str().is_empty() || path == Path::new(IN_MEMORY) {
            StoreLocation::Memory
        } else {
            StoreLocation::File(path.to_path_buf())
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, StoreLocation::Memory)
    }
}

/// Persistence policy for file-backed stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Every mutation rewrites the whole file before returning
    Auto,

    /// Mutations stay in memory until `flush()` is called
    Manual,
}

/// Snapshot encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Four-space indented, human readable
    Pretty,

    /// No whitespace
    Compact,
}

/// Handling of an empty collection name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCollectionPolicy {
    /// Replace with `StoreConfig::default_collection`
    Substitute,

    /// Fail with a validation error
    Reject,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: StoreLocation::Memory,
            flush_policy: FlushPolicy::Auto,
            json_format: JsonFormat::Pretty,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_collection: DEFAULT_COLLECTION.to_string(),
            empty_collection: EmptyCollectionPolicy::Substitute,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Check the settings the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(StoreError::Config(
                "max_page_size must be at least 1".to_string(),
            ));
        }
        if self.empty_collection == EmptyCollectionPolicy::Substitute
            && self.default_collection.is_empty()
        {
            return Err(StoreError::Config(
                "default_collection cannot be empty when substituting empty names".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Back the store with a file (`""` or `"memory"` select in-memory)
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.location = StoreLocation::from_path(path);
        self
    }

    /// Keep the store purely in memory
    pub fn in_memory(mut self) -> Self {
        self.config.location = StoreLocation::Memory;
        self
    }

    /// Set the flush policy
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.config.flush_policy = policy;
        self
    }

    /// Shorthand for `flush_policy(FlushPolicy::Manual)`
    pub fn manual_flush(self) -> Self {
        self.flush_policy(FlushPolicy::Manual)
    }

    /// Set the snapshot encoding
    pub fn json_format(mut self, format: JsonFormat) -> Self {
        self.config.json_format = format;
        self
    }

    /// Set the maximum page size for List
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.config.max_page_size = size;
        self
    }

    /// Set the collection substituted for empty names
    pub fn default_collection(mut self, name: impl Into<String>) -> Self {
        self.config.default_collection = name.into();
        self
    }

    /// Set the empty-collection policy
    pub fn empty_collection(mut self, policy: EmptyCollectionPolicy) -> Self {
        self.config.empty_collection = policy;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}

/// Configuration for the REST binding
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// TCP listen address
    pub listen_addr: String,

    /// Path prefix the routes are mounted under
    pub base_path: String,

    /// Collection every request of this binding addresses
    pub collection: String,

    /// Limit used for List when the request has no `limit` parameter
    pub default_list_limit: i64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            base_path: "/".to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            default_list_limit: 10,
        }
    }
}

impl HttpConfig {
    /// Create a new config builder
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for HttpConfig
#[derive(Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the path prefix
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.config.base_path = path.into();
        self
    }

    /// Set the collection served by this binding
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the List limit used when none is given
    pub fn default_list_limit(mut self, limit: i64) -> Self {
        self.config.default_list_limit = limit;
        self
    }

    pub fn build(self) -> HttpConfig {
        self.config
    }
}
