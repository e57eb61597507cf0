//! # docstore
//!
//! A small persistent store for JSON documents with:
//! - Named collections of key → document
//! - One JSON snapshot file, written through on every change or flushed on demand
//! - Single reader/writer lock over the whole tree
//! - Deterministic key-ordered pagination
//! - An optional REST binding over any [`Storer`]
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  HTTP binding (axum)                         │
//! │        GET / POST / PUT / DELETE  {base}/.../{key}           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  spawn_blocking
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Storer contract                            │
//! │              set / get / delete / list                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     FileStore                                │
//! │       RwLock< collection → key → Document >                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  full snapshot (auto or manual flush)
//!                       ▼
//!                ┌─────────────┐
//!                │  db.json    │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod document;
pub mod storer;
pub mod store;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{FlushPolicy, HttpConfig, JsonFormat, StoreConfig, StoreLocation};
pub use document::Document;
pub use error::{Result, StoreError};
pub use store::FileStore;
pub use storer::{ListPage, Storer};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of docstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
