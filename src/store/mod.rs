//! Store Module
//!
//! The file-backed document store engine.
//!
//! ## Responsibilities
//! - Hold the content tree (collection → key → document) in memory
//! - Guard it with a single reader/writer lock
//! - Mirror it to one JSON snapshot file per the flush policy
//! - Serve deterministic, key-ordered pages for List

mod file_store;
pub mod pagination;
pub mod snapshot;

pub use file_store::FileStore;
pub use pagination::PageWindow;
pub use snapshot::{CollectionTable, ContentTree};
