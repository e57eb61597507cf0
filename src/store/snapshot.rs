//! Snapshot persistence
//!
//! The entire content tree is written as one JSON object:
//!
//! ```text
//! {
//!     "<collection>": {
//!         "<key>": <raw document>,
//!         ...
//!     },
//!     ...
//! }
//! ```
//!
//! Collections and keys are emitted in sorted order so identical trees give
//! identical files. Every write replaces the whole file, which costs
//! O(total size) per write.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::value::RawValue;
use tempfile::NamedTempFile;

use crate::config::JsonFormat;
use crate::document::Document;
use crate::error::{Result, StoreError};

/// Documents of one collection, by key
pub type CollectionTable = HashMap<String, Document>;

/// All collections, by name
pub type ContentTree = HashMap<String, CollectionTable>;

const INDENT: &[u8] = b"    ";

/// Encode the tree in the requested format
pub fn encode(tree: &ContentTree, format: JsonFormat) -> Result<Vec<u8>> {
    let sorted: BTreeMap<&str, BTreeMap<&str, &RawValue>> = tree
        .iter()
        .map(|(name, table)| {
            let docs = table
                .iter()
                .map(|(key, doc)| (key.as_str(), doc.as_raw()))
                .collect();
            (name.as_str(), docs)
        })
        .collect();

    let mut out = Vec::new();
    let encoded = match format {
        JsonFormat::Pretty => {
            let formatter = PrettyFormatter::with_indent(INDENT);
            let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
            sorted.serialize(&mut ser)
        }
        JsonFormat::Compact => {
            let mut ser = serde_json::Serializer::new(&mut out);
            sorted.serialize(&mut ser)
        }
    };
    encoded.map_err(|e| StoreError::Serialization(format!("unable to encode snapshot: {}", e)))?;

    Ok(out)
}

/// Decode a snapshot; empty or whitespace-only input is an empty tree
pub fn decode(bytes: &[u8]) -> Result<ContentTree> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContentTree::new());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Serialization(format!("unable to decode snapshot: {}", e)))
}

/// Read and decode the snapshot at `path`
pub fn read(path: &Path) -> Result<ContentTree> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Replace the file at `path` with `bytes`
///
/// The data goes to a uniquely named temporary file in the same directory,
/// is fsynced, then renamed over the target, so other readers see either the
/// old or the new snapshot. Each writer gets its own temporary file, so
/// engines sharing one backing file do not clobber each other's writes.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(path);

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;

    // on failure the temporary file is removed when the error drops it
    file.persist(path).map_err(|e| e.error)?;

    // make the rename itself durable
    if let Ok(dir) = File::open(dir) {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Create the file (and its parent directories) if it does not exist yet
pub fn ensure_exists(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().append(true).create(true).open(path)?;
    Ok(())
}

/// Copy every document of `from` into `into`, overwriting same keys
///
/// Collections present only in `from` are created; entries present only in
/// `into` are kept.
pub fn merge(into: &mut ContentTree, from: ContentTree) {
    for (name, table) in from {
        into.entry(name).or_default().extend(table);
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
