//! Document values
//!
//! A [`Document`] is an opaque, syntactically valid JSON value. Its source
//! text is kept exactly as received (apart from surrounding whitespace), so
//! a stored document reads back byte for byte. Validation happens once, when
//! the document is constructed; the engine never looks inside it.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{Result, StoreError};

/// A single JSON value stored under a key
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Box<RawValue>);

impl Document {
    /// Validate `text` as JSON and wrap it
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str::<Box<RawValue>>(text)
            .map(Document)
            .map_err(|e| StoreError::Validation(format!("invalid JSON document: {}", e)))
    }

    /// Validate raw bytes (e.g. a request body) as JSON and wrap them
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice::<Box<RawValue>>(bytes)
            .map(Document)
            .map_err(|e| StoreError::Validation(format!("invalid JSON document: {}", e)))
    }

    /// Encode any serializable value as a document
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::value::to_raw_value(value)
            .map(Document)
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decode the document into a concrete type
    pub fn to_value<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.0.get())
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// The stored JSON text
    pub fn as_str(&self) -> &str {
        self.0.get()
    }

    /// True if the document is the JSON literal `null`
    pub fn is_null(&self) -> bool {
        self.0.get() == "null"
    }

    pub(crate) fn as_raw(&self) -> &RawValue {
        &self.0
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Document").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Document {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}
