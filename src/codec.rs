//! Binary codec for cache storage of [`SaleItem`].
//!
//! Encoding is deterministic and lossless for all valid field values.
//! Decoding input that was not produced by [`encode`] fails with
//! [`CodecError::CorruptPayload`]; callers treat that exactly like a cache
//! miss — a corrupt entry is never trusted as authoritative.

use std::fmt;

use crate::item::SaleItem;

/// Error type for cache codec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The payload could not be decoded into a `SaleItem`.
    CorruptPayload(String),
    /// Encoding failed (should not happen for valid items).
    EncodeFailed(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::CorruptPayload(msg) => write!(f, "corrupt cache payload: {}", msg),
            CodecError::EncodeFailed(msg) => write!(f, "item encode failed: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encode an item to its compact binary cache form.
pub fn encode(item: &SaleItem) -> Result<Vec<u8>, CodecError> {
    bitcode::serialize(item).map_err(|e| CodecError::EncodeFailed(e.to_string()))
}

/// Decode an item from its binary cache form.
pub fn decode(bytes: &[u8]) -> Result<SaleItem, CodecError> {
    bitcode::deserialize(bytes).map_err(|e| CodecError::CorruptPayload(e.to_string()))
}
