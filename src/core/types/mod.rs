//! Core type definitions for Memory-Inspector
//!
//! This module contains the value objects shared by every inspector operation:
//! resolved target addresses, value encodings and the error type.

mod address;
mod error;
mod value;

// Re-export all public types
pub use address::{apply_offset, format_address, parse_hex_address, parse_hex_offset, TargetAddress};
pub use error::{MemoryError, MemoryResult};
pub use value::{
    extract_bytes, format_preview, validate, EncodedValue, ValueEncoding, PREVIEW_ELLIPSIS,
    PREVIEW_HEX_CHARS,
};
