//! Memory-Inspector library: the logic behind an emulator debugger's memory panel
//!
//! Resolves typed address/offset text, encodes typed values into canonical bytes
//! and searches address spaces for them.

pub mod config;
pub mod core;
pub mod inspector;
pub mod memory;

// Re-export main types from core module
pub use crate::core::types::{
    extract_bytes, validate, EncodedValue, MemoryError, MemoryResult, TargetAddress, ValueEncoding,
};
pub use inspector::{MemoryInspector, SearchOutcome};
pub use memory::{
    AddressSpaceKind, AddressSpaceProvider, AddressSpaces, BufferRegion, MemoryRegion,
    SearchDirection,
};

// Re-export core directly for full access
pub use crate::core::*;
