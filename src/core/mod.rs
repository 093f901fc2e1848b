//! Core module containing fundamental types for Memory-Inspector
//!
//! This module provides the pure building blocks used throughout the crate:
//! address resolution, value encoding and error types. Nothing in here touches
//! memory or the filesystem.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    EncodedValue,
    MemoryError,
    MemoryResult,
    TargetAddress,
    ValueEncoding,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
