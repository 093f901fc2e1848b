//! Memory access module for searching and writing address spaces
//!
//! This module provides:
//! - The [`MemoryRegion`] capability and a buffer-backed implementation
//! - Address space selection through [`AddressSpaceProvider`]
//! - Directional pattern search
//! - Bulk writes, file loads and raw dumps

pub mod region;
pub mod scanner;
pub mod spaces;
pub mod transfer;

pub use region::{BufferRegion, MemoryRegion};
pub use scanner::{find, MemoryScanner, SearchDirection};
pub use spaces::{AddressSpaceKind, AddressSpaceProvider, AddressSpaces};
pub use transfer::{dump_region, load_file, write_value};
