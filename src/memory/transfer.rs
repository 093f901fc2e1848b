//! Bulk transfers between regions, byte sequences and raw files
//!
//! Every operation here moves the whole buffer or nothing: a region write is
//! checked against the extent before the first byte lands, and file I/O errors
//! abort with the offending path attached.

use super::region::MemoryRegion;
use crate::core::types::{format_address, MemoryError, MemoryResult};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Write `bytes` into `region` starting at `address`
pub fn write_value<R: MemoryRegion + ?Sized>(
    region: &mut R,
    address: u32,
    bytes: &[u8],
) -> MemoryResult<()> {
    if bytes.is_empty() {
        return Err(MemoryError::bad_value("nothing to write"));
    }
    region.write_bytes(address, bytes)?;
    debug!(address = %format_address(address), len = bytes.len(), "wrote value");
    Ok(())
}

/// Read all of `path` and write it into `region` at `address`
///
/// Returns the number of bytes written; an empty file writes nothing.
pub fn load_file<R: MemoryRegion + ?Sized>(
    region: &mut R,
    address: u32,
    path: impl AsRef<Path>,
) -> MemoryResult<usize> {
    let path = path.as_ref();
    let contents = fs::read(path).map_err(|e| MemoryError::io(path, e))?;
    if contents.is_empty() {
        debug!(path = %path.display(), "file is empty, nothing to load");
        return Ok(0);
    }

    region.write_bytes(address, &contents)?;
    info!(
        path = %path.display(),
        address = %format_address(address),
        len = contents.len(),
        "loaded file into memory"
    );
    Ok(contents.len())
}

/// Write the raw bytes of the whole region to `path`, no header
///
/// Returns the number of bytes written.
pub fn dump_region<R: MemoryRegion + ?Sized>(
    region: &R,
    path: impl AsRef<Path>,
) -> MemoryResult<usize> {
    let path = path.as_ref();
    let bytes = region.read_all()?;

    let mut file = fs::File::create(path).map_err(|e| MemoryError::io(path, e))?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|e| MemoryError::io(path, e))?;

    info!(path = %path.display(), len = bytes.len(), "dumped region");
    Ok(bytes.len())
}
