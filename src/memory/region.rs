//! The memory region capability and its in-memory backend
//!
//! A region is an addressable byte range `[begin, end)` owned by the surrounding
//! application. Inspector operations borrow it for a single call.

use crate::core::types::{MemoryError, MemoryResult};
use std::fmt;

/// Byte-level access to one address space
pub trait MemoryRegion {
    /// First address and one-past-last address of the region
    ///
    /// `end` is a `u64` so a region may reach `u32::MAX` inclusive.
    fn extent(&self) -> (u32, u64);

    /// Read the byte at an absolute address
    fn read_byte(&self, address: u32) -> MemoryResult<u8>;

    /// Write the byte at an absolute address
    fn write_byte(&mut self, address: u32, value: u8) -> MemoryResult<()>;

    /// Find `pattern` starting the scan at `start`
    ///
    /// Forward returns the lowest match at or after `start`, backward the highest
    /// match starting at or before `start`. The scan never wraps.
    fn search(&self, start: u32, pattern: &[u8], forward: bool) -> Option<u32>;

    /// Number of bytes in the region
    fn len(&self) -> usize {
        let (begin, end) = self.extent();
        (end - u64::from(begin)) as usize
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `address` falls inside the region
    fn contains(&self, address: u32) -> bool {
        let (begin, end) = self.extent();
        address >= begin && u64::from(address) < end
    }

    /// Write a contiguous run of bytes, rejecting it up front if it leaves the region
    fn write_bytes(&mut self, address: u32, data: &[u8]) -> MemoryResult<()> {
        check_span(self.extent(), address, data.len())?;
        for (i, byte) in data.iter().enumerate() {
            self.write_byte(address + i as u32, *byte)?;
        }
        Ok(())
    }

    /// Copy out every byte of the region
    fn read_all(&self) -> MemoryResult<Vec<u8>> {
        let (begin, end) = self.extent();
        (u64::from(begin)..end)
            .map(|address| self.read_byte(address as u32))
            .collect()
    }
}

/// Ensures `len` bytes at `address` lie inside `extent`
pub(crate) fn check_span(extent: (u32, u64), address: u32, len: usize) -> MemoryResult<()> {
    let (begin, end) = extent;
    if address < begin || u64::from(address) + len as u64 > end {
        return Err(MemoryError::OutOfRange { address, len });
    }
    Ok(())
}

/// A region backed by an owned byte buffer mapped at a base address
#[derive(Clone, PartialEq, Eq)]
pub struct BufferRegion {
    base: u32,
    data: Vec<u8>,
}

impl BufferRegion {
    /// Map `data` at `base`; the buffer must not run past the 32-bit address space
    pub fn new(base: u32, data: Vec<u8>) -> MemoryResult<Self> {
        if u64::from(base) + data.len() as u64 > 1u64 << 32 {
            return Err(MemoryError::OutOfRange {
                address: base,
                len: data.len(),
            });
        }
        Ok(BufferRegion { base, data })
    }

    /// A zero-filled region of `size` bytes
    pub fn zeroed(base: u32, size: usize) -> MemoryResult<Self> {
        Self::new(base, vec![0; size])
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn index_of(&self, address: u32) -> MemoryResult<usize> {
        check_span(self.extent(), address, 1)?;
        Ok((address - self.base) as usize)
    }
}

impl MemoryRegion for BufferRegion {
    fn extent(&self) -> (u32, u64) {
        (self.base, u64::from(self.base) + self.data.len() as u64)
    }

    fn read_byte(&self, address: u32) -> MemoryResult<u8> {
        let index = self.index_of(address)?;
        Ok(self.data[index])
    }

    fn write_byte(&mut self, address: u32, value: u8) -> MemoryResult<()> {
        let index = self.index_of(address)?;
        self.data[index] = value;
        Ok(())
    }

    fn search(&self, start: u32, pattern: &[u8], forward: bool) -> Option<u32> {
        let len = pattern.len();
        if len == 0 || len > self.data.len() {
            return None;
        }
        // Highest index a match may start at.
        let last = self.data.len() - len;

        let found = if forward {
            let from = start.saturating_sub(self.base) as usize;
            if start > self.base && from > last {
                return None;
            }
            self.data[from..]
                .windows(len)
                .position(|window| window == pattern)
                .map(|p| from + p)
        } else {
            if start < self.base {
                return None;
            }
            let upto = ((start - self.base) as usize).min(last);
            self.data[..upto + len]
                .windows(len)
                .rposition(|window| window == pattern)
        };

        found.map(|index| self.base + index as u32)
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> MemoryResult<()> {
        check_span(self.extent(), address, data.len())?;
        let index = (address - self.base) as usize;
        self.data[index..index + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_all(&self) -> MemoryResult<Vec<u8>> {
        Ok(self.data.clone())
    }
}

impl fmt::Debug for BufferRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferRegion")
            .field("base", &format_args!("0x{:08X}", self.base))
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> BufferRegion {
        BufferRegion::new(0x8000_0000, vec![1, 2, 3, 1, 2, 3, 9]).unwrap()
    }

    #[test]
    fn test_extent_and_contains() {
        let region = region();
        assert_eq!(region.extent(), (0x8000_0000, 0x8000_0007));
        assert_eq!(region.len(), 7);
        assert!(region.contains(0x8000_0006));
        assert!(!region.contains(0x8000_0007));
        assert!(!region.contains(0x7FFF_FFFF));
    }

    #[test]
    fn test_region_must_fit_address_space() {
        assert!(BufferRegion::zeroed(0xFFFF_FFFF, 1).is_ok());
        assert!(BufferRegion::zeroed(0xFFFF_FFFF, 2).is_err());

        let top = BufferRegion::zeroed(0xFFFF_FFF0, 16).unwrap();
        assert_eq!(top.extent().1, 1u64 << 32);
        assert!(top.contains(u32::MAX));
    }

    #[test]
    fn test_read_write_byte() {
        let mut region = region();
        assert_eq!(region.read_byte(0x8000_0002).unwrap(), 3);
        region.write_byte(0x8000_0002, 0xAA).unwrap();
        assert_eq!(region.read_byte(0x8000_0002).unwrap(), 0xAA);

        assert!(matches!(
            region.read_byte(0x8000_0007),
            Err(MemoryError::OutOfRange { .. })
        ));
        assert!(region.write_byte(0, 1).is_err());
    }

    #[test]
    fn test_write_bytes_is_all_or_nothing() {
        let mut region = region();
        region.write_bytes(0x8000_0005, &[7, 7]).unwrap();
        assert_eq!(region.as_bytes(), &[1, 2, 3, 1, 2, 7, 7]);

        let before = region.clone();
        assert!(region.write_bytes(0x8000_0005, &[0, 0, 0]).is_err());
        assert_eq!(region, before);
    }

    #[test]
    fn test_search_forward() {
        let region = region();
        assert_eq!(region.search(0x8000_0000, &[1, 2], true), Some(0x8000_0000));
        assert_eq!(region.search(0x8000_0001, &[1, 2], true), Some(0x8000_0003));
        assert_eq!(region.search(0x8000_0004, &[1, 2], true), None);
        assert_eq!(region.search(0, &[3, 9], true), Some(0x8000_0005));
        assert_eq!(region.search(0x9000_0000, &[1], true), None);
    }

    #[test]
    fn test_search_backward() {
        let region = region();
        assert_eq!(region.search(0x8000_0006, &[1, 2], false), Some(0x8000_0003));
        assert_eq!(region.search(0x8000_0003, &[1, 2], false), Some(0x8000_0003));
        assert_eq!(region.search(0x8000_0002, &[1, 2], false), Some(0x8000_0000));
        assert_eq!(region.search(u32::MAX, &[2, 3], false), Some(0x8000_0004));
        assert_eq!(region.search(0x7FFF_FFFF, &[1], false), None);
    }

    #[test]
    fn test_search_edge_patterns() {
        let region = region();
        assert_eq!(region.search(0x8000_0000, &[], true), None);
        assert_eq!(region.search(0x8000_0000, &[0; 8], true), None);
        assert_eq!(
            region.search(0x8000_0000, &[1, 2, 3, 1, 2, 3, 9], true),
            Some(0x8000_0000)
        );
    }

    #[test]
    fn test_default_read_all_matches_buffer() {
        struct Slow(BufferRegion);

        impl MemoryRegion for Slow {
            fn extent(&self) -> (u32, u64) {
                self.0.extent()
            }
            fn read_byte(&self, address: u32) -> MemoryResult<u8> {
                self.0.read_byte(address)
            }
            fn write_byte(&mut self, address: u32, value: u8) -> MemoryResult<()> {
                self.0.write_byte(address, value)
            }
            fn search(&self, start: u32, pattern: &[u8], forward: bool) -> Option<u32> {
                self.0.search(start, pattern, forward)
            }
        }

        let mut slow = Slow(region());
        slow.write_bytes(0x8000_0000, &[5, 5]).unwrap();
        assert_eq!(slow.read_all().unwrap(), vec![5, 5, 3, 1, 2, 3, 9]);
        assert!(slow.write_bytes(0x8000_0006, &[1, 1]).is_err());
    }
}
