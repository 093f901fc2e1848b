//! Directional pattern search with resume-safe start adjustment

use super::region::MemoryRegion;
use crate::core::types::{format_address, MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Which way the scan walks from the start address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    pub const fn is_forward(&self) -> bool {
        matches!(self, SearchDirection::Forward)
    }

    /// First address to scan when continuing past a previous hit at `address`
    ///
    /// Returns `None` when stepping would leave the 32-bit address space.
    pub fn step_from(&self, address: u32) -> Option<u32> {
        match self {
            SearchDirection::Forward => address.checked_add(1),
            SearchDirection::Backward => address.checked_sub(1),
        }
    }
}

/// Scanner bound to one region for the duration of a query
pub struct MemoryScanner<'a, R: MemoryRegion + ?Sized> {
    region: &'a R,
}

impl<'a, R: MemoryRegion + ?Sized> MemoryScanner<'a, R> {
    pub fn new(region: &'a R) -> Self {
        MemoryScanner { region }
    }

    /// Find `pattern` from `start` in `direction`
    ///
    /// With `resume` set the caller is continuing from an explicit address, so the
    /// scan begins one byte past it and never reports the same hit twice.
    pub fn find(
        &self,
        start: u32,
        pattern: &[u8],
        direction: SearchDirection,
        resume: bool,
    ) -> MemoryResult<Option<u32>> {
        if pattern.is_empty() {
            return Err(MemoryError::bad_value("search pattern is empty"));
        }

        let start = if resume {
            match direction.step_from(start) {
                Some(next) => next,
                None => {
                    debug!(start, ?direction, "search start steps off the address space");
                    return Ok(None);
                }
            }
        } else {
            start
        };

        trace!(
            start = %format_address(start),
            len = pattern.len(),
            ?direction,
            "searching"
        );
        let found = self.region.search(start, pattern, direction.is_forward());

        match found {
            Some(address) => debug!(address = %format_address(address), "match found"),
            None => debug!("no match"),
        }
        Ok(found)
    }

    pub fn find_next(&self, start: u32, pattern: &[u8], resume: bool) -> MemoryResult<Option<u32>> {
        self.find(start, pattern, SearchDirection::Forward, resume)
    }

    pub fn find_previous(
        &self,
        start: u32,
        pattern: &[u8],
        resume: bool,
    ) -> MemoryResult<Option<u32>> {
        self.find(start, pattern, SearchDirection::Backward, resume)
    }
}

/// One-shot form of [`MemoryScanner::find`]
pub fn find<R: MemoryRegion + ?Sized>(
    region: &R,
    start: u32,
    pattern: &[u8],
    direction: SearchDirection,
    resume: bool,
) -> MemoryResult<Option<u32>> {
    MemoryScanner::new(region).find(start, pattern, direction, resume)
}
