//! Address space selection
//!
//! The inspector never talks to a storage backend directly. It asks an
//! [`AddressSpaceProvider`] for the region behind an [`AddressSpaceKind`].

use super::region::MemoryRegion;
use crate::core::types::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which logical or physical memory an address is interpreted against
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AddressSpaceKind {
    /// CPU-visible addresses, after translation
    #[default]
    Effective,
    /// Auxiliary RAM
    Auxiliary,
    /// Physical addresses
    Physical,
    /// Main RAM, raw
    Mem1,
    /// Extended RAM, raw
    Mem2,
    /// Fake virtual memory backing
    Fake,
}

impl AddressSpaceKind {
    pub const ALL: [AddressSpaceKind; 6] = [
        AddressSpaceKind::Effective,
        AddressSpaceKind::Auxiliary,
        AddressSpaceKind::Physical,
        AddressSpaceKind::Mem1,
        AddressSpaceKind::Mem2,
        AddressSpaceKind::Fake,
    ];

    /// Spaces offered for browsing, searching and writing
    pub const SELECTABLE: [AddressSpaceKind; 3] = [
        AddressSpaceKind::Effective,
        AddressSpaceKind::Auxiliary,
        AddressSpaceKind::Physical,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            AddressSpaceKind::Effective => "effective",
            AddressSpaceKind::Auxiliary => "auxiliary",
            AddressSpaceKind::Physical => "physical",
            AddressSpaceKind::Mem1 => "mem1",
            AddressSpaceKind::Mem2 => "mem2",
            AddressSpaceKind::Fake => "fake",
        }
    }

    /// File name used when the space is dumped, `None` if it has no raw dump
    pub const fn dump_file_name(&self) -> Option<&'static str> {
        match self {
            AddressSpaceKind::Mem1 => Some("mem1.raw"),
            AddressSpaceKind::Mem2 => Some("mem2.raw"),
            AddressSpaceKind::Auxiliary => Some("aram.raw"),
            AddressSpaceKind::Fake => Some("fakevmem.raw"),
            AddressSpaceKind::Effective | AddressSpaceKind::Physical => None,
        }
    }
}

impl fmt::Display for AddressSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AddressSpaceKind {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AddressSpaceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| MemoryError::UnknownAddressSpace(s.to_string()))
    }
}

/// Hands out the region backing an address space
pub trait AddressSpaceProvider {
    fn region(&self, kind: AddressSpaceKind) -> MemoryResult<&dyn MemoryRegion>;

    fn region_mut(&mut self, kind: AddressSpaceKind) -> MemoryResult<&mut dyn MemoryRegion>;
}

/// Map-backed provider; spaces that were never registered are unavailable
#[derive(Default)]
pub struct AddressSpaces {
    regions: HashMap<AddressSpaceKind, Box<dyn MemoryRegion>>,
}

impl AddressSpaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`AddressSpaces::insert`]
    pub fn with_region(
        mut self,
        kind: AddressSpaceKind,
        region: impl MemoryRegion + 'static,
    ) -> Self {
        self.insert(kind, region);
        self
    }

    /// Register `region` for `kind`, returning whatever was there before
    pub fn insert(
        &mut self,
        kind: AddressSpaceKind,
        region: impl MemoryRegion + 'static,
    ) -> Option<Box<dyn MemoryRegion>> {
        self.regions.insert(kind, Box::new(region))
    }

    pub fn remove(&mut self, kind: AddressSpaceKind) -> Option<Box<dyn MemoryRegion>> {
        self.regions.remove(&kind)
    }

    pub fn contains(&self, kind: AddressSpaceKind) -> bool {
        self.regions.contains_key(&kind)
    }

    /// Registered kinds, in declaration order
    pub fn kinds(&self) -> Vec<AddressSpaceKind> {
        let mut kinds: Vec<_> = self.regions.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl AddressSpaceProvider for AddressSpaces {
    fn region(&self, kind: AddressSpaceKind) -> MemoryResult<&dyn MemoryRegion> {
        match self.regions.get(&kind) {
            Some(region) => Ok(region.as_ref()),
            None => Err(MemoryError::UnknownAddressSpace(kind.to_string())),
        }
    }

    fn region_mut(&mut self, kind: AddressSpaceKind) -> MemoryResult<&mut dyn MemoryRegion> {
        let region: &mut dyn MemoryRegion = match self.regions.get_mut(&kind) {
            Some(region) => region.as_mut(),
            None => return Err(MemoryError::UnknownAddressSpace(kind.to_string())),
        };
        Ok(region)
    }
}

impl fmt::Debug for AddressSpaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpaces")
            .field("kinds", &self.kinds())
            .finish()
    }
}
