//! Inspector controller
//!
//! Holds the raw text the user typed and turns each panel action into explicit
//! calls on the resolver, codec, scanner and transfer functions. The controller
//! owns no memory; it borrows regions from its [`AddressSpaceProvider`].

use crate::core::types::{
    format_address, EncodedValue, MemoryError, MemoryResult, TargetAddress, ValueEncoding,
};
use crate::memory::{
    dump_region, load_file, write_value, AddressSpaceKind, AddressSpaceProvider, MemoryScanner,
    SearchDirection,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a find request turned up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "address", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(#[serde(with = "hex_address")] u32),
    NoMatch,
}

/// Addresses travel as the same 8-digit hex the address box shows
mod hex_address {
    use crate::core::types::{format_address, parse_hex_address};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(address: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_address(*address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_hex_address(&text)
            .ok_or_else(|| de::Error::custom(format!("'{}' is not a hex address", text)))
    }
}

/// Controller state for one inspector panel
#[derive(Debug)]
pub struct MemoryInspector<S> {
    spaces: S,
    address_space: AddressSpaceKind,
    address_text: String,
    offset_text: String,
    value_text: String,
    encoding: ValueEncoding,
    hex_base: bool,
}

impl<S: AddressSpaceProvider> MemoryInspector<S> {
    pub fn new(spaces: S) -> Self {
        MemoryInspector {
            spaces,
            address_space: AddressSpaceKind::default(),
            address_text: String::new(),
            offset_text: String::new(),
            value_text: String::new(),
            encoding: ValueEncoding::U8,
            hex_base: false,
        }
    }

    pub fn spaces(&self) -> &S {
        &self.spaces
    }

    pub fn spaces_mut(&mut self) -> &mut S {
        &mut self.spaces
    }

    pub fn into_spaces(self) -> S {
        self.spaces
    }

    pub fn address_space(&self) -> AddressSpaceKind {
        self.address_space
    }

    pub fn set_address_space(&mut self, kind: AddressSpaceKind) {
        self.address_space = kind;
    }

    pub fn address_text(&self) -> &str {
        &self.address_text
    }

    pub fn set_address_text(&mut self, text: impl Into<String>) {
        self.address_text = text.into();
    }

    pub fn offset_text(&self) -> &str {
        &self.offset_text
    }

    pub fn set_offset_text(&mut self, text: impl Into<String>) {
        self.offset_text = text.into();
    }

    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    pub fn set_value_text(&mut self, text: impl Into<String>) {
        self.value_text = text.into();
    }

    pub fn encoding(&self) -> ValueEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: ValueEncoding) {
        self.encoding = encoding;
    }

    /// The hex-base toggle as the user left it
    pub fn hex_base(&self) -> bool {
        self.hex_base
    }

    pub fn set_hex_base(&mut self, enabled: bool) {
        self.hex_base = enabled;
    }

    /// Whether the hex-base toggle should be offered for the current encoding
    pub fn hex_base_enabled(&self) -> bool {
        self.encoding.supports_hex_base()
    }

    /// Resolve the current address and offset text
    pub fn target(&self) -> TargetAddress {
        TargetAddress::resolve(&self.address_text, &self.offset_text)
    }

    /// Address the view should jump to, if the typed target is usable
    pub fn navigate(&self) -> Option<u32> {
        let target = self.target();
        target.is_good().then_some(target.address)
    }

    /// Validate the current value text
    pub fn preview(&self) -> MemoryResult<EncodedValue> {
        self.encoding
            .encode(&self.value_text, self.hex_base && self.hex_base_enabled())
    }

    /// Full bytes for the current value; empty when the value does not parse
    pub fn input_bytes(&self) -> Vec<u8> {
        self.preview().map(EncodedValue::into_bytes).unwrap_or_default()
    }

    /// Write the current value at the current target
    pub fn set_value(&mut self) -> MemoryResult<u32> {
        let address = self.target().valid()?;
        let bytes = self.value_bytes()?;

        let region = self.spaces.region_mut(self.address_space)?;
        write_value(region, address, &bytes)?;
        info!(
            space = %self.address_space,
            address = %format_address(address),
            len = bytes.len(),
            "set value"
        );
        Ok(address)
    }

    /// Write the contents of `path` at the current target
    pub fn set_value_from_file(&mut self, path: impl AsRef<Path>) -> MemoryResult<usize> {
        let address = self.target().valid()?;
        let region = self.spaces.region_mut(self.address_space)?;
        load_file(region, address, path)
    }

    pub fn find_next(&mut self) -> MemoryResult<SearchOutcome> {
        self.find(SearchDirection::Forward)
    }

    pub fn find_previous(&mut self) -> MemoryResult<SearchOutcome> {
        self.find(SearchDirection::Backward)
    }

    /// Search the active space for the current value
    ///
    /// A hit replaces the address text with the match and clears the offset, so
    /// repeating the request walks through successive matches.
    pub fn find(&mut self, direction: SearchDirection) -> MemoryResult<SearchOutcome> {
        let start = self.target().valid()?;
        let pattern = self.value_bytes()?;
        let resume = !self.address_text.trim().is_empty();

        let region = self.spaces.region(self.address_space)?;
        let found = MemoryScanner::new(region).find(start, &pattern, direction, resume)?;

        match found {
            Some(address) => {
                self.address_text = format_address(address);
                self.offset_text.clear();
                Ok(SearchOutcome::Found(address))
            }
            None => Ok(SearchOutcome::NoMatch),
        }
    }

    /// Dump a raw address space to its conventional file name inside `dir`
    pub fn dump(&self, kind: AddressSpaceKind, dir: impl AsRef<Path>) -> MemoryResult<PathBuf> {
        let file_name = kind
            .dump_file_name()
            .ok_or_else(|| MemoryError::UnknownAddressSpace(format!("{} has no raw dump", kind)))?;
        let path = dir.as_ref().join(file_name);

        let region = self.spaces.region(kind)?;
        dump_region(region, &path)?;
        Ok(path)
    }

    fn value_bytes(&self) -> MemoryResult<Vec<u8>> {
        let value = self.preview()?;
        debug!(preview = %value.preview, "using value");
        Ok(value.into_bytes())
    }
}
