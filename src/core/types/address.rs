//! Target address resolution from user-typed base and offset text

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Result of combining a base address with a signed offset
///
/// `address` is only meaningful when both flags are set; use [`TargetAddress::valid`]
/// to get at it safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetAddress {
    pub address: u32,
    pub is_good_address: bool,
    pub is_good_offset: bool,
}

impl TargetAddress {
    /// Resolves `address_text` (unsigned hex) plus `offset_text` (signed hex)
    ///
    /// Empty text on either side stands for zero. An offset that would move the
    /// address below zero or past `u32::MAX` marks the offset as bad.
    pub fn resolve(address_text: &str, offset_text: &str) -> Self {
        let address_text = address_text.trim();
        let offset_text = offset_text.trim();

        let (base, is_good_address) = if address_text.is_empty() {
            (0, true)
        } else {
            match parse_hex_address(address_text) {
                Some(base) => (base, true),
                None => (0, false),
            }
        };

        let (offset, parsed_offset) = if offset_text.is_empty() {
            (0, true)
        } else {
            match parse_hex_offset(offset_text) {
                Some(offset) => (offset, true),
                None => (0, false),
            }
        };

        // Checked against base 0 when the address itself is unparsable.
        let combined = apply_offset(base, offset);
        let is_good_offset = parsed_offset && combined.is_some();

        if !is_good_address || !is_good_offset {
            debug!(
                address_text,
                offset_text, is_good_address, is_good_offset, "rejected target address"
            );
        }

        TargetAddress {
            address: match (is_good_address, combined) {
                (true, Some(address)) if is_good_offset => address,
                _ => 0,
            },
            is_good_address,
            is_good_offset,
        }
    }

    /// Whether both the address and the offset were accepted
    pub const fn is_good(&self) -> bool {
        self.is_good_address && self.is_good_offset
    }

    /// Returns the address, or the error for whichever half was rejected
    pub fn valid(&self) -> MemoryResult<u32> {
        if !self.is_good_address {
            return Err(MemoryError::BadAddress(
                "address must be unsigned hexadecimal".to_string(),
            ));
        }
        if !self.is_good_offset {
            return Err(MemoryError::BadOffset(
                "offset is malformed or moves the address out of 32-bit range".to_string(),
            ));
        }
        Ok(self.address)
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_good() {
            f.write_str(&format_address(self.address))
        } else {
            f.write_str("<invalid>")
        }
    }
}

/// Parses unsigned 32-bit hex, with or without a `0x` prefix
pub fn parse_hex_address(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    parse_hex_digits(digits)
}

/// Parses signed 32-bit hex: optional sign, optional `0x`, then digits
pub fn parse_hex_offset(text: &str) -> Option<i32> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = i64::from(parse_hex_address(rest)?);
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Applies a signed offset to a base address without wrapping
pub fn apply_offset(base: u32, offset: i32) -> Option<u32> {
    if offset < 0 {
        // unsigned_abs maps i32::MIN to i32::MAX + 1 instead of overflowing
        let magnitude = offset.unsigned_abs();
        (magnitude <= base).then(|| base - magnitude)
    } else {
        let offset = offset as u32;
        (u32::MAX - offset >= base).then(|| base + offset)
    }
}

/// Formats an address the way the search box shows it: 8 lowercase hex digits
pub fn format_address(address: u32) -> String {
    format!("{:08x}", address)
}

fn parse_hex_digits(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
