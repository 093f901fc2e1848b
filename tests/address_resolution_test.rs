//! Property and boundary tests for target address resolution

use memory_inspector::core::types::{apply_offset, MemoryError, TargetAddress};
use proptest::prelude::*;

fn signed_hex(offset: i32) -> String {
    if offset < 0 {
        format!("-{:x}", offset.unsigned_abs())
    } else {
        format!("{:x}", offset)
    }
}

proptest! {
    #[test]
    fn resolved_address_is_the_true_sum(address in any::<u32>(), offset in any::<i32>()) {
        let true_sum = i64::from(address) + i64::from(offset);
        let in_range = (0..=i64::from(u32::MAX)).contains(&true_sum);

        let target = TargetAddress::resolve(&format!("{:X}", address), &signed_hex(offset));
        prop_assert!(target.is_good_address);
        prop_assert_eq!(target.is_good_offset, in_range);
        if in_range {
            prop_assert_eq!(i64::from(target.address), true_sum);
        }
    }

    #[test]
    fn most_negative_offset_needs_high_base(address in any::<u32>()) {
        let target = TargetAddress::resolve(&format!("{:08x}", address), "-80000000");
        prop_assert_eq!(target.is_good_offset, address >= 0x8000_0000);
        if target.is_good_offset {
            prop_assert_eq!(target.address, address - 0x8000_0000);
        }
    }

    #[test]
    fn empty_offset_keeps_address(address in any::<u32>()) {
        let target = TargetAddress::resolve(&format!("{:x}", address), "");
        prop_assert_eq!(target.valid().unwrap(), address);
    }
}

#[test]
fn test_empty_fields() {
    let target = TargetAddress::resolve("", "");
    assert_eq!(target.address, 0);
    assert!(target.is_good_address);
    assert!(target.is_good_offset);
}

#[test]
fn test_positive_boundary() {
    assert_eq!(
        TargetAddress::resolve("FFFFFFFF", "0").valid().unwrap(),
        u32::MAX
    );
    assert_eq!(
        TargetAddress::resolve("FFFFFFFF", "").valid().unwrap(),
        u32::MAX
    );
    assert!(!TargetAddress::resolve("FFFFFFFF", "1").is_good_offset);
    assert_eq!(
        TargetAddress::resolve("80000000", "7FFFFFFF").valid().unwrap(),
        u32::MAX
    );
    assert!(!TargetAddress::resolve("80000001", "7FFFFFFF").is_good_offset);
    assert_eq!(apply_offset(u32::MAX, 0), Some(u32::MAX));
}

#[test]
fn test_whitespace_is_trimmed() {
    assert_eq!(
        TargetAddress::resolve(" 80000000 ", " -4 ").valid().unwrap(),
        0x7FFF_FFFC
    );
}

#[test]
fn test_malformed_inputs() {
    let cases = [
        ("8000_0000", "", true),
        ("0x", "", true),
        ("100000000", "", true),
        ("80000000", "1G", false),
        ("80000000", "+-1", false),
        ("80000000", "-100000000", false),
    ];

    for (address, offset, address_is_bad) in cases {
        let target = TargetAddress::resolve(address, offset);
        let err = target.valid().unwrap_err();
        if address_is_bad {
            assert!(matches!(err, MemoryError::BadAddress(_)), "{address} {offset}");
        } else {
            assert!(matches!(err, MemoryError::BadOffset(_)), "{address} {offset}");
        }
    }
}
