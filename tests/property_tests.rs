//! Property tests for the round-trip and composition invariants.

use inline_any::{CopyAny, InlineAny};
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip_u64(value in any::<u64>()) {
        let cell = InlineAny::<16>::from_value(value);
        prop_assert_eq!(cell.get::<u64>(), Ok(&value));
        prop_assert_eq!(cell.size(), 8);
    }

    #[test]
    fn roundtrip_byte_arrays(bytes in any::<[u8; 24]>()) {
        let cell = InlineAny::<24>::from_value(bytes);
        prop_assert_eq!(cell.get::<[u8; 24]>(), Ok(&bytes));
    }

    #[test]
    fn cross_capacity_preserves_type_and_value(x in any::<i32>(), y in any::<i32>()) {
        let small = InlineAny::<8>::from_value((x, y));
        let big = InlineAny::<64>::cloned_from(&small);
        prop_assert_eq!(big.get::<(i32, i32)>(), Ok(&(x, y)));
        prop_assert_eq!(big.type_token(), small.type_token());
        prop_assert_eq!(big.size(), small.size());
    }

    #[test]
    fn assign_always_replaces(first in any::<u64>(), second in any::<u32>()) {
        let mut cell = InlineAny::<16>::from_value(first);
        cell.assign(second);
        prop_assert!(cell.is::<u32>());
        prop_assert!(!cell.is::<u64>());
        prop_assert_eq!(cell.get::<u32>(), Ok(&second));
    }

    #[test]
    fn take_after_store_returns_the_value(value in any::<i64>()) {
        let mut cell = InlineAny::<16>::from_value(value);
        prop_assert_eq!(cell.take::<i64>(), Ok(value));
        prop_assert!(cell.is_empty());
    }

    #[test]
    fn copy_any_roundtrip(value in any::<i64>()) {
        let cell = CopyAny::<8>::from_value(value);
        prop_assert_eq!(cell.get::<i64>(), Ok(value));
    }
}
