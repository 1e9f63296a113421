//! Program-wide type identity tokens.
//!
//! `TypeToken` is the identity a cell reports for its stored value. It
//! wraps `TypeId`, which is guaranteed unique for every concrete type
//! across all codegen units of a linked program, and carries the type
//! name for diagnostics.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::any::{TypeId, type_name};

/// Identity of an erased type.
///
/// Equality is decided by [`TypeId`] alone; the name rides along for
/// error messages and logs and takes no part in comparisons.
#[derive(Debug, Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Token for a concrete type.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Token reported by a cell that holds no value.
    #[inline]
    pub fn vacant() -> Self {
        Self::of::<Vacant>()
    }

    /// Returns `true` for the token of [`Vacant`].
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.id == TypeId::of::<Vacant>()
    }

    /// Unique program-wide type id.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Diagnostic type name. Not guaranteed unique; display only.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Marker type whose identity stands for "no value".
///
/// An empty cell reports `TypeToken::of::<Vacant>()` from its type query,
/// and a typed access against an empty cell fails with this token as the
/// stored identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vacant;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_equality_by_id() {
        assert_eq!(TypeToken::of::<u32>(), TypeToken::of::<u32>());
        assert_ne!(TypeToken::of::<u32>(), TypeToken::of::<i32>());
    }

    #[test]
    fn test_vacant_token() {
        let vacant = TypeToken::vacant();
        assert!(vacant.is_vacant());
        assert!(!TypeToken::of::<u32>().is_vacant());
        assert_eq!(vacant, TypeToken::of::<Vacant>());
    }

    #[test]
    fn test_name_is_diagnostic_only() {
        let token = TypeToken::of::<u32>();
        assert_eq!(token.name(), "u32");
        assert_eq!(format!("{token}"), "u32");
    }
}
