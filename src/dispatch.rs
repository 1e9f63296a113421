//! Per-type operation dispatch.
//!
//! One monomorphized [`dispatch`] function exists per erased type. A cell
//! stores a single pointer to it and routes every later operation (type
//! query, size query, clone, relocation, drop) through that pointer with
//! an [`Op`] tag — a hand-built stand-in for a vtable that keeps the cell
//! itself free of any knowledge of the concrete type.

use core::mem;
use core::ptr;

use crate::token::TypeToken;

/// Operation selector for the per-type dispatch function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    /// Write the stored type's [`TypeToken`] through the first pointer.
    QueryToken,
    /// Write the stored type's size in bytes through the first pointer.
    QuerySize,
    /// Clone the value behind the second pointer into the first.
    Clone,
    /// Bitwise-move the value behind the second pointer into the first.
    /// The source bytes must not be read or dropped afterwards.
    Relocate,
    /// Drop the value behind the first pointer in place.
    Drop,
}

/// Dispatch entry signature: operation tag plus two raw addresses.
///
/// Which address is read and which is written depends on the tag; unused
/// addresses may be null. The function is stateless and shared by every
/// cell holding the same type.
pub(crate) type DispatchFn = unsafe fn(Op, *mut u8, *mut u8);

/// Dispatch entry for `T`.
#[inline]
pub(crate) fn dispatch_for<T: Clone + 'static>() -> DispatchFn {
    dispatch::<T>
}

/// The per-type operation handler.
///
/// # Safety
///
/// Pointers must satisfy the operation's contract: for `Clone` and
/// `Relocate`, `src` points to a live `T` and `dst` to writable storage
/// of at least `size_of::<T>()` bytes aligned for `T`; for `Drop`, `dst`
/// points to a live `T`; for the queries, `dst` is writable and aligned
/// for the written type.
unsafe fn dispatch<T: Clone + 'static>(op: Op, dst: *mut u8, src: *mut u8) {
    match op {
        Op::QueryToken => {
            // SAFETY: caller passes a slot aligned and writable for a token.
            unsafe { dst.cast::<TypeToken>().write(TypeToken::of::<T>()) };
        }
        Op::QuerySize => {
            // SAFETY: caller passes a slot aligned and writable for a usize.
            unsafe { dst.cast::<usize>().write(mem::size_of::<T>()) };
        }
        Op::Clone => {
            // SAFETY: `src` is a live `T`; the clone is computed before any
            // write, so a panicking `Clone` leaves `dst` untouched.
            let value = unsafe { &*src.cast::<T>() };
            let cloned = value.clone();
            // SAFETY: `dst` is writable storage for a `T`.
            unsafe { dst.cast::<T>().write(cloned) };
        }
        Op::Relocate => {
            // SAFETY: `src` is a live `T` the caller relinquishes; `dst` is
            // writable storage for a `T`. Moves are bitwise and infallible.
            let value = unsafe { src.cast::<T>().read() };
            unsafe { dst.cast::<T>().write(value) };
        }
        Op::Drop => {
            // SAFETY: `dst` is a live `T` the caller relinquishes.
            unsafe { ptr::drop_in_place(dst.cast::<T>()) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::MaybeUninit;

    #[test]
    fn test_query_operations() {
        let ops = dispatch_for::<u64>();

        let mut token = MaybeUninit::<TypeToken>::uninit();
        unsafe { ops(Op::QueryToken, token.as_mut_ptr().cast(), ptr::null_mut()) };
        assert_eq!(unsafe { token.assume_init() }, TypeToken::of::<u64>());

        let mut size = MaybeUninit::<usize>::uninit();
        unsafe { ops(Op::QuerySize, size.as_mut_ptr().cast(), ptr::null_mut()) };
        assert_eq!(unsafe { size.assume_init() }, 8);
    }

    #[test]
    fn test_clone_and_relocate() {
        let ops = dispatch_for::<u32>();
        let mut src = 41_u32;
        let mut a = MaybeUninit::<u32>::uninit();
        let mut b = MaybeUninit::<u32>::uninit();

        unsafe { ops(Op::Clone, a.as_mut_ptr().cast(), (&mut src as *mut u32).cast()) };
        assert_eq!(unsafe { a.assume_init() }, 41);

        unsafe { ops(Op::Relocate, b.as_mut_ptr().cast(), a.as_mut_ptr().cast()) };
        assert_eq!(unsafe { b.assume_init() }, 41);
    }

    #[test]
    fn test_same_type_same_entry() {
        assert!(ptr::fn_addr_eq(dispatch_for::<u32>(), dispatch_for::<u32>()));
    }
}
