//! Fixed-capacity type-erased value cell.
//!
//! [`InlineAny`] owns a raw byte region of `N` bytes plus one dispatch
//! pointer and never allocates. A value of any type with
//! `size_of::<T>() <= N` (and alignment within [`MAX_ALIGN`]) is
//! constructed directly into the region; every later operation routes
//! through the dispatch entry recorded at construction, so the cell
//! itself carries no knowledge of the concrete type.

use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ptr;

use static_assertions::{const_assert, const_assert_eq};

use crate::dispatch::{DispatchFn, Op, dispatch_for};
use crate::error::{AnyError, AnyResult};
use crate::token::TypeToken;

/// Maximum payload alignment supported by the inline buffer.
///
/// The buffer sits at offset 0 of a 16-byte-aligned struct; payload types
/// with stricter alignment are rejected at compile time.
pub const MAX_ALIGN: usize = 16;

const_assert!(MAX_ALIGN.is_power_of_two());

/// Fixed-capacity container for a single value of any erasable type.
///
/// The capacity `N` is fixed for the life of the cell; it is never
/// resized or reallocated. An erasable type is any `T: Clone + 'static`
/// whose size fits `N` — the bound is enforced when the cell is
/// instantiated with `T`, at compile time, never at runtime.
///
/// The dispatch pointer is the only occupancy state: `None` means empty,
/// `Some` means the first `size()` bytes of the buffer hold a live value.
#[repr(C, align(16))]
pub struct InlineAny<const N: usize> {
    /// Raw storage; only the first `size()` bytes are live.
    buf: [MaybeUninit<u8>; N],
    /// Dispatch entry for the held type; `None` means empty.
    ops: Option<DispatchFn>,
    /// Erased payloads cannot prove `Send`/`Sync`; opt out of both.
    _marker: PhantomData<*mut ()>,
}

const_assert_eq!(core::mem::align_of::<InlineAny<16>>(), MAX_ALIGN);

impl<const N: usize> InlineAny<N> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            buf: [MaybeUninit::uninit(); N],
            ops: None,
            _marker: PhantomData,
        }
    }

    /// Creates a cell holding `value`.
    ///
    /// Rejected at compile time when `size_of::<T>() > N` or
    /// `align_of::<T>() > MAX_ALIGN`.
    pub fn from_value<T: Clone + 'static>(value: T) -> Self {
        let mut cell = Self::new();
        cell.install(value);
        cell
    }

    /// Copy-constructs from another cell of equal or smaller capacity.
    ///
    /// The source's own dispatch entry performs the clone, so the target
    /// never learns the concrete type. An empty source yields an empty
    /// cell. `M > N` is rejected at compile time.
    pub fn cloned_from<const M: usize>(other: &InlineAny<M>) -> Self {
        const {
            assert!(M <= N, "source cell capacity exceeds the target's");
        }
        let mut cell = Self::new();
        if let Some(ops) = other.ops {
            // SAFETY: `other` holds a live value of the dispatched type,
            // and our buffer is writable storage of at least M <= N bytes.
            unsafe { ops(Op::Clone, cell.data_ptr_mut(), other.data_ptr().cast_mut()) };
            cell.ops = Some(ops);
        }
        cell
    }

    /// Move-constructs from another cell of equal or smaller capacity,
    /// draining it.
    ///
    /// The source is left empty once its contents are relocated; it is
    /// never left holding a stale dispatch entry. `M > N` is rejected at
    /// compile time.
    pub fn taken_from<const M: usize>(other: &mut InlineAny<M>) -> Self {
        const {
            assert!(M <= N, "source cell capacity exceeds the target's");
        }
        let mut cell = Self::new();
        other.relocate_into(&mut cell);
        cell
    }

    /// Replaces the contents with `value`, destroying the previous value.
    ///
    /// `value` is already fully constructed when it arrives, and
    /// installing it is a bitwise move, so after this call the cell holds
    /// `value` unconditionally. Compile-time rejected when `T` exceeds
    /// the capacity or alignment bound.
    pub fn assign<T: Clone + 'static>(&mut self, value: T) {
        self.reset();
        self.install(value);
    }

    /// Clone-assigns the contents of `other`, rolling back on panic.
    ///
    /// The previous value is first relocated into a side cell, the source
    /// value is cloned into the now-empty buffer, and only then is the
    /// displaced value discarded. If the clone panics, the displaced
    /// value is restored before the unwind continues: after any attempt
    /// the cell holds either the new value or exactly the old one —
    /// never a partial state.
    ///
    /// An empty source leaves the target untouched.
    pub fn assign_cloned<const M: usize>(&mut self, other: &InlineAny<M>) {
        const {
            assert!(M <= N, "source cell capacity exceeds the target's");
        }
        let Some(ops) = other.ops else {
            return;
        };

        // Stage the current value out of the buffer.
        let mut saved = Self::new();
        self.relocate_into(&mut saved);

        // From here until `forget`, a panicking clone fires the guard and
        // the displaced value is relocated back in.
        let mut guard = Restore {
            target: self,
            saved: ManuallyDrop::new(saved),
        };
        // SAFETY: `other` holds a live value of the dispatched type; the
        // target buffer is empty writable storage of at least M <= N bytes.
        unsafe { ops(Op::Clone, guard.target.data_ptr_mut(), other.data_ptr().cast_mut()) };
        guard.target.ops = Some(ops);

        // Success: discard the displaced value instead of restoring it.
        // SAFETY: `saved` is taken exactly once; `forget` below prevents
        // the guard from taking it again.
        let displaced = unsafe { ManuallyDrop::take(&mut guard.saved) };
        mem::forget(guard);
        drop(displaced);
    }

    /// Move-assigns the contents of `other`, draining it.
    ///
    /// Relocation is bitwise and infallible, so the operation is
    /// unconditionally complete once it returns. An empty source leaves
    /// the target untouched. `M > N` is rejected at compile time.
    pub fn assign_taken<const M: usize>(&mut self, other: &mut InlineAny<M>) {
        const {
            assert!(M <= N, "source cell capacity exceeds the target's");
        }
        if other.is_empty() {
            return;
        }
        self.reset();
        other.relocate_into(self);
    }

    /// Destroys the current contents, then constructs the new value in
    /// place from `factory`.
    ///
    /// This entry point deliberately offers no rollback: the old value is
    /// gone before `factory` runs, and a panicking factory leaves the
    /// cell empty. Callers that need the previous value preserved on
    /// failure must use [`assign_cloned`](Self::assign_cloned) instead.
    pub fn emplace_with<T: Clone + 'static, F: FnOnce() -> T>(&mut self, factory: F) -> &mut T {
        self.reset();
        // `ops` is `None` here, so an unwinding factory leaves the cell
        // observably empty.
        self.install(factory());
        // SAFETY: `install` just placed a live `T` at the buffer base.
        unsafe { &mut *self.data_ptr_mut().cast::<T>() }
    }

    /// Destroys the held value (if any) and clears the cell.
    pub fn reset(&mut self) {
        if let Some(ops) = self.ops.take() {
            // SAFETY: the buffer holds a live value of the dispatched
            // type; `ops` was taken first, so the value drops exactly once.
            unsafe { ops(Op::Drop, self.data_ptr_mut(), ptr::null_mut()) };
        }
    }

    /// Returns whether the held value is a `T`.
    ///
    /// Returns `false` on an empty cell.
    pub fn is<T: Clone + 'static>(&self) -> bool {
        let Some(ops) = self.ops else {
            return false;
        };
        // Fast path: same monomorphized dispatch entry.
        if ptr::fn_addr_eq(ops, dispatch_for::<T>()) {
            return true;
        }
        // Dispatch entries may be duplicated across codegen units or
        // dynamic objects; the token comparison decides.
        self.stored_token(ops) == TypeToken::of::<T>()
    }

    /// Typed shared access to the held value.
    ///
    /// Fails with [`AnyError::TypeMismatch`] when the cell holds a
    /// different type or nothing at all.
    pub fn get<T: Clone + 'static>(&self) -> AnyResult<&T> {
        if self.is::<T>() {
            // SAFETY: `is` confirmed the buffer holds a live `T`.
            Ok(unsafe { &*self.data_ptr().cast::<T>() })
        } else {
            Err(self.mismatch::<T>())
        }
    }

    /// Typed exclusive access to the held value.
    pub fn get_mut<T: Clone + 'static>(&mut self) -> AnyResult<&mut T> {
        if self.is::<T>() {
            // SAFETY: `is` confirmed the buffer holds a live `T`.
            Ok(unsafe { &mut *self.data_ptr_mut().cast::<T>() })
        } else {
            Err(self.mismatch::<T>())
        }
    }

    /// Non-erroring probe: a reference to the held `T`, or `None` on
    /// mismatch or empty.
    pub fn downcast_ref<T: Clone + 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            // SAFETY: `is` confirmed the buffer holds a live `T`.
            Some(unsafe { &*self.data_ptr().cast::<T>() })
        } else {
            None
        }
    }

    /// Non-erroring probe: a mutable reference to the held `T`, or `None`
    /// on mismatch or empty.
    pub fn downcast_mut<T: Clone + 'static>(&mut self) -> Option<&mut T> {
        if self.is::<T>() {
            // SAFETY: `is` confirmed the buffer holds a live `T`.
            Some(unsafe { &mut *self.data_ptr_mut().cast::<T>() })
        } else {
            None
        }
    }

    /// Moves the held value out, leaving the cell empty.
    pub fn take<T: Clone + 'static>(&mut self) -> AnyResult<T> {
        if self.is::<T>() {
            self.ops = None;
            // SAFETY: the buffer held a live `T` and the dispatch entry
            // was cleared first, so ownership transfers exactly once.
            Ok(unsafe { self.data_ptr_mut().cast::<T>().read() })
        } else {
            Err(self.mismatch::<T>())
        }
    }

    /// Identity of the stored type, or the vacant token when empty.
    pub fn type_token(&self) -> TypeToken {
        match self.ops {
            None => TypeToken::vacant(),
            Some(ops) => self.stored_token(ops),
        }
    }

    /// Diagnostic name of the stored type.
    pub fn type_name(&self) -> &'static str {
        self.type_token().name()
    }

    /// Returns whether the cell holds no value.
    pub const fn is_empty(&self) -> bool {
        self.ops.is_none()
    }

    /// Size in bytes of the held value; 0 when empty.
    pub fn size(&self) -> usize {
        let Some(ops) = self.ops else {
            return 0;
        };
        let mut slot = MaybeUninit::<usize>::uninit();
        // SAFETY: the slot is aligned and writable for a usize.
        unsafe { ops(Op::QuerySize, slot.as_mut_ptr().cast(), ptr::null_mut()) };
        // SAFETY: the query wrote the slot.
        unsafe { slot.assume_init() }
    }

    /// Buffer capacity in bytes. Compile-time constant.
    pub const fn capacity() -> usize {
        N
    }

    /// Base pointer of the storage region.
    fn data_ptr(&self) -> *const u8 {
        self.buf.as_ptr().cast()
    }

    /// Mutable base pointer of the storage region.
    fn data_ptr_mut(&mut self) -> *mut u8 {
        self.buf.as_mut_ptr().cast()
    }

    /// Places `value` at the buffer base and records its dispatch entry.
    /// The cell must be empty.
    fn install<T: Clone + 'static>(&mut self, value: T) {
        const {
            assert!(
                mem::size_of::<T>() <= N,
                "payload does not fit the cell capacity"
            );
            assert!(
                mem::align_of::<T>() <= MAX_ALIGN,
                "payload alignment exceeds the cell buffer alignment"
            );
        }
        debug_assert!(self.ops.is_none());
        // SAFETY: the bounds above guarantee the buffer can hold an
        // aligned `T`, and the cell is empty.
        unsafe { self.data_ptr_mut().cast::<T>().write(value) };
        self.ops = Some(dispatch_for::<T>());
    }

    /// Bitwise-relocates the held value (if any) into `dst`, draining
    /// `self`. `dst` must be empty and at least as large.
    fn relocate_into<const M: usize>(&mut self, dst: &mut InlineAny<M>) {
        debug_assert!(dst.is_empty());
        if let Some(ops) = self.ops.take() {
            // SAFETY: our buffer holds a live value the entry was taken
            // from; `dst` is empty writable storage of sufficient size.
            unsafe { ops(Op::Relocate, dst.data_ptr_mut(), self.data_ptr_mut()) };
            dst.ops = Some(ops);
        }
    }

    /// Queries the dispatch entry for the stored token.
    fn stored_token(&self, ops: DispatchFn) -> TypeToken {
        let mut slot = MaybeUninit::<TypeToken>::uninit();
        // SAFETY: the slot is aligned and writable for a token.
        unsafe { ops(Op::QueryToken, slot.as_mut_ptr().cast(), ptr::null_mut()) };
        // SAFETY: the query wrote the slot.
        unsafe { slot.assume_init() }
    }

    /// Builds the mismatch error for a failed typed access.
    fn mismatch<T: 'static>(&self) -> AnyError {
        let stored = self.type_token();
        let requested = TypeToken::of::<T>();
        tracing::trace!(
            stored = stored.name(),
            requested = requested.name(),
            "typed access mismatch"
        );
        AnyError::TypeMismatch { stored, requested }
    }
}

impl<const N: usize> Default for InlineAny<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Clone for InlineAny<N> {
    fn clone(&self) -> Self {
        Self::cloned_from(self)
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_cloned(source);
    }
}

impl<const N: usize> Drop for InlineAny<N> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<const N: usize> fmt::Debug for InlineAny<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "InlineAny<{N}>(<empty>)")
        } else {
            write!(f, "InlineAny<{N}>({}, {} bytes)", self.type_name(), self.size())
        }
    }
}

/// Unwind guard for [`InlineAny::assign_cloned`]: puts the displaced
/// value back when the in-flight clone panics.
struct Restore<'a, const N: usize> {
    target: &'a mut InlineAny<N>,
    saved: ManuallyDrop<InlineAny<N>>,
}

impl<const N: usize> Drop for Restore<'_, N> {
    fn drop(&mut self) {
        // Runs only on unwind; the success path forgets the guard.
        // SAFETY: the success path takes `saved` before forgetting the
        // guard, so this is the only take on this path.
        let mut saved = unsafe { ManuallyDrop::take(&mut self.saved) };
        saved.relocate_into(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Vacant;

    #[test]
    fn test_new_cell_is_empty() {
        let cell: InlineAny<16> = InlineAny::new();
        assert!(cell.is_empty());
        assert_eq!(cell.size(), 0);
        assert_eq!(cell.type_token(), TypeToken::of::<Vacant>());
        assert_eq!(InlineAny::<16>::capacity(), 16);
    }

    #[test]
    fn test_from_value_and_get() {
        let cell = InlineAny::<16>::from_value(0xFEED_u64);
        assert!(!cell.is_empty());
        assert_eq!(cell.size(), 8);
        assert_eq!(cell.get::<u64>(), Ok(&0xFEED));
        assert_eq!(cell.type_token(), TypeToken::of::<u64>());
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut cell = InlineAny::<16>::from_value(7_i32);
        cell.reset();
        assert!(cell.is_empty());
        assert_eq!(cell.size(), 0);
        assert!(cell.type_token().is_vacant());
    }

    #[test]
    fn test_get_mut_mutates_in_place() {
        let mut cell = InlineAny::<16>::from_value(10_u32);
        *cell.get_mut::<u32>().unwrap() += 5;
        assert_eq!(cell.get::<u32>(), Ok(&15));
    }

    #[test]
    fn test_clone_copies_value() {
        let cell = InlineAny::<16>::from_value(3.5_f64);
        let copy = cell.clone();
        assert_eq!(copy.get::<f64>(), Ok(&3.5));
        assert_eq!(cell.get::<f64>(), Ok(&3.5));
    }

    #[test]
    fn test_take_drains_cell() {
        let mut cell = InlineAny::<16>::from_value(21_u16);
        assert_eq!(cell.take::<u16>(), Ok(21));
        assert!(cell.is_empty());
    }

    #[test]
    fn test_debug_output() {
        let mut cell: InlineAny<16> = InlineAny::new();
        assert_eq!(format!("{cell:?}"), "InlineAny<16>(<empty>)");
        cell.assign(1_u32);
        assert_eq!(format!("{cell:?}"), "InlineAny<16>(u32, 4 bytes)");
    }
}
