//! Trivially-copyable fast-path variant.
//!
//! [`CopyAny`] restricts payloads to `Copy` types and drops the dispatch
//! machinery entirely: no destructor bookkeeping, no clone dispatch —
//! the whole cell is plain bytes plus the stored type's token. Where the
//! full [`InlineAny`](crate::InlineAny) routes every operation through a
//! per-type function, this variant gets by with byte copies, which makes
//! it itself `Copy` and completely panic-free.

use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};

use crate::error::{AnyError, AnyResult};
use crate::storage::MAX_ALIGN;
use crate::token::TypeToken;

/// Fixed-capacity storage for a single `Copy` value.
///
/// Same compile-time size and alignment bounds as
/// [`InlineAny`](crate::InlineAny), same query surface, no panic paths.
/// Typed access is token-checked; an unchecked read is deliberately not
/// offered.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub struct CopyAny<const N: usize> {
    /// Raw storage; only the first `size()` bytes are live.
    buf: [MaybeUninit<u8>; N],
    /// Identity of the held type; `None` means empty.
    token: Option<TypeToken>,
    /// Size in bytes of the held value; 0 when empty.
    len: usize,
    /// Kept in step with the erased variant: no `Send`/`Sync`.
    _marker: PhantomData<*mut ()>,
}

impl<const N: usize> CopyAny<N> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            buf: [MaybeUninit::uninit(); N],
            token: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a cell holding `value`.
    ///
    /// Rejected at compile time when `size_of::<T>() > N` or
    /// `align_of::<T>() > MAX_ALIGN`.
    pub fn from_value<T: Copy + 'static>(value: T) -> Self {
        let mut cell = Self::new();
        cell.set(value);
        cell
    }

    /// Replaces the contents with `value`. `Copy` payloads have no
    /// destructor, so the previous bytes are simply overwritten.
    pub fn set<T: Copy + 'static>(&mut self, value: T) {
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
        // SAFETY: the bounds above guarantee the buffer can hold an
        // aligned `T`.
        unsafe { self.buf.as_mut_ptr().cast::<T>().write(value) };
        self.token = Some(TypeToken::of::<T>());
        self.len = mem::size_of::<T>();
    }

    /// Returns whether the held value is a `T`.
    pub fn is<T: Copy + 'static>(&self) -> bool {
        self.token == Some(TypeToken::of::<T>())
    }

    /// Typed access to the held value, by copy.
    ///
    /// Fails with [`AnyError::TypeMismatch`] when the cell holds a
    /// different type or nothing at all.
    pub fn get<T: Copy + 'static>(&self) -> AnyResult<T> {
        self.downcast_ref::<T>().copied().ok_or_else(|| {
            AnyError::TypeMismatch {
                stored: self.type_token(),
                requested: TypeToken::of::<T>(),
            }
        })
    }

    /// Non-erroring probe: a reference to the held `T`, or `None` on
    /// mismatch or empty.
    pub fn downcast_ref<T: Copy + 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            // SAFETY: the token check confirmed the buffer holds a `T`.
            Some(unsafe { &*self.buf.as_ptr().cast::<T>() })
        } else {
            None
        }
    }

    /// Moves the held value out, leaving the cell empty.
    pub fn take<T: Copy + 'static>(&mut self) -> AnyResult<T> {
        let value = self.get::<T>()?;
        self.reset();
        Ok(value)
    }

    /// Clears the cell. No destructor runs; `Copy` types have none.
    pub fn reset(&mut self) {
        self.token = None;
        self.len = 0;
    }

    /// Identity of the stored type, or the vacant token when empty.
    pub fn type_token(&self) -> TypeToken {
        self.token.unwrap_or_else(TypeToken::vacant)
    }

    /// Returns whether the cell holds no value.
    pub const fn is_empty(&self) -> bool {
        self.token.is_none()
    }

    /// Size in bytes of the held value; 0 when empty.
    pub const fn size(&self) -> usize {
        self.len
    }

    /// Buffer capacity in bytes. Compile-time constant.
    pub const fn capacity() -> usize {
        N
    }
}

impl<const N: usize> Default for CopyAny<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for CopyAny<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token {
            None => write!(f, "CopyAny<{N}>(<empty>)"),
            Some(token) => write!(f, "CopyAny<{N}>({token}, {} bytes)", self.len),
        }
    }
}
