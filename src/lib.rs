//! # Inline Any — Fixed-Capacity Type-Erased Value Storage
//!
//! A bounded-capacity "any" box for real-time applications: a fixed-size
//! byte region that holds a value of any type whose size fits a
//! compile-time capacity bound, without ever touching the heap. The cell
//! remembers a single per-type dispatch function — a hand-built stand-in
//! for a vtable — and routes every copy, move, destroy, and type query
//! through it, so no stored type has to participate in any trait-object
//! hierarchy.
//!
//! ## Features
//!
//! - **Zero Allocation**: values live inline in the cell's own buffer;
//!   the cell never grows, never reallocates, never touches the heap
//! - **Compile-Time Bounds**: oversized or over-aligned payloads are
//!   rejected when the code is built, never at runtime
//! - **Single-Pointer Dispatch**: one function pointer per cell replaces
//!   a vtable; one dispatch entry exists per erased type program-wide
//! - **Rollback on Panic**: clone-assignment stages the previous value
//!   aside and restores it if the source's `Clone` panics — the cell is
//!   never left empty or partially written by a failed assignment
//! - **Cross-Capacity Interop**: a cell can be built or assigned from a
//!   cell of smaller capacity, checked at compile time
//! - **Two-Tier Type Identity**: dispatch-pointer comparison on the fast
//!   path, `TypeId` tokens as the authority when entries are duplicated
//!   across codegen units
//!
//! ## Usage Patterns
//!
//! ### Store and Retrieve
//!
//! ```rust
//! use inline_any::InlineAny;
//!
//! let mut cell: InlineAny<16> = InlineAny::new();
//! cell.assign(42_u32);
//!
//! assert!(cell.is::<u32>());
//! assert_eq!(cell.get::<u32>(), Ok(&42));
//!
//! cell.reset();
//! assert!(cell.is_empty());
//! ```
//!
//! ### Cross-Capacity Composition
//!
//! ```rust
//! use inline_any::InlineAny;
//!
//! let small = InlineAny::<8>::from_value(7_i32);
//! let big = InlineAny::<64>::cloned_from(&small);
//! assert_eq!(big.get::<i32>(), Ok(&7));
//! ```
//!
//! ### Trivially-Copyable Payloads
//!
//! For `Copy` payloads, [`CopyAny`] skips the dispatch machinery
//! entirely — the whole cell is plain bytes and is itself `Copy`:
//!
//! ```rust
//! use inline_any::CopyAny;
//!
//! let mut cell: CopyAny<8> = CopyAny::new();
//! cell.set([1_u8, 2, 3, 4]);
//! assert_eq!(cell.get::<[u8; 4]>(), Ok([1, 2, 3, 4]));
//! ```
//!
//! ## Assignment Guarantees
//!
//! [`InlineAny::assign_cloned`] upholds the strong guarantee: the
//! previous value is relocated into a side cell before the source is
//! cloned into the buffer, and a panicking `Clone` restores it before
//! the unwind continues. After any assignment attempt the cell holds
//! either the new value or exactly the old one.
//!
//! [`InlineAny::emplace_with`] is the documented exception: it destroys
//! the old value first and a panicking factory leaves the cell empty.
//! Callers that need rollback use assignment instead.
//!
//! ## Error Handling
//!
//! Typed access returns `Result<&T, AnyError>` carrying both the stored
//! and the requested identity; the `downcast_ref`/`downcast_mut` probes
//! return `Option` instead for non-erroring inspection:
//!
//! ```rust
//! use inline_any::{AnyError, InlineAny};
//!
//! let cell = InlineAny::<16>::from_value(1_u32);
//! match cell.get::<f64>() {
//!     Ok(value) => println!("{value}"),
//!     Err(AnyError::TypeMismatch { stored, requested }) => {
//!         eprintln!("cell holds {stored}, not {requested}");
//!     }
//! }
//! ```
//!
//! ## Safety Considerations
//!
//! - **RT Safety**: no dynamic allocation on any path; every operation
//!   is synchronous and unconditionally terminating
//! - **Memory Safety**: placement construction and in-place destruction
//!   are confined to this crate's audited unsafe core
//! - **Drop Discipline**: the dispatch entry is cleared before a value
//!   is destroyed or moved out, so a value drops exactly once
//!
//! ## Thread Safety
//!
//! Cells are single-threaded value types — not internally synchronized
//! and neither `Send` nor `Sync`. Sharing a cell across threads requires
//! external mutual exclusion and an unsafe wrapper owning that proof.
//! The per-type dispatch entries are immutable and shared freely.

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod pod;
pub mod storage;
pub mod token;

mod dispatch;

pub use error::{AnyError, AnyResult};
pub use pod::CopyAny;
pub use storage::{InlineAny, MAX_ALIGN};
pub use token::{TypeToken, Vacant};

/// Initialize tracing for RT-safe logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    // Set up RT-safe logging with minimal overhead
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
