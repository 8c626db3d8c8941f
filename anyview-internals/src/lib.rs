#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`anyview`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structures and unsafe
//! operations that power the [`anyview`] library. It provides the foundation
//! for type erasure through plain function-pointer vtables over a storage
//! cell that keeps small values inline.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`anyview`] crate, not this one.
//!
//! # Architecture
//!
//! The crate is organized in layers, leaves first:
//!
//! - **[`storage`]**: The storage cell
//!   - [`RawStorage`]: Holds at most one value of any type, inline when it
//!     fits in [`DEFAULT_INLINE_WORDS`] machine words, boxed otherwise
//!   - [`StorageVtable`]: Drop and clone operations for the held type
//!
//! - **[`cursor`]** and **[`sentinel`]**: Erased traversal positions
//!   - [`RawCursor`]: A cursor yielding items of type `R`, or singular
//!   - [`RawSentinel`]: An end marker for a [`RawCursor`], or singular
//!
//! - **[`view`]**: Erased sequences
//!   - [`RawView`]: Produces erased bounds and measures its sequence
//!
//! - **[`handlers`]**: Trait definitions through which the safe crate decides
//!   which operations each erased value supports
//!
//! # Safety Strategy
//!
//! Every erased value pairs a `&'static` vtable with a [`RawStorage`]. The
//! vtable is generated once per concrete type, so its function pointers may
//! down-cast the storage without checking. This crate maintains that pairing
//! through:
//!
//! - **Module-based encapsulation**: The vtable and storage fields are private
//!   to a single module per type, making the pairing locally verifiable
//! - **Ordered bookkeeping**: A storage cell records its vtable only after the
//!   value is in place, and forgets it before the value is dropped, so a
//!   panicking [`Clone`] never leaves a half-initialized cell behind
//! - **Checked identity across values**: Operations involving two erased
//!   values (equality, distance, sentinel checks) compare
//!   [`TypeId`](core::any::TypeId)s before down-casting the second value
//!
//! Erased values may borrow. [`RawStorage<'a>`](RawStorage) only accepts
//! values that outlive `'a`, and the vtables are free of type and lifetime
//! parameters: items, cursors and slices come back through out-pointers and
//! are read at the caller's lifetime. Type identity is therefore taken with
//! all lifetimes erased, and two values compared with each other are trusted
//! to be valid for the same `'a`. The checked down-casts that hand out a
//! reference of a caller-chosen type are only available on `'static` cells.
//!
//! [`anyview`]: https://docs.rs/anyview/latest/anyview/
//! [`StorageVtable`]: storage::vtable::StorageVtable

extern crate alloc;

mod cursor;
pub mod handlers;
mod sentinel;
mod storage;
mod util;
mod view;

pub use cursor::RawCursor;
pub use sentinel::RawSentinel;
pub use storage::{DEFAULT_INLINE_WORDS, RawStorage};
pub use view::RawView;
