#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Type-erased sequence views that keep exactly the capabilities you ask for.
//!
//! ## Overview
//!
//! An [`AnyView`] can hold any sequence behind a single concrete type: a
//! borrowed slice, a counting range, a stream read from an iterator, or
//! another view. Unlike a `Box<dyn Iterator>`, the erased view keeps the
//! traversal capabilities of the sequence it holds: a random-access sequence
//! stays random-access, a sized one can still report its length, and a
//! cloneable one can still be cloned. Which capabilities are kept is part of
//! the view's type, so asking for one the sequence lacks is a compile error
//! rather than a runtime surprise.
//!
//! Small sequences and cursors are stored inline, without allocating.
//!
//! ## Quick Example
//!
//! ```
//! use anyview::prelude::*;
//! use anyview::sequences::{Iota, SharedView};
//!
//! type Numbers = AnyView<'static, i64, Caps<RandomAccess, ExactSize>>;
//!
//! let views: Vec<Numbers> = vec![
//!     AnyView::new(Iota::new(0, 4)),
//!     AnyView::new(SharedView::from(vec![7, 8, 9])),
//! ];
//!
//! assert_eq!(views[0].len(), 4);
//! assert_eq!(views[1].begin().at(2), 9);
//! assert_eq!(views[1].iter().sum::<i64>(), 24);
//! ```
//!
//! ## Core Concepts
//!
//! Sequences follow the cursor protocol of the [`traversal`] module: a
//! sequence hands out a cursor to its first item and an end marker, and a
//! cursor is advanced until the end marker reports that it has been reached.
//! Cursors are graded by what they can do, from single-pass input cursors up
//! to random-access cursors.
//!
//! An [`AnyView<'a, R, K>`](AnyView) is parameterized over:
//! - The lifetime `'a` of the data the sequence borrows. Views over owned or
//!   computed items are `AnyView<'static, ..>`, while a view of a local
//!   vector lives no longer than the vector.
//! - The item type `R`. Items of the concrete sequence are converted into `R`
//!   with [`Into`] as they are read.
//! - The capabilities `K`, a [`Caps`](markers::Caps) bundle with one marker
//!   per dimension: traversal tier, size, end, ownership and borrowing. See
//!   the [`markers`] module for the full table.
//!
//! ```
//! use anyview::{AnyView, markers::*, sequences::Iota};
//!
//! // A cloneable, random-access view that knows its length and ends with
//! // a cursor rather than a separate end marker.
//! type Indices = AnyView<'static, i64, Caps<RandomAccess, ExactSize, CommonEnd, Copyable>>;
//!
//! let indices: Indices = AnyView::new(Iota::new(0, 10));
//! assert_eq!(indices.end() - indices.begin(), 10);
//! ```
//!
//! The cursors handed out by a view are [`AnyIter`]s, whose operations are
//! likewise gated by the tier. Views without a [`CommonEnd`](markers::CommonEnd)
//! end their traversal with an [`AnySentinel`].
//!
//! Erased views are themselves sequences, so they can be erased again with
//! fewer capabilities, or joined with [`concat()`].
//!
//! ## Misuse
//!
//! Reading through a cursor that does not refer to any sequence, or measuring
//! the distance between cursors of different concrete sequences, is a
//! programming error and panics. The `try_` variants on [`AnyIter`] report
//! these conditions as a [`TraversalError`] instead.
//!
//! ## Feature Flags
//!
//! - `tracing`: emits a `trace` event through the [`tracing`] crate whenever
//!   a sequence is erased, naming its type and whether it was stored inline.
//!
//! [`tracing`]: https://docs.rs/tracing

extern crate alloc;

pub mod any_iter;
mod any_view;
pub mod concat;
mod error;
pub mod handlers;
pub mod markers;
pub mod prelude;
pub mod sequences;
pub mod traversal;

pub use self::{
    any_iter::{AnyIter, AnySentinel},
    any_view::AnyView,
    concat::{Concat, concat},
    error::TraversalError,
};
