//! Commonly used items for convenient importing.
//!
//! The prelude re-exports the erased view and cursor types, every capability
//! marker and the traversal traits, so that a single `use` statement is
//! enough to declare, fill and traverse views.
//!
//! # Usage
//!
//! ```rust
//! use anyview::prelude::*;
//!
//! fn total(view: &AnyView<'_, i64, Caps<Forward, ExactSize>>) -> i64 {
//!     view.iter().sum()
//! }
//!
//! let view = AnyView::new(anyview::sequences::Iota::new(1, 5));
//! assert_eq!(total(&view), 10);
//! ```
//!
//! # What's Included
//!
//! - **[`AnyView`]**, **[`AnyIter`]** and **[`AnySentinel`]**: the erased types
//! - **[`Caps`]** and the capability markers
//! - **[`InputCursor`]**, **[`Sequence`]** and the other traversal traits
//! - **[`TraversalError`]**: errors of the checked cursor operations
//! - **[`concat()`]**: joining two sequences

pub use crate::{
    AnyIter, AnySentinel, AnyView, TraversalError, concat,
    markers::{
        ApproxSize, Bidirectional, Borrowed, Caps, CommonEnd, Contiguous, Copyable, ExactSize,
        Forward, Input, MoveOnly, NoSize, Owned, RandomAccess, SentinelEnd,
    },
    traversal::{
        ApproximatelySized, BidirectionalCursor, BorrowedSequence, CommonSequence,
        ContiguousSequence, ForwardCursor, InputCursor, RandomAccessCursor, Sentinel, Sequence,
        SizedSequence,
    },
};
