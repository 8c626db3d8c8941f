//! Concrete sequences implementing the [`traversal`](crate::traversal)
//! protocol.
//!
//! | Sequence         | Tier           | Size     | End       | Borrowed |
//! |------------------|----------------|----------|-----------|----------|
//! | [`SliceView`]    | contiguous     | exact    | common    | yes      |
//! | [`SharedView`]   | contiguous     | exact    | common    | no       |
//! | [`Iota`]         | random access  | exact    | common    | yes      |
//! | [`IotaFrom`]     | random access  | none     | sentinel  | yes      |
//! | [`StreamView`]   | input          | estimate | sentinel  | no       |
//!
//! Any of them can be erased into an [`AnyView`](crate::AnyView) with the
//! capabilities listed here, or with fewer.

mod iota;
mod shared;
mod slice;
mod stream;

pub use self::{
    iota::{Iota, IotaCursor, IotaFrom, Unreachable, iota_from},
    shared::{SharedCursor, SharedView},
    slice::{SliceCursor, SliceView},
    stream::{StreamCursor, StreamEnd, StreamView},
};
