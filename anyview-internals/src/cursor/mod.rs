//! Module containing the erased cursor

mod raw;
mod vtable;

pub use self::raw::RawCursor;
