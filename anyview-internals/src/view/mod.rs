//! Module containing the erased view

mod raw;
mod vtable;

pub use self::raw::RawView;
