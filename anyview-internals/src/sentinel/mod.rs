//! Module containing the erased sentinel

mod raw;
mod vtable;

pub use self::raw::RawSentinel;
