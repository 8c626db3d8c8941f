//! Module containing the inline/heap storage cell

mod raw;
mod vtable;

pub use self::raw::{DEFAULT_INLINE_WORDS, RawStorage};
