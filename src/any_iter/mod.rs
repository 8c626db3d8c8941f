//! Erased cursors and end markers handed out by [`AnyView`](crate::AnyView).
//!
//! An [`AnyIter<'a, R, T, E>`](AnyIter) holds any concrete cursor whose items
//! convert into `R` and that stays valid for `'a`. The tier `T` decides which
//! operations exist on it; the end capability `E` decides whether it is
//! compared against an [`AnySentinel<'a, R, T>`](AnySentinel) or against
//! another `AnyIter`.
//!
//! | Tier              | Operations                                              |
//! |-------------------|---------------------------------------------------------|
//! | `Input`           | `get`, `advance`, `take_item`                           |
//! | `Forward`         | above, plus `Clone` and `==`                            |
//! | `Bidirectional`   | above, plus `step_back`                                 |
//! | `RandomAccess`    | above, plus `jump`, `at`, `+`, `-`, distance, ordering  |
//!
//! A single-pass cursor of a view with [`CommonEnd`](crate::markers::CommonEnd)
//! can also be cloned and compared, since finding the end means comparing
//! against a cursor.
//!
//! A default-constructed or moved-out cursor is *singular*. Singular cursors
//! compare equal to each other and to a singular sentinel, and never to a
//! cursor that refers to a sequence. Reading, advancing or measuring through
//! a singular cursor panics.

mod cursor;
mod sentinel;

pub use self::{cursor::AnyIter, sentinel::AnySentinel};
