//! Recoverable errors of checked cursor operations.
//!
//! Most misuse of an erased cursor is a programming error and panics: reading
//! through a singular [`AnyIter`](crate::AnyIter), or measuring the distance
//! between cursors of different concrete sequences. The `try_` variants of
//! those operations report the same conditions as a [`TraversalError`]
//! instead.

use derive_more::{Display, Error};

/// The reason a checked cursor operation could not be performed.
///
/// # Examples
///
/// ```
/// use anyview::{AnyIter, TraversalError};
///
/// let cursor = AnyIter::<u32>::default();
/// assert_eq!(cursor.try_get(), Err(TraversalError::Singular));
/// assert_eq!(
///     TraversalError::Singular.to_string(),
///     "the cursor does not refer to any sequence"
/// );
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, Error)]
pub enum TraversalError {
    /// The cursor is singular: it was default-constructed or moved out of.
    #[display("the cursor does not refer to any sequence")]
    Singular,

    /// The cursors were produced by different concrete sequence types.
    #[display("cannot measure a cursor of `{left}` against a cursor of `{right}`")]
    Mismatched {
        /// The concrete cursor type of the left-hand operand
        left: &'static str,
        /// The concrete cursor type of the right-hand operand
        right: &'static str,
    },
}
