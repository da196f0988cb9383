//! The four-case result algebra every parser outcome belongs to.
//!
//! Crossing {success, failure} with {consumed input, consumed nothing} gives
//! exactly four observable cases. [`PResult`] encodes them compactly as a
//! two-variant tag (`Ok`/`Err`) plus a discriminator, rather than as a literal
//! four-variant sum: on the `Ok` side, `expected` is `Some` iff no input was
//! consumed (an epsilon success); on the `Err` side, `consumed` distinguishes
//! the two failure cases. This is the representation [`crate`]'s design notes
//! call out as "whichever rendering the target language makes cheapest" —
//! here, a tag plus payload, the same shape the combinator algebra already
//! uses for its own results.
//!
//! Every combinator in [`crate::combinator`] and [`crate::multi`] must
//! preserve this discipline: it is the central invariant of the library.

use crate::cursor::Cursor;
use crate::error::{Expected, Message};

/// The result of running a [`crate::parser::Parser`] against a [`Cursor`].
#[derive(Clone, Debug)]
pub enum PResult<'i, O, M = ()> {
    /// Success. `expected` is `Some` for an epsilon (zero-width) success,
    /// `None` for a success that consumed input.
    Ok {
        value: O,
        cursor: Cursor<'i>,
        expected: Option<Expected>,
    },
    /// Failure. `consumed` is `true` iff input was consumed before failing,
    /// which makes the error unrecoverable by plain [`crate::combinator::or_else`]
    /// (see [`crate::combinator::try_`]).
    Err { message: Message<'i, M>, consumed: bool },
}

impl<'i, O, M> PResult<'i, O, M> {
    /// Builds an `okConsumed` result.
    pub fn ok_consumed(value: O, cursor: Cursor<'i>) -> Self {
        PResult::Ok {
            value,
            cursor,
            expected: None,
        }
    }

    /// Builds an `okEps` result with the given (possibly empty) expected-set.
    ///
    /// This is `mkEps` generalized to carry a caller-supplied expected-set;
    /// [`PResult::pure`] is the specialization used by the `pure` primitive.
    pub fn ok_eps(value: O, cursor: Cursor<'i>, expected: Expected) -> Self {
        PResult::Ok {
            value,
            cursor,
            expected: Some(expected),
        }
    }

    /// `mkEps`: an epsilon success with an empty expected-set.
    pub fn pure(value: O, cursor: Cursor<'i>) -> Self {
        PResult::ok_eps(value, cursor, Expected::empty())
    }

    /// Builds an `errEps` result.
    pub fn err_eps(message: Message<'i, M>) -> Self {
        PResult::Err {
            message,
            consumed: false,
        }
    }

    /// Builds an `errConsumed` result.
    pub fn err_consumed(message: Message<'i, M>) -> Self {
        PResult::Err {
            message,
            consumed: true,
        }
    }

    /// `true` for `okConsumed` and `errConsumed`, `false` for the two epsilon
    /// cases.
    pub fn is_consumed(&self) -> bool {
        match self {
            PResult::Ok { expected, .. } => expected.is_none(),
            PResult::Err { consumed, .. } => *consumed,
        }
    }

    /// `true` for either success case.
    pub fn is_ok(&self) -> bool {
        matches!(self, PResult::Ok { .. })
    }

    /// Maps the success value, leaving cursor/expected/error untouched.
    pub fn map<P>(self, f: impl FnOnce(O) -> P) -> PResult<'i, P, M> {
        match self {
            PResult::Ok {
                value,
                cursor,
                expected,
            } => PResult::Ok {
                value: f(value),
                cursor,
                expected,
            },
            PResult::Err { message, consumed } => PResult::Err { message, consumed },
        }
    }

    /// Converts into a plain [`Result`], discarding the epsilon expected-set
    /// and the consumed flag. Used at the top-level run entry points.
    pub fn into_result(self) -> Result<(O, Cursor<'i>), Message<'i, M>> {
        match self {
            PResult::Ok { value, cursor, .. } => Ok((value, cursor)),
            PResult::Err { message, .. } => Err(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_consumed_has_no_expected_set() {
        let cursor = Cursor::new("abc").advance();
        let r: PResult<'_, char, ()> = PResult::ok_consumed('a', cursor);
        assert!(r.is_consumed());
        assert!(r.is_ok());
    }

    #[test]
    fn pure_is_an_epsilon_success() {
        let cursor = Cursor::new("abc");
        let r: PResult<'_, (), ()> = PResult::pure((), cursor);
        assert!(!r.is_consumed());
        assert!(r.is_ok());
    }

    #[test]
    fn err_consumed_is_reported_as_consumed() {
        let cursor = Cursor::new("abc");
        let msg = Message::<()>::unexpected(cursor, "'a'");
        let r: PResult<'_, (), ()> = PResult::err_consumed(msg);
        assert!(r.is_consumed());
        assert!(!r.is_ok());
    }
}
