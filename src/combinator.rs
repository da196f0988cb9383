//! Combinators that sit directly on the four-case result algebra.
//!
//! Every function here handles all four `okConsumed`/`okEps`/`errConsumed`/
//! `errEps` cases explicitly. None of them peek inside
//! [`crate::result::PResult`] beyond matching on its two variants — they are
//! the only code, besides [`crate::multi`], that is allowed to depend on the
//! precise consumed/epsilon discipline [`crate::result`] documents.

use std::borrow::Cow;

use crate::cursor::Cursor;
use crate::error::{merge, Expected, Message};
use crate::parser::Parser;
use crate::result::PResult;

/// Sequences `p` and `f`'s result: run `p`, then run `f(value)` at the
/// resulting cursor.
///
/// The consumed flag is sticky: once either side has consumed input, the
/// whole bind reports as consumed, even if the side that failed or succeeded
/// last was itself an epsilon step. Two epsilon successes in a row union
/// their expected-sets rather than keeping only the second.
pub fn bind<'i, M, A, B, P, F, Q>(p: P, f: F) -> impl Parser<'i, B, M>
where
    P: Parser<'i, A, M> + 'i,
    F: Fn(A) -> Q + 'i,
    Q: Parser<'i, B, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Ok {
            value,
            cursor: c1,
            expected: None,
        } => match f(value).parse(c1) {
            PResult::Ok { value, cursor, .. } => PResult::ok_consumed(value, cursor),
            PResult::Err { message, .. } => PResult::err_consumed(message),
        },
        PResult::Ok {
            value,
            cursor: c1,
            expected: Some(ex1),
        } => match f(value).parse(c1) {
            PResult::Ok {
                value,
                cursor,
                expected: None,
            } => PResult::ok_consumed(value, cursor),
            PResult::Ok {
                value,
                cursor,
                expected: Some(ex2),
            } => PResult::ok_eps(value, cursor, ex1.union(ex2)),
            PResult::Err {
                message,
                consumed: true,
            } => PResult::err_consumed(message),
            PResult::Err {
                message,
                consumed: false,
            } => {
                let combined = ex1.union(message.expected_set().clone());
                PResult::err_eps(message.with_expected(combined))
            }
        },
        PResult::Err { message, consumed } => PResult::Err { message, consumed },
    }
}

/// Maps the success value of `p`, leaving its consumed/epsilon shape intact.
pub fn map<'i, M, A, B, P>(p: P, f: impl Fn(A) -> B + 'i) -> impl Parser<'i, B, M>
where
    P: Parser<'i, A, M> + 'i,
{
    move |cursor: Cursor<'i>| p.parse(cursor).map(&f)
}

/// `p <|> q`: tries `q` only if `p` failed without consuming input.
///
/// If `p` consumed input before failing, that error is final — this is the
/// no-backtracking-across-consumed-input discipline; see [`try_`] to opt out
/// of it locally. If `q` also fails without consuming, the two errors are
/// merged (their expected-sets unioned) rather than one discarding the other.
pub fn or_else<'i, M, O, P, Q>(p: P, q: Q) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
    Q: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Err {
            message: msg1,
            consumed: false,
        } => match q.parse(cursor) {
            PResult::Ok {
                value,
                cursor: c2,
                expected: None,
            } => PResult::ok_consumed(value, c2),
            PResult::Ok {
                value,
                cursor: c2,
                expected: Some(ex2),
            } => PResult::ok_eps(value, c2, msg1.expected_set().clone().union(ex2)),
            PResult::Err {
                message: msg2,
                consumed: true,
            } => PResult::err_consumed(msg2),
            PResult::Err {
                message: msg2,
                consumed: false,
            } => PResult::err_eps(merge(msg1, msg2)),
        },
        other => other,
    }
}

/// Demotes an `errConsumed` result from `p` to `errEps`, making it
/// recoverable by a following [`or_else`]. Has no effect on the other three
/// cases.
///
/// This is the crate's only way to backtrack across consumed input — used
/// deliberately, never silently, since it throws away the usual guarantee
/// that a consuming parser commits to its branch.
pub fn try_<'i, M, O, P>(p: P) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Err {
            message,
            consumed: true,
        } => PResult::err_eps(message),
        other => other,
    }
}

/// Runs `p`; on success, rewinds to `cursor` and reports an epsilon success
/// regardless of how much `p` consumed. On failure, passes `p`'s result
/// through unchanged (including its consumed flag — combine with [`try_`] if
/// full backtracking on failure is also wanted).
pub fn lookahead<'i, M, O, P>(p: P) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Ok { value, .. } => PResult::pure(value, cursor),
        err => err,
    }
}

/// Succeeds (epsilon) iff `p` fails at `cursor`; fails (epsilon) iff `p`
/// succeeds. Never consumes input, whatever `p` does internally.
pub fn not_followed_by<'i, M, O, P>(p: P) -> impl Parser<'i, (), M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match lookahead(&p).parse(cursor) {
        PResult::Ok { .. } => PResult::err_eps(Message::unexpected(cursor, "unexpected match")),
        PResult::Err { .. } => PResult::pure((), cursor),
    }
}

/// Replaces `p`'s expected-set with a single label, but only on the two
/// epsilon cases (`okEps`, `errEps`); `okConsumed`/`errConsumed` pass through
/// untouched, since a label only makes sense for the alternative that was
/// never committed to.
pub fn label<'i, M, O, P>(p: P, name: impl Into<Cow<'static, str>>) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
{
    let name = name.into();
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Ok {
            value,
            cursor,
            expected: Some(_),
        } => PResult::ok_eps(value, cursor, Expected::label(name.clone())),
        PResult::Err {
            message,
            consumed: false,
        } => PResult::err_eps(message.with_expected(Expected::label(name.clone()))),
        other => other,
    }
}

/// Like [`label`], but the replacement expected-set is the union of several
/// labels rather than one — useful for a single primitive that stands for a
/// family of tokens (e.g. "one of the reserved words").
pub fn labels<'i, M, O, P, I>(p: P, names: I) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
    I: IntoIterator<Item = Cow<'static, str>> + Clone + 'i,
{
    move |cursor: Cursor<'i>| {
        let set = names
            .clone()
            .into_iter()
            .fold(Expected::empty(), |acc, n| acc.union(Expected::label(n)));
        match p.parse(cursor) {
            PResult::Ok {
                value,
                cursor,
                expected: Some(_),
            } => PResult::ok_eps(value, cursor, set.clone()),
            PResult::Err {
                message,
                consumed: false,
            } => PResult::err_eps(message.with_expected(set.clone())),
            other => other,
        }
    }
}

/// Suppresses `p`'s expected-set entirely on the two epsilon cases, so it
/// never shows up in a rendered "expected" list (used to hide internal
/// helper parsers from user-facing error messages).
pub fn hidden<'i, M, O, P>(p: P) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Ok {
            value,
            cursor,
            expected: Some(_),
        } => PResult::ok_eps(value, cursor, Expected::empty()),
        PResult::Err {
            message,
            consumed: false,
        } => PResult::err_eps(message.with_expected(Expected::empty())),
        other => other,
    }
}

/// Runs `p` and turns either outcome into a success carrying a
/// [`std::result::Result`], so a caller can inspect a failure without
/// aborting the surrounding parse.
///
/// On failure, resumes from the error's own cursor (not the cursor `p`
/// started at) — the same position a rendered message would point to — and
/// preserves `p`'s consumed/epsilon classification so a following
/// [`or_else`] still sees a backtrackable step only when `p` itself never
/// consumed.
pub fn observing<'i, M, O, P>(p: P) -> impl Parser<'i, Result<O, Message<'i, M>>, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Ok {
            value,
            cursor,
            expected,
        } => PResult::Ok {
            value: Ok(value),
            cursor,
            expected,
        },
        PResult::Err { message, consumed } => {
            let resume = message.cursor();
            PResult::Ok {
                value: Err(message),
                cursor: resume,
                expected: if consumed { None } else { Some(Expected::empty()) },
            }
        }
    }
}

/// Always fails (epsilon) at `cursor` with the given unexpected-description.
pub fn unexpected<'i, O, M>(text: impl Into<Cow<'static, str>>) -> impl Parser<'i, O, M> {
    let text = text.into();
    move |cursor: Cursor<'i>| PResult::err_eps(Message::unexpected(cursor, text.clone()))
}

/// Like [`unexpected`], but reports the error at a caller-chosen offset
/// rather than the current cursor — useful when a combinator wants to blame
/// an earlier position (e.g. the start of a construct) instead of where the
/// mismatch was actually noticed.
pub fn unexpected_at<'i, O, M>(
    offset: usize,
    text: impl Into<Cow<'static, str>>,
) -> impl Parser<'i, O, M> {
    let text = text.into();
    move |cursor: Cursor<'i>| {
        let at = cursor.at_offset(offset);
        PResult::err_eps(Message::unexpected(at, text.clone()))
    }
}

/// Always fails (epsilon) at `cursor`, attaching a custom error payload
/// instead of (or alongside) an unexpected-description.
pub fn error_<'i, O, M: Clone>(custom: M) -> impl Parser<'i, O, M> {
    move |cursor: Cursor<'i>| {
        PResult::err_eps(Message::unexpected(cursor, "").with_custom(custom.clone()))
    }
}
