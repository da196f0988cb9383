//! Primitive parsers: the leaves every other combinator is built from.

use crate::combinator::{bind, label};
use crate::cursor::Cursor;
use crate::error::{render_char, Expected, Message};
use crate::parser::Parser;
use crate::result::PResult;

/// `pure a`: succeeds with `a` without touching the cursor.
pub fn pure<'i, O, M>(value: O) -> impl Parser<'i, O, M>
where
    O: Clone,
{
    move |cursor: Cursor<'i>| PResult::pure(value.clone(), cursor)
}

/// Always fails with an empty expected-set and `unexpected = "failure"`,
/// without consuming input.
pub fn failure<'i, O, M>() -> impl Parser<'i, O, M> {
    move |cursor: Cursor<'i>| PResult::err_eps(Message::unexpected(cursor, "failure"))
}

/// Succeeds with the current character if `pred` holds of it.
///
/// Fails at the end of input with `unexpected = "end of input"`; fails on a
/// character that does not satisfy `pred` with `unexpected` set to its
/// printable form, and an empty expected-set (callers label it, as [`ch`]
/// and the other character primitives do).
pub fn satisfy<'i, M, P>(pred: P) -> impl Parser<'i, char, M>
where
    P: Fn(char) -> bool + 'i,
{
    move |cursor: Cursor<'i>| match cursor.peek() {
        None => PResult::err_eps(Message::unexpected(cursor, "end of input")),
        Some(c) if pred(c) => PResult::ok_consumed(c, cursor.advance()),
        Some(c) => PResult::err_eps(Message::unexpected(cursor, render_char(Some(c)))),
    }
}

/// `ch c = satisfy (= c)`, labeled with the quoted character by default.
pub fn ch<'i, M>(target: char) -> impl Parser<'i, char, M> {
    label(satisfy(move |c| c == target), format!("{target:?}"))
}

/// Any alphabetic character.
pub fn alpha<'i, M>(cursor: Cursor<'i>) -> PResult<'i, char, M> {
    label(satisfy(|c: char| c.is_alphabetic()), "letter").parse(cursor)
}

/// Any ASCII digit.
pub fn digit<'i, M>(cursor: Cursor<'i>) -> PResult<'i, char, M> {
    label(satisfy(|c: char| c.is_ascii_digit()), "digit").parse(cursor)
}

/// Any uppercase letter.
pub fn upper<'i, M>(cursor: Cursor<'i>) -> PResult<'i, char, M> {
    label(satisfy(|c: char| c.is_uppercase()), "uppercase letter").parse(cursor)
}

/// Any lowercase letter.
pub fn lower<'i, M>(cursor: Cursor<'i>) -> PResult<'i, char, M> {
    label(satisfy(|c: char| c.is_lowercase()), "lowercase letter").parse(cursor)
}

/// Any character at all (fails only at the end of input).
pub fn any<'i, M>(cursor: Cursor<'i>) -> PResult<'i, char, M> {
    label(satisfy(|_| true), "any character").parse(cursor)
}

/// `str s`: all-or-nothing match of a literal string.
///
/// Succeeds only if every character of `s` matches in order; on any mismatch
/// or premature end of input, the cursor is left **exactly where it started**
/// — this must hold even though matching may advance several characters
/// before the mismatch is found, or `str "let" <|> str "letter"` would
/// silently misbehave (see the design notes on `str`'s all-or-nothing
/// contract).
pub fn str_<'i, M>(s: &'static str) -> impl Parser<'i, &'i str, M> {
    move |cursor: Cursor<'i>| {
        let mut probe = cursor;
        for expected_char in s.chars() {
            match probe.peek() {
                Some(actual) if actual == expected_char => probe = probe.advance(),
                actual => {
                    let message = Message::unexpected(cursor, render_char(actual))
                        .with_expected(Expected::label(format!("{s:?}")));
                    return PResult::err_eps(message);
                }
            }
        }
        PResult::ok_consumed(&cursor.input()[cursor.offset()..probe.offset()], probe)
    }
}

/// Consumes exactly `n` characters, or fails (`errConsumed`) at end of input.
///
/// `take(0)` always succeeds with an empty, epsilon match.
pub fn take<'i, M>(n: usize) -> impl Parser<'i, &'i str, M> {
    move |cursor: Cursor<'i>| {
        if n == 0 {
            return PResult::pure("", cursor);
        }
        let mut probe = cursor;
        for _ in 0..n {
            match probe.peek() {
                Some(_) => probe = probe.advance(),
                None => {
                    let message = Message::unexpected(probe, "end of input");
                    return PResult::err_consumed(message);
                }
            }
        }
        PResult::ok_consumed(&cursor.input()[cursor.offset()..probe.offset()], probe)
    }
}

/// Greedily consumes characters satisfying `pred`. Never fails; may match
/// the empty string (`okEps`).
pub fn take_while<'i, M, P>(pred: P) -> impl Parser<'i, &'i str, M>
where
    P: Fn(char) -> bool + 'i,
{
    move |cursor: Cursor<'i>| {
        let mut probe = cursor;
        while let Some(c) = probe.peek() {
            if pred(c) {
                probe = probe.advance();
            } else {
                break;
            }
        }
        if probe.offset() == cursor.offset() {
            PResult::pure("", cursor)
        } else {
            PResult::ok_consumed(&cursor.input()[cursor.offset()..probe.offset()], probe)
        }
    }
}

/// Like [`take_while`], but requires at least one matching character.
///
/// Built from [`satisfy`] followed by [`take_while`] rather than
/// duplicating the scan.
pub fn take_while1<'i, M, P>(pred: P) -> impl Parser<'i, &'i str, M>
where
    P: Fn(char) -> bool + Copy + 'i,
{
    move |cursor: Cursor<'i>| match satisfy::<M, _>(pred).parse(cursor) {
        PResult::Err { message, consumed } => PResult::Err { message, consumed },
        PResult::Ok { cursor: after, .. } => match take_while::<M, _>(pred).parse(after) {
            PResult::Ok { cursor: end, .. } => {
                PResult::ok_consumed(&cursor.input()[cursor.offset()..end.offset()], end)
            }
            PResult::Err { .. } => unreachable!("take_while never fails"),
        },
    }
}

/// Consumes characters up to (not including) the first occurrence of the
/// literal `needle`. May match the empty string; fails (`errEps`) if `needle`
/// never occurs.
pub fn take_until<'i, M>(needle: &'static str) -> impl Parser<'i, &'i str, M> {
    move |cursor: Cursor<'i>| match cursor.as_str().find(needle) {
        Some(0) => PResult::pure(&cursor.input()[cursor.offset()..cursor.offset()], cursor),
        Some(idx) => {
            let end = cursor.at_offset(cursor.offset() + idx);
            PResult::ok_consumed(&cursor.input()[cursor.offset()..end.offset()], end)
        }
        None => PResult::err_eps(not_found(cursor, needle)),
    }
}

/// Like [`take_until`], but requires at least one character before `needle`.
pub fn take_until1<'i, M>(needle: &'static str) -> impl Parser<'i, &'i str, M> {
    move |cursor: Cursor<'i>| match cursor.as_str().find(needle) {
        Some(0) => PResult::err_eps(not_found(cursor, needle)),
        Some(idx) => {
            let end = cursor.at_offset(cursor.offset() + idx);
            PResult::ok_consumed(&cursor.input()[cursor.offset()..end.offset()], end)
        }
        None => PResult::err_eps(not_found(cursor, needle)),
    }
}

fn not_found<'i, M>(cursor: Cursor<'i>, needle: &'static str) -> Message<'i, M> {
    Message::unexpected(cursor, render_char(cursor.peek()))
        .with_expected(Expected::label(format!("text before {needle:?}")))
}

/// Succeeds (`okEps`) iff no input remains.
pub fn eoi<'i, M>(cursor: Cursor<'i>) -> PResult<'i, (), M> {
    if cursor.is_at_end() {
        PResult::pure((), cursor)
    } else {
        let message = Message::unexpected(cursor, render_char(cursor.peek()))
            .with_expected(Expected::label("end of input"));
        PResult::err_eps(message)
    }
}

/// The unconsumed suffix of the input, without consuming it.
pub fn left_over<'i, M>(cursor: Cursor<'i>) -> PResult<'i, &'i str, M> {
    PResult::pure(cursor.as_str(), cursor)
}

/// The current byte offset, without consuming input.
pub fn pos<'i, M>(cursor: Cursor<'i>) -> PResult<'i, usize, M> {
    PResult::pure(cursor.offset(), cursor)
}

/// The number of characters left to consume, without consuming input.
pub fn remaining<'i, M>(cursor: Cursor<'i>) -> PResult<'i, usize, M> {
    PResult::pure(cursor.remaining(), cursor)
}

/// The current character, without consuming it.
pub fn curr<'i, M>(cursor: Cursor<'i>) -> PResult<'i, Option<char>, M> {
    PResult::pure(cursor.peek(), cursor)
}

/// Greedily consumes Unicode whitespace. Never fails.
pub fn whitespace<'i, M>(cursor: Cursor<'i>) -> PResult<'i, &'i str, M> {
    take_while(char::is_whitespace).parse(cursor)
}

/// Runs `p`, then discards any trailing whitespace.
///
/// A thin combinator over [`bind`], grounded in the usual "token = value +
/// trailing trivia" idiom; not part of the protected combinator algebra, but
/// a convenience most grammars built on this core will want immediately.
pub fn lexeme<'i, M, O, P>(p: P) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
    O: Clone + 'i,
{
    bind(p, move |value: O| bind(whitespace, move |_| pure(value.clone())))
}

/// Parses a run of decimal digits as an `i64`.
///
/// Built entirely from [`take_while1`]; the combinator core never hard-codes
/// a grammar, so this is just an ordinary convenience layered on top of it.
pub fn num<'i, M>(cursor: Cursor<'i>) -> PResult<'i, i64, M> {
    match take_while1::<M, _>(|c: char| c.is_ascii_digit()).parse(cursor) {
        PResult::Ok {
            value,
            cursor: after,
            expected,
        } => match value.parse::<i64>() {
            Ok(n) => PResult::Ok {
                value: n,
                cursor: after,
                expected,
            },
            Err(_) => PResult::err_consumed(
                Message::unexpected(after, "number").with_expected(Expected::label("number")),
            ),
        },
        PResult::Err { message, consumed } => PResult::Err {
            message: message.with_expected(Expected::label("number")),
            consumed,
        },
    }
}

/// Runs `p`, then fails unless `pred` holds of its value.
///
/// Fails `errEps` if `p` itself was an epsilon success, `errConsumed` if `p`
/// consumed input.
pub fn ensure<'i, M, O, P, Pred>(p: P, pred: Pred) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
    Pred: Fn(&O) -> bool + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Ok {
            value,
            cursor: after,
            expected,
        } => {
            if pred(&value) {
                PResult::Ok {
                    value,
                    cursor: after,
                    expected,
                }
            } else {
                let message = Message::unexpected(after, "value");
                if expected.is_none() {
                    PResult::err_consumed(message)
                } else {
                    PResult::err_eps(message)
                }
            }
        }
        err => err,
    }
}
