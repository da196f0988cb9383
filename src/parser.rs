//! The [`Parser`] trait and the top-level run entry points.

use crate::cursor::Cursor;
use crate::error::Message;
use crate::primitive::eoi;
use crate::result::PResult;

/// A parser over element type `O`, with an optional custom error payload `M`.
///
/// Conceptually a parser is a function `Cursor -> PResult<O, M>`: it is a
/// value, cheaply composable, and shares no mutable state with any other
/// parser. Its lifetime is tied to the input string a [`Cursor`] borrows
/// from, not to any state of its own — running the same parser twice against
/// two different cursors cannot observe one run from the other.
///
/// Closures and plain functions of the right shape are parsers for free via
/// the blanket impl below; most combinators in [`crate::combinator`] and
/// [`crate::multi`] are ordinary functions that take and return `impl Parser`.
pub trait Parser<'i, O, M = ()> {
    /// Runs this parser against `cursor`, producing one of the four result
    /// cases described in [`crate::result`].
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M>;
}

impl<'i, O, M, F> Parser<'i, O, M> for F
where
    F: Fn(Cursor<'i>) -> PResult<'i, O, M>,
{
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        self(cursor)
    }
}

impl<'i, O, M, P> Parser<'i, O, M> for &P
where
    P: Parser<'i, O, M> + ?Sized,
{
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        (**self).parse(cursor)
    }
}

impl<'i, O, M, P> Parser<'i, O, M> for std::rc::Rc<P>
where
    P: Parser<'i, O, M> + ?Sized,
{
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        (**self).parse(cursor)
    }
}

/// Runs `p` against the whole of `input`, returning the parsed value or a
/// rendered error message. Leftover input is silently ignored; see
/// [`parse_with_eoi`] to require the whole input be consumed, or
/// [`parse_with_left_over`] to get the leftover back.
pub fn parse<'i, O, M>(
    p: impl Parser<'i, O, M>,
    input: &'i str,
) -> Result<O, Message<'i, M>> {
    p.parse(Cursor::new(input)).into_result().map(|(v, _)| v)
}

/// Like [`parse`], but fails unless `p` consumes the entire input.
///
/// Equivalent to running `p` followed by [`crate::primitive::eoi`] and
/// keeping only `p`'s value.
pub fn parse_with_eoi<'i, O>(
    p: impl Parser<'i, O, ()>,
    input: &'i str,
) -> Result<O, Message<'i, ()>> {
    let cursor = Cursor::new(input);
    match p.parse(cursor) {
        PResult::Ok { value, cursor, .. } => match eoi(cursor) {
            PResult::Ok { .. } => Ok(value),
            PResult::Err { message, .. } => Err(message),
        },
        PResult::Err { message, .. } => Err(message),
    }
}

/// Like [`parse`], but also returns the cursor left over after `p` ran.
pub fn parse_with_left_over<'i, O, M>(
    p: impl Parser<'i, O, M>,
    input: &'i str,
) -> Result<(O, Cursor<'i>), Message<'i, M>> {
    p.parse(Cursor::new(input)).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::ch;

    #[test]
    fn parse_ignores_left_over_input() {
        assert_eq!(parse(ch::<()>('a'), "abc"), Ok('a'));
    }

    #[test]
    fn parse_with_eoi_rejects_left_over_input() {
        assert!(parse_with_eoi(ch::<()>('a'), "abc").is_err());
        assert_eq!(parse_with_eoi(ch::<()>('a'), "a"), Ok('a'));
    }

    #[test]
    fn parse_with_left_over_returns_the_remaining_cursor() {
        let (value, cursor) = parse_with_left_over(ch::<()>('a'), "abc").unwrap();
        assert_eq!(value, 'a');
        assert_eq!(cursor.offset(), 1);
    }
}
