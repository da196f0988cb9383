//! Repetition and recursion: `many`, `sepBy`, folds, `fix`, and `longestMatch`.
//!
//! Every repetition combinator here is bounded by a fuel counter derived from
//! [`Cursor::remaining`], not by trusting the sub-parser to eventually fail.
//! A sub-parser that keeps succeeding on the empty string (an epsilon success
//! that advances nothing) would otherwise spin forever; fuel guarantees
//! termination within one extra iteration of the true worst case, where every
//! remaining character is consumed one at a time.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::error::{merge, Expected, Message};
use crate::parser::Parser;
use crate::result::PResult;

/// Zero or more repetitions of `p`. Never itself fails on account of `p`
/// failing without consuming input — that is simply the signal to stop.
/// Propagates `p`'s error, promoted to consumed, if `p` ever fails having
/// consumed input.
pub fn many<'i, M, O, P>(p: P) -> impl Parser<'i, Vec<O>, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| {
        let mut results = Vec::new();
        let mut cur = cursor;
        let mut fuel = cursor.remaining() + 1;
        loop {
            if fuel == 0 {
                break;
            }
            fuel -= 1;
            match p.parse(cur) {
                PResult::Ok { value, cursor: next, .. } => {
                    results.push(value);
                    cur = next;
                }
                PResult::Err { consumed: false, .. } => break,
                PResult::Err { message, consumed: true } => return PResult::err_consumed(message),
            }
        }
        if cur.offset() != cursor.offset() {
            PResult::ok_consumed(results, cur)
        } else {
            PResult::pure(results, cur)
        }
    }
}

/// One or more repetitions of `p`. Fails exactly when the first `p` fails.
pub fn many1<'i, M, O, P>(p: P) -> impl Parser<'i, Vec<O>, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Err { message, consumed } => PResult::Err { message, consumed },
        PResult::Ok {
            value: first,
            cursor: c1,
            expected: first_expected,
        } => {
            let mut results = vec![first];
            let mut cur = c1;
            let mut fuel = cursor.remaining() + 1;
            loop {
                if fuel == 0 {
                    break;
                }
                fuel -= 1;
                match p.parse(cur) {
                    PResult::Ok { value, cursor: next, .. } => {
                        results.push(value);
                        cur = next;
                    }
                    PResult::Err { consumed: false, .. } => break,
                    PResult::Err { message, consumed: true } => {
                        return PResult::err_consumed(message)
                    }
                }
            }
            if cur.offset() != cursor.offset() {
                PResult::ok_consumed(results, cur)
            } else {
                let ex1 = first_expected.unwrap_or_else(Expected::empty);
                PResult::ok_eps(results, cur, ex1)
            }
        }
    }
}

/// One or more `p`'s separated by `sep`; the separator itself is discarded.
///
/// Once a separator has matched, the following `p` is mandatory — failing to
/// find one is a consumed error (there is no backtracking past a matched
/// separator), unless the separator itself matched as a pure epsilon step,
/// in which case a failing `p` simply ends the repetition.
pub fn sep_by1<'i, M, O, S, P, Sep>(p: P, sep: Sep) -> impl Parser<'i, Vec<O>, M>
where
    P: Parser<'i, O, M> + 'i,
    Sep: Parser<'i, S, M> + 'i,
{
    move |cursor: Cursor<'i>| match p.parse(cursor) {
        PResult::Err { message, consumed } => PResult::Err { message, consumed },
        PResult::Ok {
            value: first,
            cursor: c1,
            ..
        } => {
            let mut results = vec![first];
            let mut cur = c1;
            let mut fuel = cursor.remaining() + 1;
            loop {
                if fuel == 0 {
                    break;
                }
                fuel -= 1;
                match sep.parse(cur) {
                    PResult::Err { consumed: false, .. } => break,
                    PResult::Err { message, consumed: true } => {
                        return PResult::err_consumed(message)
                    }
                    PResult::Ok {
                        cursor: after_sep,
                        expected: sep_expected,
                        ..
                    } => {
                        let sep_consumed = sep_expected.is_none();
                        match p.parse(after_sep) {
                            PResult::Ok { value, cursor: next, .. } => {
                                results.push(value);
                                cur = next;
                            }
                            PResult::Err { consumed: true, message } => {
                                return PResult::err_consumed(message)
                            }
                            PResult::Err { consumed: false, message } => {
                                if sep_consumed {
                                    return PResult::err_consumed(message);
                                }
                                break;
                            }
                        }
                    }
                }
            }
            if cur.offset() != cursor.offset() {
                PResult::ok_consumed(results, cur)
            } else {
                PResult::pure(results, cur)
            }
        }
    }
}

/// Zero or more `p`'s separated by `sep`; an empty match succeeds with `[]`.
pub fn sep_by<'i, M, O, S, P, Sep>(p: P, sep: Sep) -> impl Parser<'i, Vec<O>, M>
where
    P: Parser<'i, O, M> + 'i,
    Sep: Parser<'i, S, M> + 'i,
{
    move |cursor: Cursor<'i>| match sep_by1(&p, &sep).parse(cursor) {
        ok @ PResult::Ok { .. } => ok,
        PResult::Err { consumed: false, .. } => PResult::pure(Vec::new(), cursor),
        err @ PResult::Err { consumed: true, .. } => err,
    }
}

/// Folds the results of zero or more `p`'s left-to-right, without
/// materializing an intermediate `Vec`.
///
/// `init` must be cheap to clone: the returned parser can be run more than
/// once (e.g. from inside another repetition), and each run needs its own
/// fresh accumulator seed.
pub fn foldl<'i, M, O, Acc, P>(
    p: P,
    init: Acc,
    f: impl Fn(Acc, O) -> Acc + 'i,
) -> impl Parser<'i, Acc, M>
where
    P: Parser<'i, O, M> + 'i,
    Acc: Clone + 'i,
{
    crate::combinator::map(many(p), move |values: Vec<O>| {
        values.into_iter().fold(init.clone(), &f)
    })
}

/// Folds the results of zero or more `p`'s right-to-left.
///
/// Built on [`many`] plus a reverse fold rather than a fused right-to-left
/// scan — the whole match has to be known before the rightmost element can
/// be identified anyway.
pub fn foldr<'i, M, O, Acc, P>(
    p: P,
    init: Acc,
    f: impl Fn(O, Acc) -> Acc + 'i,
) -> impl Parser<'i, Acc, M>
where
    P: Parser<'i, O, M> + 'i,
    Acc: Clone + 'i,
{
    crate::combinator::map(many(p), move |values: Vec<O>| {
        values.into_iter().rev().fold(init.clone(), |acc, v| f(v, acc))
    })
}

/// Ties the recursive knot for a self-referential grammar.
///
/// Rust closures cannot name themselves, so `build` is handed a stand-in
/// parser (backed by an `Rc<RefCell<Option<_>>>`, the usual indirection for
/// building a cyclic structure one field at a time) that forwards to the
/// real parser once `build` has returned it. Panics if the stand-in is
/// invoked during `build` itself — a grammar must consume at least one
/// token before recursing, or it isn't well-founded.
pub fn fix<'i, O, M>(
    build: impl FnOnce(Rc<dyn Parser<'i, O, M> + 'i>) -> Rc<dyn Parser<'i, O, M> + 'i>,
) -> impl Parser<'i, O, M>
where
    O: 'i,
    M: 'i,
{
    let cell: Rc<RefCell<Option<Rc<dyn Parser<'i, O, M> + 'i>>>> = Rc::new(RefCell::new(None));
    let handle = Fix { inner: cell.clone() };
    let built = build(Rc::new(handle));
    *cell.borrow_mut() = Some(built);
    Fix { inner: cell }
}

struct Fix<'i, O, M> {
    inner: Rc<RefCell<Option<Rc<dyn Parser<'i, O, M> + 'i>>>>,
}

impl<'i, O, M> Parser<'i, O, M> for Fix<'i, O, M> {
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        let parser = self
            .inner
            .borrow()
            .clone()
            .expect("fix: recursive parser invoked before construction finished");
        parser.parse(cursor)
    }
}

/// Runs every alternative in `parsers` against the same starting cursor and
/// returns the values of those that advanced furthest (listed in the order
/// `parsers` gave them), advancing the cursor to that furthest offset.
///
/// Because a [`Cursor`] is an immutable value, every alternative already runs
/// in isolation from the others — there's no need for the `lookahead ∘ try`
/// dance a stateful host would require to undo a failed attempt's side
/// effects before trying the next one.
///
/// If every alternative fails, the reported error is the one whose cursor
/// reached furthest; errors tied at the same furthest cursor are merged
/// (their expected-sets unioned). The merged result is reported as consumed
/// iff that furthest cursor is strictly past the starting cursor — whether
/// any *individual* tied alternative itself consumed is irrelevant, since an
/// error sitting at the starting offset is still a recoverable epsilon
/// failure regardless of which branch produced it.
pub fn longest_match<'i, M, O, P>(parsers: Vec<P>) -> impl Parser<'i, Vec<O>, M>
where
    P: Parser<'i, O, M> + 'i,
{
    move |cursor: Cursor<'i>| {
        let mut oks: Vec<(O, Cursor<'i>, Option<Expected>)> = Vec::new();
        let mut best_err: Option<Message<'i, M>> = None;

        for p in parsers.iter() {
            match p.parse(cursor) {
                PResult::Ok { value, cursor: c, expected } => oks.push((value, c, expected)),
                PResult::Err { message, .. } => {
                    best_err = Some(match best_err {
                        None => message,
                        Some(bm) => match message.cursor().offset().cmp(&bm.cursor().offset()) {
                            Ordering::Greater => message,
                            Ordering::Equal => merge(bm, message),
                            Ordering::Less => bm,
                        },
                    });
                }
            }
        }

        if oks.is_empty() {
            let message = best_err.expect("longest_match requires at least one alternative");
            if message.cursor().offset() > cursor.offset() {
                PResult::err_consumed(message)
            } else {
                PResult::err_eps(message)
            }
        } else {
            let furthest = oks.iter().map(|(_, c, _)| c.offset()).max().expect("non-empty");
            let mut values = Vec::new();
            let mut winner_cursor = cursor;
            let mut merged_expected = Expected::empty();
            for (value, c, expected) in oks {
                if c.offset() == furthest {
                    winner_cursor = c;
                    values.push(value);
                    if let Some(ex) = expected {
                        merged_expected = merged_expected.union(ex);
                    }
                }
            }
            if furthest > cursor.offset() {
                PResult::ok_consumed(values, winner_cursor)
            } else {
                PResult::ok_eps(values, winner_cursor, merged_expected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{or_else, try_};
    use crate::primitive::{ch, str_};

    #[test]
    fn many_collects_zero_or_more() {
        let p = many(ch::<()>('a'));
        let r = p.parse(Cursor::new("aaab"));
        match r {
            PResult::Ok { value, cursor, .. } => {
                assert_eq!(value, vec!['a', 'a', 'a']);
                assert_eq!(cursor.offset(), 3);
            }
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn many_on_no_matches_is_an_epsilon_success() {
        let p = many(ch::<()>('a'));
        let r = p.parse(Cursor::new("bbb"));
        match r {
            PResult::Ok { value, expected, .. } => {
                assert!(value.is_empty());
                assert!(expected.is_some());
            }
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn many1_requires_at_least_one() {
        assert!(!many1(ch::<()>('a')).parse(Cursor::new("bbb")).is_ok());
        let r = many1(ch::<()>('a')).parse(Cursor::new("aab"));
        match r {
            PResult::Ok { value, .. } => assert_eq!(value, vec!['a', 'a']),
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn sep_by1_requires_an_element_after_a_consumed_separator() {
        let p = sep_by1(ch::<()>('a'), ch::<()>(','));
        let r = p.parse(Cursor::new("a,a,"));
        assert!(!r.is_ok());
        assert!(r.is_consumed());
    }

    #[test]
    fn sep_by1_collects_elements() {
        let p = sep_by1(ch::<()>('a'), ch::<()>(','));
        let r = p.parse(Cursor::new("a,a,a;"));
        match r {
            PResult::Ok { value, cursor, .. } => {
                assert_eq!(value, vec!['a', 'a', 'a']);
                assert_eq!(cursor.offset(), 5);
            }
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn sep_by_allows_zero_elements() {
        let p = sep_by(ch::<()>('a'), ch::<()>(','));
        let r = p.parse(Cursor::new("bbb"));
        match r {
            PResult::Ok { value, .. } => assert!(value.is_empty()),
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn foldl_sums_digits_left_to_right() {
        let p = foldl(crate::primitive::digit::<()>, 0i64, |acc, c: char| {
            acc * 10 + i64::from(c.to_digit(10).unwrap())
        });
        let r = p.parse(Cursor::new("123x"));
        match r {
            PResult::Ok { value, .. } => assert_eq!(value, 123),
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn fix_parses_a_recursive_grammar() {
        use crate::combinator::bind;
        use crate::primitive::pure;

        // depth := '(' depth ')' | epsilon -- counts nesting depth.
        let depth = fix::<'_, i64, ()>(|inner| {
            let body = bind(ch::<()>('('), move |_| {
                let inner = inner.clone();
                bind(inner, move |n: i64| bind(ch::<()>(')'), move |_| pure(n + 1)))
            });
            Rc::new(or_else(body, pure(0i64)))
        });

        assert_eq!(crate::parser::parse(&depth, "(())"), Ok(2));
        assert_eq!(crate::parser::parse(&depth, ""), Ok(0));
    }

    #[test]
    fn longest_match_prefers_the_furthest_success() {
        let p = longest_match(vec![str_::<()>("let"), str_::<()>("letter")]);
        let r = p.parse(Cursor::new("letter"));
        match r {
            PResult::Ok { value, .. } => assert_eq!(value, vec!["letter"]),
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn longest_match_collects_every_alternative_tied_at_the_furthest_offset() {
        let p = longest_match(vec![ch::<()>('a'), ch::<()>('a')]);
        let r = p.parse(Cursor::new("a"));
        match r {
            PResult::Ok { value, cursor, .. } => {
                assert_eq!(value, vec!['a', 'a']);
                assert_eq!(cursor.offset(), 1);
            }
            _ => panic!("expected ok"),
        }
    }

    #[test]
    fn longest_match_merges_tied_errors() {
        let p = longest_match(vec![ch::<()>('a'), ch::<()>('b')]);
        let r = p.parse(Cursor::new("c"));
        match r {
            PResult::Err { message, .. } => {
                let labels = message.expected_set().labels();
                assert!(labels.contains(&std::borrow::Cow::Borrowed("'a'")));
                assert!(labels.contains(&std::borrow::Cow::Borrowed("'b'")));
            }
            _ => panic!("expected error"),
        }
    }

    #[test]
    fn longest_match_error_at_start_offset_stays_recoverable_even_if_one_branch_consumed() {
        use crate::primitive::{failure, take};

        // `take(1)` on empty input fails as `errConsumed`, but its message's
        // own cursor is still the starting offset (nothing was actually
        // advanced before hitting end-of-input) -- tied with `failure`'s
        // `errEps` at that same offset. The merged result must stay
        // recoverable, since the furthest offset reached is the start.
        fn boxed<'i>(p: impl Parser<'i, &'i str, ()> + 'i) -> Rc<dyn Parser<'i, &'i str, ()> + 'i> {
            Rc::new(p)
        }

        let p = longest_match(vec![boxed(take(1)), boxed(failure())]);
        let r = p.parse(Cursor::new(""));
        match r {
            PResult::Err { consumed, .. } => assert!(!consumed),
            _ => panic!("expected error"),
        }
    }

    #[test]
    fn try_demotes_consumed_errors_for_longest_match_style_isolation() {
        let p = try_(crate::combinator::bind(ch::<()>('a'), |_: char| ch::<()>('z')));
        let r = p.parse(Cursor::new("ab"));
        assert!(!r.is_ok());
        assert!(!r.is_consumed());
    }
}
