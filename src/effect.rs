//! The capability contract (§4.12) for embedding a parser in a larger
//! ambient effect stack.
//!
//! The combinator algebra in [`crate::combinator`] and [`crate::multi`] is
//! written directly against [`crate::result::PResult`] and never needs this
//! module — it is the seam a *host* reaches for when it wants to add a
//! reader, state, or exception layer around parsing without rewriting any
//! combinator. Two capabilities are the whole contract: [`Effect::lift`]
//! embeds a bare `cursor -> result` function as the identity action, and
//! [`Effect::map_effect`] transforms a result while preserving whatever
//! extra structure the effect itself carries.
//!
//! [`Identity`] is the trivial instance (no extra structure at all).
//! [`crate::trace::Traced`] is the second, non-trivial instance: it carries
//! a name and emits a trace line around every invocation, demonstrating that
//! `map_effect` can do real work instead of just unwrapping and rewrapping.

use std::rc::Rc;

use crate::cursor::Cursor;
use crate::parser::Parser;
use crate::result::PResult;

/// A type that can host a parser as one layer of a larger effect stack.
///
/// `Mapped<O2>` is the same kind of effect, re-targeted at a different
/// success type — this is what lets [`Effect::map_effect`] return `Self`
/// shaped around `O2` instead of a different, unrelated type.
pub trait Effect<'i, O, M = ()>: Sized {
    /// The same effect, re-targeted at success type `O2`.
    type Mapped<O2>: Effect<'i, O2, M>
    where
        O2: 'i;

    /// Embeds a pure parsing function as this effect's identity action.
    fn lift<F>(f: F) -> Self
    where
        F: Fn(Cursor<'i>) -> PResult<'i, O, M> + 'i;

    /// Runs the effect, producing the four-case result it wraps.
    fn run(&self, cursor: Cursor<'i>) -> PResult<'i, O, M>;

    /// Transforms the wrapped result, keeping the effect's own shape intact.
    fn map_effect<O2>(
        self,
        f: impl Fn(PResult<'i, O, M>) -> PResult<'i, O2, M> + 'i,
    ) -> Self::Mapped<O2>
    where
        O: 'i,
        O2: 'i;
}

/// The identity effect: a parser with no extra structure beyond the bare
/// `cursor -> result` function it wraps.
#[derive(Clone)]
pub struct Identity<'i, O, M = ()> {
    run: Rc<dyn Fn(Cursor<'i>) -> PResult<'i, O, M> + 'i>,
}

impl<'i, O, M> Identity<'i, O, M> {
    /// Wraps an existing parser as an [`Identity`] effect.
    pub fn new(p: impl Parser<'i, O, M> + 'i) -> Self
    where
        O: 'i,
        M: 'i,
    {
        Identity {
            run: Rc::new(move |cursor| p.parse(cursor)),
        }
    }
}

impl<'i, O, M> Effect<'i, O, M> for Identity<'i, O, M> {
    type Mapped<O2> = Identity<'i, O2, M>;

    fn lift<F>(f: F) -> Self
    where
        F: Fn(Cursor<'i>) -> PResult<'i, O, M> + 'i,
    {
        Identity { run: Rc::new(f) }
    }

    fn run(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        (self.run)(cursor)
    }

    fn map_effect<O2>(
        self,
        f: impl Fn(PResult<'i, O, M>) -> PResult<'i, O2, M> + 'i,
    ) -> Identity<'i, O2, M>
    where
        O: 'i,
        O2: 'i,
    {
        Identity {
            run: Rc::new(move |cursor| f(self.run(cursor))),
        }
    }
}

impl<'i, O, M> Parser<'i, O, M> for Identity<'i, O, M> {
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        self.run(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::ch;

    #[test]
    fn identity_runs_the_lifted_function() {
        let eff: Identity<'_, char, ()> = Identity::lift(|c| ch('a').parse(c));
        let r = eff.run(Cursor::new("a"));
        assert!(r.is_ok());
    }

    #[test]
    fn map_effect_transforms_the_result() {
        let eff = Identity::new(ch::<()>('a'));
        let mapped = eff.map_effect(|r| r.map(|c| c.to_ascii_uppercase()));
        let r = mapped.run(Cursor::new("a"));
        match r {
            PResult::Ok { value, .. } => assert_eq!(value, 'A'),
            _ => panic!("expected ok"),
        }
    }
}
