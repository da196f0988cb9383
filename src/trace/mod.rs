//! Parser execution tracing.
//!
//! Feature-gated behind `debug`. [`trace`] wraps a parser so that every
//! invocation logs, at increasing indentation depth, the combinator's name
//! and a truncated view of the remaining input on entry, and whether the
//! call was a hit, a miss, or a consumed failure on return — colorized when
//! the output is a real terminal. With the feature disabled, [`trace`]
//! compiles down to the identity wrapper at zero cost.

#[cfg(feature = "debug")]
mod internals;

use std::borrow::Cow;

use crate::cursor::Cursor;
use crate::parser::Parser;
use crate::result::PResult;

/// Wraps `p` so that every call is logged when the `debug` feature is
/// enabled; a zero-cost identity wrapper otherwise.
#[cfg_attr(not(feature = "debug"), allow(unused_variables))]
pub fn trace<'i, O, M, P>(name: impl Into<Cow<'static, str>>, p: P) -> impl Parser<'i, O, M>
where
    P: Parser<'i, O, M> + 'i,
{
    #[cfg(feature = "debug")]
    {
        let name = name.into();
        move |cursor: Cursor<'i>| {
            let depth = internals::Depth::new();
            internals::start(*depth, &name, cursor);
            let result = p.parse(cursor);
            internals::end(*depth, &name, cursor, &result);
            result
        }
    }
    #[cfg(not(feature = "debug"))]
    {
        move |cursor: Cursor<'i>| p.parse(cursor)
    }
}

/// The second, non-trivial [`crate::effect::Effect`] instance: a parser
/// that carries a name and traces every invocation through it, rather than
/// wrapping a bare function with no structure of its own.
pub struct Traced<'i, O, M = ()> {
    name: Cow<'static, str>,
    run: std::rc::Rc<dyn Fn(Cursor<'i>) -> PResult<'i, O, M> + 'i>,
}

impl<'i, O, M> Traced<'i, O, M> {
    /// Wraps `p` as a named, traced effect.
    pub fn new(name: impl Into<Cow<'static, str>>, p: impl Parser<'i, O, M> + 'i) -> Self
    where
        O: 'i,
        M: 'i,
    {
        let name = name.into();
        Traced {
            run: std::rc::Rc::new(move |cursor| trace(name.clone(), &p).parse(cursor)),
            name,
        }
    }
}

impl<'i, O, M> crate::effect::Effect<'i, O, M> for Traced<'i, O, M> {
    type Mapped<O2> = Traced<'i, O2, M>;

    fn lift<F>(f: F) -> Self
    where
        F: Fn(Cursor<'i>) -> PResult<'i, O, M> + 'i,
    {
        Traced {
            name: Cow::Borrowed("lifted"),
            run: std::rc::Rc::new(f),
        }
    }

    fn run(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        (self.run)(cursor)
    }

    fn map_effect<O2>(
        self,
        f: impl Fn(PResult<'i, O, M>) -> PResult<'i, O2, M> + 'i,
    ) -> Traced<'i, O2, M>
    where
        O: 'i,
        O2: 'i,
    {
        let name = self.name.clone();
        Traced {
            name,
            run: std::rc::Rc::new(move |cursor| f(self.run(cursor))),
        }
    }
}

impl<'i, O, M> Parser<'i, O, M> for Traced<'i, O, M> {
    fn parse(&self, cursor: Cursor<'i>) -> PResult<'i, O, M> {
        self.run(cursor)
    }
}
