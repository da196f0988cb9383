//! `parsekit` is a Parsec-style parser combinator library over UTF-8 text.
//!
//! Parsers are built by algebraic combination of smaller parsers: every
//! combinator preserves a four-case result discipline (success/failure
//! crossed with consumed/epsilon, see [`result`]) that lets `<|>` know
//! precisely when it is safe to try an alternative, and lets error messages
//! accumulate an "expected" label set instead of reporting only the last
//! thing that went wrong.
//!
//! ## Example
//!
//! ```rust
//! use parsekit::combinator::or_else;
//! use parsekit::primitive::ch;
//! use parsekit::parser::parse;
//!
//! let vowel = or_else(ch::<()>('a'), or_else(ch('e'), ch('i')));
//! assert_eq!(parse(vowel, "echo"), Ok('e'));
//! ```
//!
//! There is no backtracking across consumed input by default — `p <|> q`
//! only tries `q` when `p` failed without consuming anything. Wrap `p` in
//! [`combinator::try_`] to opt into backtracking past a partial match:
//!
//! ```rust
//! use parsekit::combinator::{bind, or_else, try_};
//! use parsekit::primitive::ch;
//! use parsekit::parser::parse;
//!
//! let ab = bind(ch::<()>('a'), |_| ch('b'));
//! let ac = bind(ch('a'), |_| ch('c'));
//! assert_eq!(parse(or_else(try_(ab), ac), "ac"), Ok('c'));
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod combinator;
pub mod cursor;
pub mod effect;
pub mod error;
pub mod multi;
pub mod parser;
pub mod primitive;
pub mod result;
pub mod trace;

/// Re-exports of the names most grammars built on this core reach for.
pub mod prelude {
    pub use crate::combinator::{
        hidden, label, labels, lookahead, not_followed_by, observing, or_else, try_,
    };
    pub use crate::cursor::Cursor;
    pub use crate::error::Message;
    pub use crate::multi::{fix, foldl, foldr, longest_match, many, many1, sep_by, sep_by1};
    pub use crate::parser::{parse, parse_with_eoi, parse_with_left_over, Parser};
    pub use crate::primitive::{
        alpha, any, ch, digit, eoi, lower, num, satisfy, str_, take, take_until, take_until1,
        take_while, take_while1, upper,
    };
    pub use crate::result::PResult;
}
