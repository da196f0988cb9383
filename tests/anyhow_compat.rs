//! Parse errors implement `std::error::Error`, so they `?`-propagate
//! through `anyhow` without a manual conversion — the ambient error-handling
//! surface called out in the expanded spec's REDESIGN notes.

use anyhow::Context;

use parsekit::parser::{parse, Parser};
use parsekit::primitive::ch;

fn parse_a(input: &'static str) -> anyhow::Result<char> {
    parse(ch::<()>('a'), input).context("parsing a single 'a'")
}

#[test]
fn parse_error_propagates_through_anyhow() {
    assert_eq!(parse_a("a").unwrap(), 'a');

    let err = parse_a("b").unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("parsing a single 'a'"));
    assert!(rendered.contains("error at line 1, column 1"));
}

#[test]
fn parser_trait_is_reachable_from_the_prelude() {
    use parsekit::prelude::*;

    let p = ch::<()>('x');
    assert_eq!(p.parse(parsekit::cursor::Cursor::new("x")).is_ok(), true);
}
