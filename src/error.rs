//! Error messages and the `expected`-set they accumulate.
//!
//! Errors are designed with one overriding need in mind: `<|>` and friends
//! build deep chains of alternatives, and every one of them may contribute a
//! label to the final "expected" report. Concatenating those labels with a
//! plain `Vec` append would make pathological grammars quadratic; instead
//! [`Expected`] is a small persistent difference list — concatenation is
//! `O(1)`, and the unique, ordered label list is materialized only when an
//! error is actually rendered.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::cursor::Cursor;

/// An accumulated, duplicate-tolerant set of parser labels.
///
/// `Expected` values are built by [`Expected::label`] and combined with
/// [`Expected::union`]; both are `O(1)`. Call [`Expected::labels`] to get the
/// deduplicated, first-seen-order list used for rendering.
///
/// Nodes are shared via [`Arc`] rather than `Rc`: the combinator algebra
/// itself never crosses a thread, but [`Message`] (and therefore `Expected`)
/// needs to stay `Send + Sync` so a parse error can propagate through
/// `anyhow`/`Box<dyn Error + Send + Sync>` in a host application without a
/// manual conversion (see `tests/anyhow_compat.rs`). The cost is an atomic
/// increment per union instead of a plain one, which is immaterial next to
/// the allocation it guards.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Expected {
    #[default]
    Empty,
    Label(Cow<'static, str>),
    Union(Arc<Expected>, Arc<Expected>),
}

impl Expected {
    /// The empty expected-set.
    pub fn empty() -> Self {
        Expected::Empty
    }

    /// A single label.
    pub fn label(label: impl Into<Cow<'static, str>>) -> Self {
        Expected::Label(label.into())
    }

    /// Combines two expected-sets, preserving the order labels were added in.
    ///
    /// `O(1)`: this only ever allocates a two-pointer node, never copies
    /// either side's existing labels.
    pub fn union(self, other: Expected) -> Expected {
        match (&self, &other) {
            (Expected::Empty, _) => other,
            (_, Expected::Empty) => self,
            _ => Expected::Union(Arc::new(self), Arc::new(other)),
        }
    }

    /// Whether this set carries no labels at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Expected::Empty)
    }

    /// Flattens the difference list into a deduplicated, first-seen-order
    /// list of labels. Only ever called when an error is being rendered.
    pub fn labels(&self) -> Vec<Cow<'static, str>> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<Cow<'static, str>>) {
        match self {
            Expected::Empty => {}
            Expected::Label(l) => {
                if !out.contains(l) {
                    out.push(l.clone());
                }
            }
            Expected::Union(a, b) => {
                a.collect_into(out);
                b.collect_into(out);
            }
        }
    }
}

/// A parse error carrying enough detail to render a human-readable report.
///
/// The type parameter `M` is the user-chosen "custom" payload (`()` by
/// default); it rides along unmodified by the combinator algebra and is only
/// ever set by user code via [`crate::combinator::error`] or similar.
#[derive(Clone, PartialEq)]
pub struct Message<'i, M = ()> {
    cursor: Cursor<'i>,
    unexpected: Cow<'static, str>,
    expected: Expected,
    custom: Option<M>,
}

impl<'i, M> Message<'i, M> {
    /// Builds a message with an unexpected description and no expected labels.
    pub fn unexpected(cursor: Cursor<'i>, unexpected: impl Into<Cow<'static, str>>) -> Self {
        Message {
            cursor,
            unexpected: unexpected.into(),
            expected: Expected::empty(),
            custom: None,
        }
    }

    /// Builds a message with no unexpected description, only expected labels.
    pub fn expected(cursor: Cursor<'i>, expected: Expected) -> Self {
        Message {
            cursor,
            unexpected: Cow::Borrowed(""),
            expected,
            custom: None,
        }
    }

    /// The position this error occurred at.
    pub fn cursor(&self) -> Cursor<'i> {
        self.cursor
    }

    /// What was actually found (possibly empty).
    pub fn unexpected_text(&self) -> &str {
        &self.unexpected
    }

    /// The accumulated expected-set.
    pub fn expected_set(&self) -> &Expected {
        &self.expected
    }

    /// The user-supplied custom payload, if any.
    pub fn custom(&self) -> Option<&M> {
        self.custom.as_ref()
    }

    /// Replaces the expected-set, leaving cursor/unexpected/custom untouched.
    ///
    /// This is the operation behind [`crate::combinator::label`].
    #[must_use]
    pub fn with_expected(mut self, expected: Expected) -> Self {
        self.expected = expected;
        self
    }

    /// Attaches a custom payload, replacing any existing one.
    #[must_use]
    pub fn with_custom(mut self, custom: M) -> Self {
        self.custom = Some(custom);
        self
    }
}

/// Combines two error messages that refer to the **same cursor**.
///
/// Keeps `m1`'s cursor and unexpected text (they are assumed identical to
/// `m2`'s, since `merge` is only ever called on messages from the same
/// position) and unions the two expected-sets. `m1`'s custom payload wins if
/// present, otherwise `m2`'s.
pub fn merge<'i, M>(m1: Message<'i, M>, m2: Message<'i, M>) -> Message<'i, M> {
    let custom = m1.custom.or(m2.custom);
    Message {
        cursor: m1.cursor,
        unexpected: m1.unexpected,
        expected: m1.expected.union(m2.expected),
        custom,
    }
}

impl<'i, M> fmt::Display for Message<'i, M> {
    /// Renders the canonical error report:
    ///
    /// ```text
    /// error at line <L>, column <C>:
    /// unexpected <u>
    /// expected <e1>, <e2>, … or <en>
    /// ```
    ///
    /// The `unexpected` line is omitted when empty; the `expected` line is
    /// omitted when the set is empty; labels are deduplicated in first-seen
    /// order and joined with `, `, except the last two which are joined with
    /// ` or `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.cursor.line_col();
        writeln!(f, "error at line {line}, column {column}:")?;
        if !self.unexpected.is_empty() {
            writeln!(f, "unexpected {}", self.unexpected)?;
        }
        let labels = self.expected.labels();
        if !labels.is_empty() {
            write!(f, "expected ")?;
            render_labels(f, &labels)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn render_labels(f: &mut fmt::Formatter<'_>, labels: &[Cow<'static, str>]) -> fmt::Result {
    match labels {
        [] => Ok(()),
        [only] => write!(f, "{only}"),
        _ => {
            let (last, rest) = labels.split_last().expect("non-empty");
            for (i, label) in rest.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{label}")?;
            }
            write!(f, " or {last}")
        }
    }
}

impl<'i, M> fmt::Debug for Message<'i, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("cursor", &self.cursor)
            .field("unexpected", &self.unexpected)
            .field("expected", &self.expected.labels())
            .finish()
    }
}

impl<'i, M: fmt::Debug> std::error::Error for Message<'i, M> {}

/// Renders a character the way [`crate::primitive::satisfy`] and friends
/// report an unexpected token: `'a'`, or `"end of input"` past the last char.
pub fn render_char(c: Option<char>) -> Cow<'static, str> {
    match c {
        Some(c) => Cow::Owned(format!("{c:?}")),
        None => Cow::Borrowed("end of input"),
    }
}
