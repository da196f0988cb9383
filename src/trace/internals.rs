use std::borrow::Cow;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use is_terminal_polyfill::IsTerminal;

use crate::cursor::Cursor;
use crate::result::PResult;

static DEPTH: AtomicUsize = AtomicUsize::new(0);

pub struct Depth(usize);

impl Depth {
    pub fn new() -> Self {
        Depth(DEPTH.fetch_add(1, Ordering::SeqCst))
    }
}

impl Drop for Depth {
    fn drop(&mut self) {
        DEPTH.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::ops::Deref for Depth {
    type Target = usize;

    fn deref(&self) -> &usize {
        &self.0
    }
}

enum Severity {
    OkConsumed,
    OkEps,
    ErrEps,
    ErrConsumed,
}

impl Severity {
    fn with_result<O, M>(result: &PResult<'_, O, M>) -> Self {
        match result {
            PResult::Ok { expected: None, .. } => Severity::OkConsumed,
            PResult::Ok { expected: Some(_), .. } => Severity::OkEps,
            PResult::Err { consumed: false, .. } => Severity::ErrEps,
            PResult::Err { consumed: true, .. } => Severity::ErrConsumed,
        }
    }

    fn style(&self) -> anstyle::Style {
        let color = match self {
            Severity::OkConsumed | Severity::OkEps => anstyle::AnsiColor::Green,
            Severity::ErrEps => anstyle::AnsiColor::Yellow,
            Severity::ErrConsumed => anstyle::AnsiColor::Red,
        };
        anstyle::Style::new().fg_color(Some(color.into()))
    }

    fn label(&self) -> &'static str {
        match self {
            Severity::OkConsumed => "ok (consumed)",
            Severity::OkEps => "ok (epsilon)",
            Severity::ErrEps => "err (epsilon)",
            Severity::ErrConsumed => "err (consumed)",
        }
    }
}

pub fn start(depth: usize, name: &Cow<'static, str>, cursor: Cursor<'_>) {
    let gutter = anstyle::Style::new().bold();
    let input_style = anstyle::Style::new().underline();

    let call_column = format!("{:depth$}> {name}", "");
    let slice = truncated_slice(cursor);

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{call_column:40} {gutter_on}|{gutter_off} {input_on}{slice}{input_off}",
        gutter_on = gutter.render(),
        gutter_off = gutter.render_reset(),
        input_on = input_style.render(),
        input_off = input_style.render_reset(),
    );
}

pub fn end<O, M>(depth: usize, name: &Cow<'static, str>, cursor: Cursor<'_>, result: &PResult<'_, O, M>) {
    let gutter = anstyle::Style::new().bold();
    let severity = Severity::with_result(result);
    let status_style = severity.style();

    let consumed = match result {
        PResult::Ok { cursor: after, .. } => after.offset().saturating_sub(cursor.offset()),
        PResult::Err { .. } => 0,
    };
    let status = match result {
        PResult::Ok { .. } => format!("{} +{consumed}", severity.label()),
        PResult::Err { .. } => severity.label().to_owned(),
    };

    let call_column = format!("{:depth$}< {name}", "");

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{status_on}{call_column:40}{status_off} {gutter_on}|{gutter_off} {status_on}{status}{status_off}",
        status_on = status_style.render(),
        status_off = status_style.render_reset(),
        gutter_on = gutter.render(),
        gutter_off = gutter.render_reset(),
    );
}

/// Renders enough of the remaining input for a trace line, marking
/// truncation when the input is wider than the terminal can usefully show.
fn truncated_slice(cursor: Cursor<'_>) -> String {
    let width = term_width().saturating_sub(48).max(16);
    let rest = cursor.as_str();
    let mut debug = format!("{rest:?}");
    if debug.chars().count() > width {
        debug.truncate(
            debug
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(debug.len()),
        );
        debug.push('…');
    }
    debug
}

fn term_width() -> usize {
    columns_env().or_else(query_width).unwrap_or(80)
}

fn query_width() -> Option<usize> {
    if std::io::stderr().is_terminal() {
        terminal_size::terminal_size().map(|(w, _h)| w.0 as usize)
    } else {
        None
    }
}

fn columns_env() -> Option<usize> {
    std::env::var("COLUMNS").ok().and_then(|c| c.parse().ok())
}
