use std::fmt;
use std::io::{self, Write};
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::ast::ValidationError;
use crate::compiler::CompileError;
use crate::parser::ParseError;

/// Display a workspace parse error with ariadne formatting
pub fn display_parse_error(source: &str, filename: &str, error: &ParseError) -> io::Result<()> {
    let offset = error
        .location()
        .map_or(0, |(line, column)| char_offset_of(source, line, column));
    let end_offset = std::cmp::min(offset + 1, source.chars().count());

    Report::build(ReportKind::Error, filename, offset)
        .with_message("Workspace parse error")
        .with_label(
            Label::new((filename, offset..end_offset))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

/// Display a compile error with ariadne formatting, pointing at the offending
/// block when it can be found in the source
pub fn display_compile_error(source: &str, filename: &str, error: &CompileError) -> io::Result<()> {
    let span = error
        .block()
        .and_then(|block| block_span(source, &block.id))
        .unwrap_or(0..1);

    Report::build(ReportKind::Error, filename, span.start)
        .with_message("Compile error")
        .with_label(
            Label::new((filename, span))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

/// Display a program validation error with ariadne formatting
pub fn display_validation_error(source: &str, filename: &str, error: &ValidationError) -> io::Result<()> {
    Report::build(ReportKind::Error, filename, 0)
        .with_message("Invalid program")
        .with_label(
            Label::new((filename, 0..1))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

/// Writes a one-line `error: ...` to `out` when a rendered report could not be
/// written, so the diagnostic is never lost.
pub fn fallback<E: fmt::Display, W: Write>(rendered: io::Result<()>, error: &E, out: &mut W) {
    if rendered.is_err() {
        let _ = writeln!(out, "error: {}", error);
    }
}

/// Character span of the `"<id>"` string that is the value of an `"id"` key.
pub fn block_span(source: &str, id: &str) -> Option<Range<usize>> {
    if id.is_empty() {
        return None;
    }
    let needle = format!("\"{}\"", id);
    let start = source.match_indices(&needle).map(|(at, _)| at).find(|&at| {
        source[..at]
            .trim_end()
            .strip_suffix(':')
            .is_some_and(|key| key.trim_end().ends_with("\"id\""))
    })?;
    let start_char = source[..start].chars().count();
    Some(start_char..start_char + needle.chars().count())
}

fn char_offset_of(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text) in source.split('\n').enumerate() {
        if index + 1 == line {
            return offset + text.chars().take(column.saturating_sub(1)).count();
        }
        offset += text.chars().count() + 1;
    }
    offset.saturating_sub(1)
}
