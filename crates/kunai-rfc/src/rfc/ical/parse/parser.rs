//! iCalendar document parser (RFC 5545).
//!
//! Assembles content lines into a component tree. Property values are kept
//! raw; typed interpretation happens when a value is consulted.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use crate::rfc::ical::core::{Component, ComponentKind, ContentLine, ICalendar, Property};

/// Parses an iCalendar document from a string.
///
/// ## Errors
///
/// Returns an error if the input is not valid iCalendar.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<ICalendar> {
    tracing::debug!("Parsing iCalendar document");

    let lines = split_lines(input);

    if lines.is_empty() {
        tracing::warn!("Empty iCalendar input");
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1, 1));
    }

    let content_lines: Vec<(usize, ContentLine)> = lines
        .into_iter()
        .map(|(line_num, line)| parse_content_line(&line, line_num).map(|cl| (line_num, cl)))
        .collect::<ParseResult<_>>()?;

    tracing::trace!(count = content_lines.len(), "Parsed content lines");

    let mut iter = content_lines.into_iter();

    let (line_num, begin_line) = iter
        .next()
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingBegin, 1, 1))?;
    if begin_line.name != "BEGIN" {
        return Err(ParseError::new(ParseErrorKind::MissingBegin, line_num, 1));
    }

    let root = parse_component(&mut iter, line_num, &begin_line.raw_value)?;

    if root.kind != ComponentKind::Calendar {
        tracing::warn!(root = %root.name, "Root component is not VCALENDAR");
        return Err(
            ParseError::new(ParseErrorKind::MissingBegin, line_num, 1)
                .with_context("expected VCALENDAR"),
        );
    }

    if let Some((trailing, _)) = iter.next() {
        tracing::warn!(line = trailing, "Ignoring content after END:VCALENDAR");
    }

    tracing::debug!(
        components = root.children.len(),
        "iCalendar document parsed successfully"
    );

    Ok(ICalendar { root })
}

/// Parses the body of a component whose BEGIN line has been consumed, up to
/// and including its END line.
fn parse_component(
    iter: &mut impl Iterator<Item = (usize, ContentLine)>,
    begin_line_num: usize,
    raw_name: &str,
) -> ParseResult<Component> {
    let component_name = raw_name.to_ascii_uppercase();
    let mut component = Component::custom(component_name.clone());
    let mut last_line_num = begin_line_num;

    loop {
        let Some((line_num, content_line)) = iter.next() else {
            return Err(
                ParseError::new(ParseErrorKind::MissingEnd, last_line_num, 1)
                    .with_context(format!("missing END:{component_name}")),
            );
        };
        last_line_num = line_num;

        match content_line.name.as_str() {
            "BEGIN" => {
                let nested = parse_component(iter, line_num, &content_line.raw_value)?;
                component.children.push(nested);
            }
            "END" => {
                let end_name = content_line.raw_value.to_ascii_uppercase();
                if end_name != component_name {
                    return Err(
                        ParseError::new(ParseErrorKind::MismatchedComponent, line_num, 1)
                            .with_context(format!(
                                "expected END:{component_name}, got END:{end_name}"
                            )),
                    );
                }
                break;
            }
            _ => component
                .properties
                .push(Property::from_content_line(content_line)),
        }
    }

    Ok(component)
}
