//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Lines starting with SP/HTAB are
/// treated as continuations of the previous line. Per RFC 5545 §3.1, unfolding
/// removes the CRLF and the whitespace character (no space is inserted).
///
/// Each line is returned with its 1-based starting line number.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
            } else {
                lines.push((i + 1, continuation.to_string()));
            }
        } else if !line.contains(':') {
            // Lenient: treat lines without a colon as folded continuations.
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(line);
            } else {
                lines.push((i + 1, line.to_string()));
            }
        } else {
            lines.push((i + 1, line.to_string()));
        }
    }

    lines
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`
///
/// ## Errors
/// Returns an error if the line is malformed or contains invalid characters.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let name_end = line
        .find([';', ':'])
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingColon, line_num, line.len()))?;

    let name = &line[..name_end];
    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
            1,
        ));
    }
    if let Some(pos) = name.find(|c: char| !is_name_char(c)) {
        return Err(ParseError::new(
            ParseErrorKind::InvalidPropertyName,
            line_num,
            pos + 1,
        ));
    }

    let mut params = Vec::new();
    let mut offset = name_end;
    while let Some(after) = line[offset..].strip_prefix(';') {
        let (param, consumed) = parse_parameter(after, offset + 1, line_num)?;
        params.push(param);
        offset += 1 + consumed;
    }

    let value = line[offset..]
        .strip_prefix(':')
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingColon, line_num, offset + 1))?;

    Ok(ContentLine {
        name: name.to_ascii_uppercase(),
        params,
        raw_value: value.to_string(),
    })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Parses one `name=value[,value]` parameter.
///
/// `base` is the byte offset of `input` within the line. Returns the parameter
/// and the number of bytes consumed, leaving the following `;` or `:` in place.
fn parse_parameter(input: &str, base: usize, line_num: usize) -> ParseResult<(Parameter, usize)> {
    let eq = input
        .find(|c: char| !is_name_char(c))
        .ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingColon, line_num, base + input.len())
        })?;

    if eq == 0 || !input[eq..].starts_with('=') {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            base + eq + 1,
        ));
    }

    let name = &input[..eq];
    let mut pos = eq + 1;
    let mut values = Vec::new();

    loop {
        let (value, consumed) = parse_param_value(&input[pos..], base + pos, line_num)?;
        values.push(value);
        pos += consumed;

        match input[pos..].chars().next() {
            Some(',') => pos += 1,
            Some(';' | ':') => return Ok((Parameter::with_values(name, values), pos)),
            Some(c) => {
                return Err(
                    ParseError::new(ParseErrorKind::InvalidParameter, line_num, base + pos + 1)
                        .with_context(format!("unexpected character '{c}'")),
                );
            }
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingColon,
                    line_num,
                    base + pos,
                ));
            }
        }
    }
}

/// Parses a parameter value (possibly quoted), returning the decoded value and
/// the number of bytes consumed.
fn parse_param_value(input: &str, base: usize, line_num: usize) -> ParseResult<(String, usize)> {
    if let Some(quoted) = input.strip_prefix('"') {
        let close = quoted.find('"').ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnclosedQuote, line_num, base + 1)
        })?;
        Ok((decode_caret(&quoted[..close]), close + 2))
    } else {
        let end = input.find([',', ';', ':']).unwrap_or(input.len());
        Ok((decode_caret(&input[..end]), end))
    }
}

/// Decodes RFC 6868 caret escapes (`^^`, `^n`, `^'`).
fn decode_caret(s: &str) -> String {
    let mut value = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            value.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => {
                value.push('^');
                chars.next();
            }
            Some('n') => {
                value.push('\n');
                chars.next();
            }
            Some('\'') => {
                value.push('"');
                chars.next();
            }
            // Invalid caret escape, preserve as-is
            _ => value.push('^'),
        }
    }

    value
}
