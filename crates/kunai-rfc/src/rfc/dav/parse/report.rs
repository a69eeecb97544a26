//! `calendar-query` REPORT request XML parsing (RFC 4791 §7.8).

use chrono_tz::Tz;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::{ParseError, ParseResult};
use crate::rfc::dav::core::{
    CalendarQuery, CompFilter, ParamFilter, PropFilter, TextMatch, TimeRange,
};

/// ## Summary
/// Parses the XML body of a `calendar-query` REPORT into its filter tree.
///
/// Elements outside `filter` (such as `prop`) are skipped. Time-range bounds
/// are UTC.
///
/// ## Errors
/// Returns an error if the XML is malformed, the root element is not
/// `calendar-query`, the `filter` or its root `comp-filter` is missing, a
/// filter lacks its `name` attribute or a time-range is invalid.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_calendar_query(xml: &[u8]) -> ParseResult<CalendarQuery> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = local_name(e)?;
                if name != "calendar-query" {
                    return Err(ParseError::unexpected_element(&name));
                }
                break;
            }
            Event::Empty(ref e) => {
                let name = local_name(e)?;
                if name != "calendar-query" {
                    return Err(ParseError::unexpected_element(&name));
                }
                return Err(ParseError::missing_element("filter"));
            }
            Event::Eof => return Err(ParseError::missing_element("calendar-query")),
            _ => {}
        }
    }

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                if local_name(e)? == "filter" {
                    if is_empty {
                        return Err(ParseError::missing_element("comp-filter"));
                    }
                    let comp_filter = parse_filter(&mut reader)?;
                    tracing::debug!(root = %comp_filter.name, "Parsed calendar-query filter");
                    return Ok(CalendarQuery::new(comp_filter));
                }
                if !is_empty {
                    skip_element(&mut reader)?;
                }
            }
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
    }

    Err(ParseError::missing_element("filter"))
}

/// Parses the content of `filter`, which holds exactly one root `comp-filter`.
fn parse_filter(reader: &mut Reader<&[u8]>) -> ParseResult<CompFilter> {
    let mut root = None;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = local_name(e)?;
                match name.as_str() {
                    "comp-filter" if root.is_none() => {
                        root = Some(parse_comp_filter(reader, e, is_empty)?);
                    }
                    "comp-filter" => return Err(ParseError::unexpected_element(&name)),
                    _ if !is_empty => skip_element(reader)?,
                    _ => {}
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(ParseError::xml("unexpected end of document in filter")),
            _ => {}
        }
    }

    root.ok_or_else(|| ParseError::missing_element("comp-filter"))
}

/// Parses a `comp-filter` element whose start tag is `start`.
fn parse_comp_filter(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    is_empty: bool,
) -> ParseResult<CompFilter> {
    let mut comp_filter = CompFilter::new(get_attribute(start, "name")?);
    if is_empty {
        return Ok(comp_filter);
    }

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match local_name(e)?.as_str() {
                    "comp-filter" => {
                        let nested = parse_comp_filter(reader, e, is_empty)?;
                        comp_filter.comp_filters.push(nested);
                    }
                    "prop-filter" => {
                        let prop_filter = parse_prop_filter(reader, e, is_empty)?;
                        comp_filter.prop_filters.push(prop_filter);
                    }
                    "time-range" => {
                        comp_filter.time_range = Some(parse_time_range(e)?);
                        if !is_empty {
                            skip_element(reader)?;
                        }
                    }
                    "is-not-defined" => {
                        comp_filter.is_not_defined = true;
                        if !is_empty {
                            skip_element(reader)?;
                        }
                    }
                    _ if !is_empty => skip_element(reader)?,
                    _ => {}
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(ParseError::xml("unexpected end of document in comp-filter"));
            }
            _ => {}
        }
    }

    Ok(comp_filter)
}

/// Parses a `prop-filter` element whose start tag is `start`.
fn parse_prop_filter(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    is_empty: bool,
) -> ParseResult<PropFilter> {
    let mut prop_filter = PropFilter::new(get_attribute(start, "name")?);
    if is_empty {
        return Ok(prop_filter);
    }

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match local_name(e)?.as_str() {
                    "text-match" => {
                        prop_filter.text_match = Some(parse_text_match(reader, e, is_empty)?);
                    }
                    "param-filter" => {
                        let param_filter = parse_param_filter(reader, e, is_empty)?;
                        prop_filter.param_filters.push(param_filter);
                    }
                    "time-range" => {
                        prop_filter.time_range = Some(parse_time_range(e)?);
                        if !is_empty {
                            skip_element(reader)?;
                        }
                    }
                    "is-not-defined" => {
                        prop_filter.is_not_defined = true;
                        if !is_empty {
                            skip_element(reader)?;
                        }
                    }
                    _ if !is_empty => skip_element(reader)?,
                    _ => {}
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(ParseError::xml("unexpected end of document in prop-filter"));
            }
            _ => {}
        }
    }

    Ok(prop_filter)
}

/// Parses a `param-filter` element whose start tag is `start`.
fn parse_param_filter(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    is_empty: bool,
) -> ParseResult<ParamFilter> {
    let mut param_filter = ParamFilter::new(get_attribute(start, "name")?);
    if is_empty {
        return Ok(param_filter);
    }

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match local_name(e)?.as_str() {
                    "text-match" => {
                        param_filter.text_match = Some(parse_text_match(reader, e, is_empty)?);
                    }
                    "is-not-defined" => {
                        param_filter.is_not_defined = true;
                        if !is_empty {
                            skip_element(reader)?;
                        }
                    }
                    _ if !is_empty => skip_element(reader)?,
                    _ => {}
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(ParseError::xml("unexpected end of document in param-filter"));
            }
            _ => {}
        }
    }

    Ok(param_filter)
}

/// Parses a `text-match` element: its attributes and its character content.
fn parse_text_match(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    is_empty: bool,
) -> ParseResult<TextMatch> {
    let mut text_match = TextMatch::equals(String::new());
    for attr in start.attributes().flatten() {
        let attr_name = attr.key.local_name();
        let key = std::str::from_utf8(attr_name.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        match key {
            "collation" => text_match.collation = Some(value.to_owned()),
            "negate-condition" => text_match.negate = value == "yes" || value == "true",
            _ => {}
        }
    }
    if is_empty {
        return Ok(text_match);
    }

    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&reader.decoder().decode(e.as_ref())?),
            Event::CData(e) => text.push_str(&reader.decoder().decode(e.as_ref())?),
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let entity = e.decode()?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                        .ok_or_else(|| {
                            ParseError::invalid_value(format!("unknown entity: &{entity};"))
                        })?;
                    text.push_str(resolved);
                }
            }
            Event::Start(_) => skip_element(reader)?,
            Event::End(_) => break,
            Event::Eof => {
                return Err(ParseError::xml("unexpected end of document in text-match"));
            }
            _ => {}
        }
    }

    // Surrounding whitespace is layout, not part of the match value.
    text_match.text = text.trim().to_owned();
    Ok(text_match)
}

/// Parses a time-range element.
///
/// RFC 4791 §9.9 specifies iCalendar DATE-TIME format: `YYYYMMDDTHHMMSSZ`
fn parse_time_range(elem: &BytesStart<'_>) -> ParseResult<TimeRange> {
    let mut start = None;
    let mut end = None;

    for attr in elem.attributes().flatten() {
        let attr_name = attr.key.local_name();
        let key = std::str::from_utf8(attr_name.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "start" => {
                start = Some(parse_icalendar_utc_datetime(value).ok_or_else(|| {
                    ParseError::invalid_value(format!("invalid time-range start: {value}"))
                })?);
            }
            "end" => {
                end = Some(parse_icalendar_utc_datetime(value).ok_or_else(|| {
                    ParseError::invalid_value(format!("invalid time-range end: {value}"))
                })?);
            }
            _ => {}
        }
    }

    if start.is_none() && end.is_none() {
        return Err(ParseError::invalid_value(
            "time-range must include start or end",
        ));
    }

    if let (Some(range_start), Some(range_end)) = (start, end)
        && range_end <= range_start
    {
        return Err(ParseError::invalid_value(
            "time-range end must be greater than start",
        ));
    }

    Ok(TimeRange { start, end })
}

/// Parses an iCalendar UTC DATE-TIME value.
///
/// Format: `YYYYMMDDTHHMMSSZ` (e.g., `20060104T140000Z`)
///
/// Per RFC 4791 §9.9, time-range values MUST be UTC (end with 'Z').
fn parse_icalendar_utc_datetime(s: &str) -> Option<chrono::DateTime<Tz>> {
    let s = s.strip_suffix('Z')?;

    if s.len() != 15 || s.as_bytes().get(8) != Some(&b'T') {
        return None;
    }
    if !s.bytes().enumerate().all(|(i, b)| i == 8 || b.is_ascii_digit()) {
        return None;
    }

    let year = s[0..4].parse::<i32>().ok()?;
    let month = s[4..6].parse::<u32>().ok()?;
    let day = s[6..8].parse::<u32>().ok()?;
    let hour = s[9..11].parse::<u32>().ok()?;
    let minute = s[11..13].parse::<u32>().ok()?;
    let second = s[13..15].parse::<u32>().ok()?;

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .map(|dt| dt.and_utc().with_timezone(&Tz::UTC))
}

/// Gets an attribute value from an element.
fn get_attribute(e: &BytesStart<'_>, name: &str) -> ParseResult<String> {
    for attr in e.attributes().flatten() {
        let attr_name = attr.key.local_name();
        let key = std::str::from_utf8(attr_name.as_ref())?;
        if key == name {
            return Ok(std::str::from_utf8(&attr.value)?.to_owned());
        }
    }
    Err(ParseError::missing_attribute(name))
}

fn local_name(e: &BytesStart<'_>) -> ParseResult<String> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_owned())
}

/// Consumes events up to and including the end tag of the element whose
/// start tag was just read.
fn skip_element(reader: &mut Reader<&[u8]>) -> ParseResult<()> {
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(()),
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(ParseError::xml("unexpected end of document")),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
