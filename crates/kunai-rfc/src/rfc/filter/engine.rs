//! Query entry points.

use crate::rfc::dav::core::{CalendarObject, CalendarQuery, CompFilter};
use crate::rfc::ical::core::DataFormatResult;

use super::component::match_nested;
use super::node::CalendarNode;

/// ## Summary
/// Keeps the calendar objects matching `query`, in their original order.
///
/// Without a query every object is returned.
///
/// ## Errors
/// Returns the first `DataFormatError` raised while matching; no partial
/// result is returned in that case.
#[tracing::instrument(skip_all, fields(objects = objects.len()))]
pub fn filter(
    query: Option<&CalendarQuery>,
    objects: Vec<CalendarObject>,
) -> DataFormatResult<Vec<CalendarObject>> {
    let Some(query) = query else {
        return Ok(objects);
    };

    let mut matched = Vec::with_capacity(objects.len());
    for object in objects {
        if matches(&query.comp_filter, &object)? {
            matched.push(object);
        }
    }

    tracing::debug!(matched = matched.len(), "Filtered calendar objects");
    Ok(matched)
}

/// ## Summary
/// Tests one calendar object against a root component filter.
///
/// An object without parsed data never matches.
///
/// ## Errors
/// Returns a `DataFormatError` if a date/time value needed by a time-range
/// test cannot be interpreted.
pub fn matches(query: &CompFilter, object: &CalendarObject) -> DataFormatResult<bool> {
    let Some(data) = &object.data else {
        tracing::trace!(path = %object.path, "No calendar data");
        return Ok(false);
    };

    let matched = matches_node(query, &data.root)?;
    tracing::trace!(path = %object.path, matched, "Matched calendar object");
    Ok(matched)
}

/// ## Summary
/// Tests a component tree against a root component filter.
///
/// A root whose name differs from the filter's yields the filter's
/// is-not-defined flag. Otherwise every nested component filter and then every
/// property filter must match.
///
/// ## Errors
/// Returns a `DataFormatError` if a date/time value needed by a time-range
/// test cannot be interpreted.
pub fn matches_node<N: CalendarNode>(query: &CompFilter, root: &N) -> DataFormatResult<bool> {
    if root.name() != query.name {
        return Ok(query.is_not_defined);
    }
    match_nested(query, root)
}
