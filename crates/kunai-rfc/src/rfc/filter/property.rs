use crate::rfc::dav::core::PropFilter;
use crate::rfc::ical::core::DataFormatResult;

use super::leaf::{match_param_filter, match_text_match};
use super::node::CalendarNode;
use super::time_range::Window;

pub(super) fn match_prop_filter<N: CalendarNode>(
    filter: &PropFilter,
    comp: &N,
) -> DataFormatResult<bool> {
    let Some(prop) = comp.property(&filter.name) else {
        return Ok(filter.is_not_defined);
    };
    if filter.is_not_defined {
        return Ok(false);
    }

    if let Some(window) = filter.time_range.as_ref().and_then(Window::new) {
        if !window.contains_property(prop)? {
            return Ok(false);
        }
    } else if let Some(text_match) = &filter.text_match {
        if !match_text_match(text_match, prop) {
            return Ok(false);
        }
    } else {
        // A bare prop-filter only tests for presence; param-filters are not consulted.
        return Ok(true);
    }

    Ok(filter
        .param_filters
        .iter()
        .all(|param_filter| match_param_filter(param_filter, prop)))
}
