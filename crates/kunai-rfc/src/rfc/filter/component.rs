use crate::rfc::dav::core::CompFilter;
use crate::rfc::ical::core::DataFormatResult;

use super::node::CalendarNode;
use super::property::match_prop_filter;
use super::time_range::Window;

/// Matches if any direct child of `comp` satisfies `filter`.
///
/// An is-not-defined filter only tests for absence: any child with the
/// filter's name fails it, whatever its content.
pub(super) fn match_comp_filter<N: CalendarNode>(
    filter: &CompFilter,
    comp: &N,
) -> DataFormatResult<bool> {
    if filter.is_not_defined {
        return Ok(!comp.children().iter().any(|child| child.name() == filter.name));
    }

    for child in comp.children() {
        if match_comp_filter_child(filter, child)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn match_comp_filter_child<N: CalendarNode>(
    filter: &CompFilter,
    comp: &N,
) -> DataFormatResult<bool> {
    if comp.name() != filter.name {
        return Ok(false);
    }

    if let Some(window) = filter.time_range.as_ref().and_then(Window::new)
        && !window.overlaps_component(comp)?
    {
        tracing::trace!(component = comp.name(), "Outside time range");
        return Ok(false);
    }

    match_nested(filter, comp)
}

/// Nested component filters, then property filters, all of which must match.
pub(super) fn match_nested<N: CalendarNode>(
    filter: &CompFilter,
    comp: &N,
) -> DataFormatResult<bool> {
    for comp_filter in &filter.comp_filters {
        if !match_comp_filter(comp_filter, comp)? {
            return Ok(false);
        }
    }

    for prop_filter in &filter.prop_filters {
        if !match_prop_filter(prop_filter, comp)? {
            return Ok(false);
        }
    }

    Ok(true)
}
