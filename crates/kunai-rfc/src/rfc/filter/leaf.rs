use crate::rfc::dav::core::{ParamFilter, TextMatch};

use super::node::PropertyNode;

pub(super) fn match_param_filter<P: PropertyNode>(filter: &ParamFilter, prop: &P) -> bool {
    let value = prop.param_value(&filter.name).unwrap_or_default();
    if value.is_empty() {
        return filter.is_not_defined;
    }
    if filter.is_not_defined {
        return false;
    }

    filter
        .text_match
        .as_ref()
        .is_none_or(|text_match| text_matches(text_match, value))
}

pub(super) fn match_text_match<P: PropertyNode>(text_match: &TextMatch, prop: &P) -> bool {
    text_matches(text_match, prop.value())
}

fn text_matches(text_match: &TextMatch, value: &str) -> bool {
    (value == text_match.text) != text_match.negate
}
