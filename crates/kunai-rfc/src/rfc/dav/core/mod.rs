//! `CalDAV` resource and `calendar-query` filter types.

mod object;
mod report;

pub use object::{CalendarObject, generate_etag};
pub use report::{CalendarQuery, CompFilter, ParamFilter, PropFilter, TextMatch, TimeRange};
