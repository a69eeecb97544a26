//! CalDAV `calendar-query` evaluation over iCalendar data.
//!
//! - [`rfc::ical`]: iCalendar model, parser and time zone handling (RFC 5545)
//! - [`rfc::dav`]: calendar objects, query filter types and REPORT decoding (RFC 4791)
//! - [`rfc::filter`]: the matcher deciding which objects satisfy a query

pub mod error;
pub mod rfc;
