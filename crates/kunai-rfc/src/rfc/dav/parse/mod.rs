//! `CalDAV` request body parsing.
//!
//! This module decodes `calendar-query` REPORT bodies using the `quick-xml`
//! crate.

mod error;
mod report;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use report::parse_calendar_query;
