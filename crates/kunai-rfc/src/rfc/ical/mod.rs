//! iCalendar (RFC 5545) model, parser and time zone handling.

pub mod core;
pub mod expand;
pub mod parse;
