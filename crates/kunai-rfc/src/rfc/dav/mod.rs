//! `CalDAV` (RFC 4791) calendar objects, query filters and request decoding.

pub mod core;
pub mod parse;
