//! Time zone handling for date/time interpretation.

pub mod timezone;

pub use timezone::{
    ConversionError, convert_to_utc, convert_to_utc_lenient, normalize_tzid, resolve_tzid,
};
