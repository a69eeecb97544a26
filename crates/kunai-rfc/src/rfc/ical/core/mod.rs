//! iCalendar core models (RFC 5545).
//!
//! Property values are kept as raw strings. Typed views (date-times,
//! durations) are produced on demand and report failures as
//! [`DataFormatError`].

mod component;
mod datetime;
mod duration;
mod error;
mod parameter;
mod property;

pub use component::{Component, ComponentKind, ICalendar};
pub use datetime::{DateTime, DateTimeForm, parse_date};
pub use duration::Duration;
pub use error::{DataFormatError, DataFormatResult};
pub use parameter::Parameter;
pub use property::{ContentLine, Property, names};
