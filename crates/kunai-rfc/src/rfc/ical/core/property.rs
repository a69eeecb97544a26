//! iCalendar property and content line types (RFC 5545 §3.1, §3.8).

use chrono::{NaiveTime, Utc};
use chrono_tz::Tz;

use super::{DataFormatError, DataFormatResult, DateTime, Duration, Parameter, parse_date};
use crate::rfc::ical::expand::{ConversionError, convert_to_utc_lenient, resolve_tzid};

/// A raw content line as parsed from iCalendar text.
///
/// This is the lexer's output, before it is attached to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string (after unfolding, before unescaping).
    pub raw_value: String,
}

/// An iCalendar property.
///
/// The value is kept exactly as it appeared on the wire. Typed views are
/// computed on demand by [`Property::date_time`] and [`Property::duration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string (unfolded, still escaped).
    pub value: String,
}

impl Property {
    /// Creates a property without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// Creates a property with parameters.
    #[must_use]
    pub fn with_params(
        name: impl Into<String>,
        params: Vec<Parameter>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params,
            value: value.into(),
        }
    }

    /// Creates a property from a lexed content line.
    #[must_use]
    pub fn from_content_line(cl: ContentLine) -> Self {
        Self {
            name: cl.name,
            params: cl.params,
            value: cl.raw_value,
        }
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the first value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    /// Returns the VALUE parameter if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.get_param_value("VALUE")
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }

    /// ## Summary
    /// Returns whether the value is a DATE, either declared with `VALUE=DATE`
    /// or written as a bare 8-character date.
    #[must_use]
    pub fn is_date(&self) -> bool {
        match self.value_type() {
            Some(value_type) => value_type.eq_ignore_ascii_case("DATE"),
            None => self.value.len() == 8,
        }
    }

    /// ## Summary
    /// Interprets the value as a point in time.
    ///
    /// DATE values denote midnight. `Z`-suffixed values are UTC, values with a
    /// `TZID` parameter are read in that zone and anything else is read as
    /// wall-clock time in `tz`.
    ///
    /// ## Errors
    /// Returns a `DataFormatError` if the value is not a DATE or DATE-TIME,
    /// the `TZID` is unknown or the wall-clock time cannot be placed in its zone.
    pub fn date_time(&self, tz: Tz) -> DataFormatResult<chrono::DateTime<Utc>> {
        if let Some(value_type) = self.value_type()
            && !value_type.eq_ignore_ascii_case("DATE")
            && !value_type.eq_ignore_ascii_case("DATE-TIME")
        {
            return Err(DataFormatError::UnsupportedValueType {
                property: self.name.clone(),
                value_type: value_type.to_string(),
            });
        }

        if self.is_date() {
            let date = parse_date(&self.value).ok_or_else(|| DataFormatError::InvalidDate {
                property: self.name.clone(),
                value: self.value.clone(),
            })?;
            let zone = match self.tzid() {
                Some(tzid) => resolve_tzid(tzid).map_err(|e| self.conversion_error(e))?,
                None => tz,
            };
            return convert_to_utc_lenient(date.and_time(NaiveTime::MIN), zone)
                .map_err(|e| self.conversion_error(e));
        }

        DateTime::parse(&self.value, self.tzid())
            .ok_or_else(|| DataFormatError::InvalidDateTime {
                property: self.name.clone(),
                value: self.value.clone(),
            })?
            .to_utc(tz)
            .map_err(|e| self.conversion_error(e))
    }

    /// ## Summary
    /// Interprets the value as a DURATION.
    ///
    /// ## Errors
    /// Returns `DataFormatError::InvalidDuration` if the value is malformed.
    pub fn duration(&self) -> DataFormatResult<Duration> {
        Duration::parse(&self.value).ok_or_else(|| DataFormatError::InvalidDuration {
            property: self.name.clone(),
            value: self.value.clone(),
        })
    }

    fn conversion_error(&self, source: ConversionError) -> DataFormatError {
        DataFormatError::Conversion {
            property: self.name.clone(),
            source,
        }
    }
}

/// Property names consulted during matching.
pub mod names {
    pub const DTEND: &str = "DTEND";
    pub const DTSTART: &str = "DTSTART";
    pub const DURATION: &str = "DURATION";
}
