//! Read-only tree capabilities consumed by the matcher.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::rfc::ical::core::{
    Component, DataFormatError, DataFormatResult, Duration, Property, names,
};

/// A property as seen by the matcher.
pub trait PropertyNode {
    /// Property name.
    fn name(&self) -> &str;

    /// Raw scalar value.
    fn value(&self) -> &str;

    /// Value of the named parameter, `None` if absent.
    fn param_value(&self, name: &str) -> Option<&str>;

    /// ## Summary
    /// Interprets the value as a point in time, reading floating values in `tz`.
    ///
    /// ## Errors
    /// Returns a `DataFormatError` if the value is not a valid date or date-time.
    fn date_time(&self, tz: Tz) -> DataFormatResult<DateTime<Utc>>;

    /// Whether the value is a DATE rather than a DATE-TIME.
    fn is_date(&self) -> bool {
        false
    }

    /// ## Summary
    /// Interprets the value as a DURATION.
    ///
    /// ## Errors
    /// Returns a `DataFormatError` if the value is not a valid duration.
    fn duration(&self) -> DataFormatResult<Duration>;
}

/// A component as seen by the matcher.
pub trait CalendarNode: Sized {
    /// Property type of this tree.
    type Property: PropertyNode;

    /// Component name, e.g. `VEVENT`.
    fn name(&self) -> &str;

    /// Direct sub-components in document order.
    fn children(&self) -> &[Self];

    /// First property with the given name.
    fn property(&self, name: &str) -> Option<&Self::Property>;

    /// Whether this component is a VEVENT.
    fn is_event(&self) -> bool {
        self.name() == "VEVENT"
    }

    /// ## Summary
    /// Returns the effective start of an event, reading floating values in `tz`.
    ///
    /// ## Errors
    /// Returns `DataFormatError::MissingProperty` without DTSTART, or the
    /// error from interpreting its value.
    fn event_start(&self, tz: Tz) -> DataFormatResult<DateTime<Utc>> {
        self.dtstart()?.date_time(tz)
    }

    /// ## Summary
    /// Returns the effective end of an event, reading floating values in `tz`.
    ///
    /// DTEND wins; otherwise DTSTART plus DURATION; otherwise one day after a
    /// DATE start; otherwise the start itself.
    ///
    /// ## Errors
    /// Returns a `DataFormatError` if DTSTART is needed and missing, or if any
    /// involved value cannot be interpreted.
    fn event_end(&self, tz: Tz) -> DataFormatResult<DateTime<Utc>> {
        if let Some(dtend) = self.property(names::DTEND) {
            return dtend.date_time(tz);
        }

        let dtstart = self.dtstart()?;
        let start = dtstart.date_time(tz)?;
        if let Some(duration) = self.property(names::DURATION) {
            return duration
                .duration()?
                .to_time_delta()
                .and_then(|delta| start.checked_add_signed(delta))
                .ok_or_else(|| DataFormatError::InvalidDuration {
                    property: duration.name().to_string(),
                    value: duration.value().to_string(),
                });
        }
        if dtstart.is_date() {
            return start
                .checked_add_signed(TimeDelta::days(1))
                .ok_or_else(|| DataFormatError::InvalidDate {
                    property: dtstart.name().to_string(),
                    value: dtstart.value().to_string(),
                });
        }
        Ok(start)
    }

    /// ## Summary
    /// Returns the DTSTART property.
    ///
    /// ## Errors
    /// Returns `DataFormatError::MissingProperty` if the component has none.
    fn dtstart(&self) -> DataFormatResult<&Self::Property> {
        self.property(names::DTSTART)
            .ok_or_else(|| DataFormatError::MissingProperty {
                component: self.name().to_string(),
                property: names::DTSTART.to_string(),
            })
    }
}

impl PropertyNode for Property {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn param_value(&self, name: &str) -> Option<&str> {
        self.get_param_value(name)
    }

    fn date_time(&self, tz: Tz) -> DataFormatResult<DateTime<Utc>> {
        Property::date_time(self, tz)
    }

    fn is_date(&self) -> bool {
        Property::is_date(self)
    }

    fn duration(&self) -> DataFormatResult<Duration> {
        Property::duration(self)
    }
}

impl CalendarNode for Component {
    type Property = Property;

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn property(&self, name: &str) -> Option<&Property> {
        self.get_property(name)
    }
}
