use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::rfc::dav::core::TimeRange;
use crate::rfc::ical::core::DataFormatResult;

use super::node::{CalendarNode, PropertyNode};

/// An open interval `(start, end)` with the zones its bounds were given in.
///
/// Floating values are read in the zone of the bound they are compared to.
#[derive(Debug, Clone, Copy)]
pub(super) struct Window {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    start_tz: Tz,
    end_tz: Tz,
}

impl Window {
    /// Returns `None` for a range that places no constraint.
    pub(super) fn new(range: &TimeRange) -> Option<Self> {
        let start = range.start?;
        Some(Self {
            start: start.with_timezone(&Utc),
            end: range.end.map(|end| end.with_timezone(&Utc)),
            start_tz: start.timezone(),
            end_tz: range.end.map_or(start.timezone(), |end| end.timezone()),
        })
    }

    fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant > self.start && self.end.is_none_or(|end| instant < end)
    }

    /// Only VEVENTs can overlap; any other component is outside the window.
    pub(super) fn overlaps_component<N: CalendarNode>(&self, comp: &N) -> DataFormatResult<bool> {
        if !comp.is_event() {
            return Ok(false);
        }

        let event_start = comp.event_start(self.start_tz)?;
        let event_end = comp.event_end(self.end_tz)?;

        let spans = event_start < self.start && self.end.is_some_and(|end| event_end > end);
        Ok(self.contains(event_start) || self.contains(event_end) || spans)
    }

    pub(super) fn contains_property<P: PropertyNode>(&self, prop: &P) -> DataFormatResult<bool> {
        Ok(self.contains(prop.date_time(self.start_tz)?))
    }
}
