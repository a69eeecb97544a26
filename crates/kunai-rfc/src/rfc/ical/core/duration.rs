//! iCalendar DURATION value type (RFC 5545 §3.3.6).

/// Duration value (RFC 5545 §3.3.6).
///
/// iCalendar durations are either week-based (`P1W`) or day/time-based
/// (`P1DT2H30M`). Year and month designators do not exist because months
/// have variable lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    /// Whether this duration is negative.
    pub negative: bool,
    /// Number of weeks (mutually exclusive with days/hours/minutes/seconds).
    pub weeks: u32,
    /// Number of days.
    pub days: u32,
    /// Number of hours.
    pub hours: u32,
    /// Number of minutes.
    pub minutes: u32,
    /// Number of seconds.
    pub seconds: u32,
}

impl Duration {
    /// Returns the total duration as seconds.
    #[must_use]
    pub fn as_seconds(&self) -> i64 {
        let total = i64::from(self.weeks) * 7 * 24 * 3600
            + i64::from(self.days) * 24 * 3600
            + i64::from(self.hours) * 3600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);

        if self.negative { -total } else { total }
    }

    /// Returns the duration as a `chrono::TimeDelta`, `None` if it is out of
    /// range.
    #[must_use]
    pub fn to_time_delta(&self) -> Option<chrono::TimeDelta> {
        chrono::TimeDelta::try_seconds(self.as_seconds())
    }

    /// ## Summary
    /// Parses a DURATION value.
    ///
    /// Format: `[+|-]P[nW]` or `[+|-]P[nD][T[nH][nM][nS]]`
    ///
    /// Returns `None` when the text is not a valid duration.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut dur = Self::default();

        let rest = if let Some(stripped) = s.strip_prefix('-') {
            dur.negative = true;
            stripped
        } else {
            s.strip_prefix('+').unwrap_or(s)
        };
        let rest = rest.strip_prefix('P')?;

        if let Some(weeks) = rest.strip_suffix('W') {
            dur.weeks = parse_number(weeks)?;
            return Some(dur);
        }

        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (rest, None),
        };

        if !date_part.is_empty() {
            dur.days = parse_number(date_part.strip_suffix('D')?)?;
        }

        match time_part {
            Some(time) => {
                if time.is_empty() {
                    return None;
                }
                parse_time_components(time, &mut dur)?;
            }
            None if date_part.is_empty() => return None,
            None => {}
        }

        Some(dur)
    }
}

/// Parses the `nH nM nS` designators of a duration, in that order.
fn parse_time_components(time: &str, dur: &mut Duration) -> Option<()> {
    let mut remaining = time;
    let mut last_rank = 0;

    while !remaining.is_empty() {
        let end = remaining.find(|c: char| !c.is_ascii_digit())?;
        let num = parse_number(&remaining[..end])?;
        let designator = remaining[end..].chars().next()?;

        let rank = match designator {
            'H' => {
                dur.hours = num;
                1
            }
            'M' => {
                dur.minutes = num;
                2
            }
            'S' => {
                dur.seconds = num;
                3
            }
            _ => return None,
        };
        if rank <= last_rank {
            return None;
        }
        last_rank = rank;
        remaining = &remaining[end + 1..];
    }

    Some(())
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
