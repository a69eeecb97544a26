//! `calendar-query` REPORT filter types (RFC 4791 §9.7).

use chrono::DateTime;
use chrono_tz::Tz;

/// `CalDAV` `calendar-query` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarQuery {
    /// Root component filter, normally targeting VCALENDAR.
    pub comp_filter: CompFilter,
}

impl CalendarQuery {
    /// Creates a query with the given root filter.
    #[must_use]
    pub fn new(comp_filter: CompFilter) -> Self {
        Self { comp_filter }
    }

    /// ## Summary
    /// Re-expresses every time range in the filter tree in `tz`.
    ///
    /// The instants are unchanged; floating values compared against the
    /// ranges are then read as wall-clock time in `tz`.
    #[must_use]
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.comp_filter.set_timezone(tz);
        self
    }
}

/// Component filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompFilter {
    /// Component name.
    pub name: String,
    /// Is-not-defined test.
    pub is_not_defined: bool,
    /// Time range filter.
    pub time_range: Option<TimeRange>,
    /// Nested component filters.
    pub comp_filters: Vec<CompFilter>,
    /// Property filters.
    pub prop_filters: Vec<PropFilter>,
}

impl CompFilter {
    /// Creates a filter for a component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_not_defined: false,
            time_range: None,
            comp_filters: Vec::new(),
            prop_filters: Vec::new(),
        }
    }

    /// Creates a filter for VCALENDAR.
    #[must_use]
    pub fn vcalendar() -> Self {
        Self::new("VCALENDAR")
    }

    /// Sets is-not-defined.
    #[must_use]
    pub fn not_defined(mut self) -> Self {
        self.is_not_defined = true;
        self
    }

    /// Sets time range.
    #[must_use]
    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    /// Adds a nested component filter.
    #[must_use]
    pub fn with_comp_filter(mut self, filter: CompFilter) -> Self {
        self.comp_filters.push(filter);
        self
    }

    /// Adds a property filter.
    #[must_use]
    pub fn with_prop_filter(mut self, filter: PropFilter) -> Self {
        self.prop_filters.push(filter);
        self
    }

    fn set_timezone(&mut self, tz: Tz) {
        if let Some(range) = self.time_range.take() {
            self.time_range = Some(range.with_timezone(tz));
        }
        for comp_filter in &mut self.comp_filters {
            comp_filter.set_timezone(tz);
        }
        for prop_filter in &mut self.prop_filters {
            if let Some(range) = prop_filter.time_range.take() {
                prop_filter.time_range = Some(range.with_timezone(tz));
            }
        }
    }
}

/// Property filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropFilter {
    /// Property name.
    pub name: String,
    /// Is-not-defined test.
    pub is_not_defined: bool,
    /// Time range filter (for date properties). Takes precedence over
    /// `text_match`.
    pub time_range: Option<TimeRange>,
    /// Text match filter.
    pub text_match: Option<TextMatch>,
    /// Parameter filters.
    pub param_filters: Vec<ParamFilter>,
}

impl PropFilter {
    /// Creates a property filter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_not_defined: false,
            time_range: None,
            text_match: None,
            param_filters: Vec::new(),
        }
    }

    /// Sets is-not-defined test.
    #[must_use]
    pub fn not_defined(mut self) -> Self {
        self.is_not_defined = true;
        self
    }

    /// Sets time range.
    #[must_use]
    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    /// Sets text match.
    #[must_use]
    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = Some(text_match);
        self
    }

    /// Adds a parameter filter.
    #[must_use]
    pub fn with_param_filter(mut self, filter: ParamFilter) -> Self {
        self.param_filters.push(filter);
        self
    }
}

/// Parameter filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamFilter {
    /// Parameter name.
    pub name: String,
    /// Is-not-defined test.
    pub is_not_defined: bool,
    /// Text match.
    pub text_match: Option<TextMatch>,
}

impl ParamFilter {
    /// Creates a parameter filter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_not_defined: false,
            text_match: None,
        }
    }

    /// Sets is-not-defined test.
    #[must_use]
    pub fn not_defined(mut self) -> Self {
        self.is_not_defined = true;
        self
    }

    /// Sets text match.
    #[must_use]
    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = Some(text_match);
        self
    }
}

/// Text matching criteria.
///
/// Matching is literal equality; the collation is recorded but not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// The text to match.
    pub text: String,
    /// Collation named in the request.
    pub collation: Option<String>,
    /// Negate the match.
    pub negate: bool,
}

impl TextMatch {
    /// Creates an equality match.
    #[must_use]
    pub fn equals(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            collation: None,
            negate: false,
        }
    }

    /// Negates the match.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Sets collation.
    #[must_use]
    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }
}

/// Time range for filtering.
///
/// Both bounds are exclusive when matching. A range without `start` places no
/// constraint; a range without `end` is unbounded above. The zone of each
/// bound is the zone floating values are read in when compared to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    /// Start of range.
    pub start: Option<DateTime<Tz>>,
    /// End of range.
    pub end: Option<DateTime<Tz>>,
}

impl TimeRange {
    /// Creates a time range with start and end.
    #[must_use]
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Creates a range starting from a time.
    #[must_use]
    pub fn starting(start: DateTime<Tz>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Creates a range ending at a time.
    #[must_use]
    pub fn until(end: DateTime<Tz>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Re-expresses both bounds in `tz`.
    #[must_use]
    pub fn with_timezone(self, tz: Tz) -> Self {
        Self {
            start: self.start.map(|dt| dt.with_timezone(&tz)),
            end: self.end.map(|dt| dt.with_timezone(&tz)),
        }
    }
}
