
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use super::leaf::match_param_filter;
use super::*;
use crate::rfc::dav::core::{
    CalendarObject, CalendarQuery, CompFilter, ParamFilter, PropFilter, TextMatch, TimeRange,
};
use crate::rfc::ical::core::{DataFormatError, Parameter, Property};
use fixtures::{
    EVENT_ABC123, EVENT_XYZ999, NOT_ICALENDAR, TODO_ONLY, TWO_EVENTS, VCARD, event,
};

fn utc(day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Tz> {
    Tz::UTC.with_ymd_and_hms(2006, 1, day, hour, min, sec).unwrap()
}

fn object(path: &str, ics: &str) -> CalendarObject {
    CalendarObject::parse(path, ics)
}

fn events_where(filter: CompFilter) -> CalendarQuery {
    CalendarQuery::new(CompFilter::vcalendar().with_comp_filter(filter))
}

fn vevent() -> CompFilter {
    CompFilter::new("VEVENT")
}

fn in_range(start: DateTime<Tz>, end: DateTime<Tz>) -> CalendarQuery {
    events_where(vevent().with_time_range(TimeRange::new(start, end)))
}

fn is_match(query: &CalendarQuery, ics: &str) -> bool {
    matches(&query.comp_filter, &object("test.ics", ics)).unwrap()
}

#[test]
fn absent_data_never_matches() {
    let object = object("broken.ics", NOT_ICALENDAR);
    assert!(object.data.is_none());

    assert!(!matches(&CompFilter::vcalendar(), &object).unwrap());
    assert!(!matches(&CompFilter::vcalendar().not_defined(), &object).unwrap());
    assert!(!matches(&CompFilter::new("VCARD"), &self::object("card.ics", VCARD)).unwrap());
}

#[test]
fn filter_without_query_returns_input() {
    let objects = vec![
        object("a.ics", EVENT_ABC123),
        object("b.ics", NOT_ICALENDAR),
        object("c.ics", EVENT_XYZ999),
    ];
    assert_eq!(filter(None, objects.clone()).unwrap(), objects);
    assert!(filter(None, Vec::new()).unwrap().is_empty());
}

#[test]
fn filter_on_empty_input() {
    let query = events_where(vevent());
    assert!(filter(Some(&query), Vec::new()).unwrap().is_empty());
}

#[test_log::test]
fn filter_keeps_matches_in_order() {
    let objects = vec![
        object("a.ics", EVENT_ABC123),
        object("todo.ics", TODO_ONLY),
        object("broken.ics", NOT_ICALENDAR),
        object("c.ics", EVENT_XYZ999),
    ];

    let matched = filter(Some(&events_where(vevent())), objects).unwrap();
    let paths: Vec<_> = matched.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, ["a.ics", "c.ics"]);
}

#[test]
fn root_name_mismatch_yields_is_not_defined() {
    let object = object("a.ics", EVENT_ABC123);
    assert!(!matches(&CompFilter::new("VTODO"), &object).unwrap());
    assert!(matches(&CompFilter::new("VTODO").not_defined(), &object).unwrap());
}

#[test]
fn empty_root_filter_matches_any_calendar() {
    assert!(matches(&CompFilter::vcalendar(), &object("t.ics", TODO_ONLY)).unwrap());
}

#[test]
fn comp_filter_requires_a_matching_child() {
    assert!(is_match(&events_where(vevent()), EVENT_ABC123));
    assert!(!is_match(&events_where(vevent()), TODO_ONLY));
    assert!(is_match(&events_where(CompFilter::new("VTODO")), TODO_ONLY));
    assert!(is_match(&events_where(vevent().not_defined()), TODO_ONLY));
}

#[test]
fn any_matching_child_satisfies_comp_filter() {
    // Only the second VEVENT carries this UID.
    let second_uid = events_where(
        vevent().with_prop_filter(
            PropFilter::new("UID").with_text_match(TextMatch::equals("second")),
        ),
    );
    assert!(is_match(&second_uid, TWO_EVENTS));

    // Only the second VEVENT falls in this range.
    let late_january = in_range(utc(15, 0, 0, 0), utc(25, 0, 0, 0));
    assert!(is_match(&late_january, TWO_EVENTS));

    // Only the second VEVENT has an alarm.
    let with_alarm = events_where(vevent().with_comp_filter(CompFilter::new("VALARM")));
    assert!(is_match(&with_alarm, TWO_EVENTS));

    let neither = in_range(utc(10, 0, 0, 0), utc(15, 0, 0, 0));
    assert!(!is_match(&neither, TWO_EVENTS));
}

#[test]
fn is_not_defined_fails_when_any_child_is_present() {
    // Neither VEVENT satisfies the nested filter, yet both count as present.
    let no_third_uid = events_where(
        vevent()
            .not_defined()
            .with_prop_filter(
                PropFilter::new("UID").with_text_match(TextMatch::equals("third")),
            ),
    );
    assert!(!is_match(&no_third_uid, TWO_EVENTS));

    // The first VEVENT has no alarm, which is enough although the second has one.
    let no_alarm = events_where(
        vevent().with_comp_filter(CompFilter::new("VALARM").not_defined()),
    );
    assert!(is_match(&no_alarm, TWO_EVENTS));

    let no_todo = events_where(CompFilter::new("VTODO").not_defined());
    assert!(is_match(&no_todo, TWO_EVENTS));
}

#[test]
fn comp_filter_names_are_exact() {
    assert!(!is_match(&events_where(CompFilter::new("vevent")), EVENT_ABC123));
}

#[test]
fn uid_text_match() {
    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("UID").with_text_match(TextMatch::equals("abc123")),
        ),
    );
    assert!(is_match(&query, EVENT_ABC123));
    assert!(!is_match(&query, EVENT_XYZ999));
}

#[test]
fn negated_text_match_inverts_result() {
    for ics in [EVENT_ABC123, EVENT_XYZ999] {
        let plain = events_where(
            vevent().with_prop_filter(
                PropFilter::new("UID").with_text_match(TextMatch::equals("abc123")),
            ),
        );
        let negated = events_where(
            vevent().with_prop_filter(
                PropFilter::new("UID").with_text_match(TextMatch::equals("abc123").negate()),
            ),
        );
        assert_eq!(is_match(&plain, ics), !is_match(&negated, ics));
    }
}

#[test]
fn text_match_is_literal_equality() {
    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("SUMMARY").with_text_match(TextMatch::equals("team meeting")),
        ),
    );
    assert!(!is_match(&query, EVENT_ABC123));

    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("SUMMARY").with_text_match(TextMatch::equals("Team")),
        ),
    );
    assert!(!is_match(&query, EVENT_ABC123));
}

#[test]
fn prop_filter_is_not_defined() {
    let location = events_where(
        vevent().with_prop_filter(PropFilter::new("LOCATION").not_defined()),
    );
    assert!(is_match(&location, EVENT_ABC123));

    let uid = events_where(
        vevent().with_prop_filter(PropFilter::new("UID").not_defined()),
    );
    assert!(!is_match(&uid, EVENT_ABC123));
}

#[test]
fn missing_property_fails_presence_test() {
    let query = events_where(vevent().with_prop_filter(PropFilter::new("LOCATION")));
    assert!(!is_match(&query, EVENT_ABC123));
}

#[test]
fn valarm_is_not_defined() {
    let query = events_where(
        vevent().with_comp_filter(CompFilter::new("VALARM").not_defined()),
    );
    assert!(is_match(&query, EVENT_ABC123));
    assert!(!is_match(&query, EVENT_XYZ999));
}

#[test]
fn nested_filters_are_all_required() {
    let query = events_where(
        vevent()
            .with_comp_filter(CompFilter::new("VALARM"))
            .with_prop_filter(
                PropFilter::new("UID").with_text_match(TextMatch::equals("abc123")),
            ),
    );
    assert!(!is_match(&query, EVENT_ABC123));
    assert!(!is_match(&query, EVENT_XYZ999));
}

#[test]
fn role_is_not_defined_param_filter() {
    let role = ParamFilter::new("ROLE").not_defined();

    let without_role = Property::new("ATTENDEE", "mailto:cyrus@example.com");
    assert!(match_param_filter(&role, &without_role));

    let chair = Property::with_params(
        "ATTENDEE",
        vec![Parameter::new("ROLE", "CHAIR")],
        "mailto:lisa@example.com",
    );
    assert!(!match_param_filter(&role, &chair));
}

#[test]
fn param_filter_text_match() {
    let attendee = Property::with_params(
        "ATTENDEE",
        vec![Parameter::new("PARTSTAT", "NEEDS-ACTION")],
        "mailto:cyrus@example.com",
    );

    let needs_action =
        ParamFilter::new("PARTSTAT").with_text_match(TextMatch::equals("NEEDS-ACTION"));
    assert!(match_param_filter(&needs_action, &attendee));

    let accepted = ParamFilter::new("PARTSTAT").with_text_match(TextMatch::equals("ACCEPTED"));
    assert!(!match_param_filter(&accepted, &attendee));

    let not_accepted = accepted.with_text_match(TextMatch::equals("ACCEPTED").negate());
    assert!(match_param_filter(&not_accepted, &attendee));

    assert!(match_param_filter(&ParamFilter::new("PARTSTAT"), &attendee));
    assert!(!match_param_filter(&ParamFilter::new("ROLE"), &attendee));
}

#[test]
fn empty_param_value_counts_as_absent() {
    let attendee = Property::with_params(
        "ATTENDEE",
        vec![Parameter::new("ROLE", "")],
        "mailto:cyrus@example.com",
    );

    assert!(match_param_filter(&ParamFilter::new("ROLE").not_defined(), &attendee));
    assert!(!match_param_filter(&ParamFilter::new("ROLE"), &attendee));
}

#[test]
fn param_filters_checked_after_text_match() {
    // The first ATTENDEE of EVENT_ABC123 carries no ROLE.
    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("ATTENDEE")
                .with_text_match(TextMatch::equals("mailto:cyrus@example.com"))
                .with_param_filter(ParamFilter::new("ROLE").not_defined())
                .with_param_filter(
                    ParamFilter::new("PARTSTAT")
                        .with_text_match(TextMatch::equals("NEEDS-ACTION")),
                ),
        ),
    );
    assert!(is_match(&query, EVENT_ABC123));

    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("ATTENDEE")
                .with_text_match(TextMatch::equals("mailto:lisa@example.com"))
                .with_param_filter(ParamFilter::new("ROLE").not_defined()),
        ),
    );
    assert!(!is_match(&query, EVENT_XYZ999));
}

#[test]
fn presence_only_prop_filter_ignores_param_filters() {
    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("ATTENDEE").with_param_filter(
                ParamFilter::new("ROLE").with_text_match(TextMatch::equals("NOBODY")),
            ),
        ),
    );
    assert!(is_match(&query, EVENT_ABC123));
    assert!(is_match(&query, EVENT_XYZ999));
}

#[test_log::test]
fn time_range_boundaries_are_open() {
    let query = in_range(utc(4, 9, 0, 0), utc(4, 10, 0, 0));

    let at_end = event(&["DTSTART:20060104T100000Z", "DTEND:20060104T110000Z"]);
    assert!(!is_match(&query, &at_end));

    let second_before = event(&["DTSTART:20060104T095959Z", "DTEND:20060104T110000Z"]);
    assert!(is_match(&query, &second_before));

    let ends_at_start = event(&["DTSTART:20060104T080000Z", "DTEND:20060104T090000Z"]);
    assert!(!is_match(&query, &ends_at_start));

    let ends_after_start = event(&["DTSTART:20060104T080000Z", "DTEND:20060104T090001Z"]);
    assert!(is_match(&query, &ends_after_start));
}

#[test]
fn event_spanning_range_matches() {
    let query = in_range(utc(4, 9, 0, 0), utc(4, 10, 0, 0));
    let spanning = event(&["DTSTART:20060104T080000Z", "DTEND:20060104T120000Z"]);
    assert!(is_match(&query, &spanning));

    let exact = event(&["DTSTART:20060104T090000Z", "DTEND:20060104T100000Z"]);
    assert!(!is_match(&query, &exact));
}

#[test]
fn time_range_selects_events() {
    let objects = vec![object("a.ics", EVENT_ABC123), object("c.ics", EVENT_XYZ999)];
    let query = in_range(utc(4, 0, 0, 0), utc(5, 0, 0, 0));

    let matched = filter(Some(&query), objects).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].path, "a.ics");
}

#[test]
fn open_ended_time_range() {
    // A range without an end is unbounded above rather than ending at a zero instant,
    // so any event still running after the range start matches.
    let query = events_where(vevent().with_time_range(TimeRange::starting(utc(4, 9, 0, 0))));
    assert!(is_match(&query, EVENT_ABC123));
    assert!(is_match(&query, EVENT_XYZ999));

    let before = event(&["DTSTART:20060104T070000Z", "DTEND:20060104T080000Z"]);
    assert!(!is_match(&query, &before));
}

#[test]
fn range_without_start_is_unconstrained() {
    let query = events_where(vevent().with_time_range(TimeRange::until(utc(1, 0, 0, 0))));
    assert!(is_match(&query, EVENT_ABC123));

    // Not consulted, so a missing DTSTART is no error.
    assert!(is_match(&query, &event(&["SUMMARY:No start"])));
}

#[test]
fn time_range_on_other_components_never_matches() {
    let january = TimeRange::new(utc(1, 0, 0, 0), utc(31, 0, 0, 0));
    let query = events_where(CompFilter::new("VTODO").with_time_range(january));
    assert!(!is_match(&query, TODO_ONLY));
}

#[test]
fn end_derived_from_duration() {
    let query = in_range(utc(4, 14, 0, 0), utc(4, 16, 0, 0));

    let with_duration = event(&["DTSTART:20060104T100000Z", "DURATION:PT5H"]);
    assert!(is_match(&query, &with_duration));

    let instant = event(&["DTSTART:20060104T100000Z"]);
    assert!(!is_match(&query, &instant));
}

#[test]
fn all_day_event_lasts_one_day() {
    let query = in_range(utc(4, 12, 0, 0), utc(4, 13, 0, 0));

    let all_day = event(&["DTSTART;VALUE=DATE:20060104"]);
    assert!(is_match(&query, &all_day));

    let next_day = in_range(utc(5, 0, 0, 0), utc(5, 1, 0, 0));
    assert!(!is_match(&next_day, &all_day));
}

#[test]
fn floating_time_read_in_range_zone() {
    let floating = event(&["DTSTART:20060104T100000", "DTEND:20060104T103000"]);
    let query = in_range(utc(4, 14, 0, 0), utc(4, 16, 0, 0));
    assert!(!is_match(&query, &floating));

    let new_york: Tz = "America/New_York".parse().unwrap();
    let query = query.with_timezone(new_york);
    assert!(is_match(&query, &floating));
}

#[test]
fn tzid_overrides_range_zone() {
    let berlin = event(&[
        "DTSTART;TZID=Europe/Berlin:20060104T160000",
        "DTEND;TZID=Europe/Berlin:20060104T163000",
    ]);
    let query = in_range(utc(4, 14, 0, 0), utc(4, 16, 0, 0));
    assert!(is_match(&query, &berlin));

    let new_york: Tz = "America/New_York".parse().unwrap();
    assert!(is_match(&query.with_timezone(new_york), &berlin));
}

#[test]
fn property_time_range() {
    // DTSTAMP of EVENT_ABC123 is 20060104T120000Z.
    let dtstamp_within = |range: TimeRange| {
        let query = events_where(
            vevent().with_prop_filter(PropFilter::new("DTSTAMP").with_time_range(range)),
        );
        is_match(&query, EVENT_ABC123)
    };

    assert!(dtstamp_within(TimeRange::new(utc(4, 9, 0, 0), utc(4, 13, 0, 0))));
    assert!(!dtstamp_within(TimeRange::new(utc(4, 12, 0, 0), utc(4, 13, 0, 0))));
    assert!(!dtstamp_within(TimeRange::new(utc(4, 9, 0, 0), utc(4, 12, 0, 0))));
    assert!(dtstamp_within(TimeRange::starting(utc(4, 11, 59, 59))));
}

#[test]
fn property_time_range_takes_precedence_over_text_match() {
    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("DTSTAMP")
                .with_time_range(TimeRange::new(utc(4, 9, 0, 0), utc(4, 13, 0, 0)))
                .with_text_match(TextMatch::equals("does not match")),
        ),
    );
    assert!(is_match(&query, EVENT_ABC123));
}

#[test]
fn property_time_range_then_param_filters() {
    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("DTSTART")
                .with_time_range(TimeRange::new(utc(4, 9, 0, 0), utc(4, 13, 0, 0)))
                .with_param_filter(ParamFilter::new("TZID")),
        ),
    );
    assert!(!is_match(&query, EVENT_ABC123));
    assert!(is_match(&query, &event(&["DTSTART;TZID=Europe/London:20060104T100000"])));
}

#[test]
fn missing_dtstart_is_an_error() {
    let query = in_range(utc(4, 9, 0, 0), utc(4, 10, 0, 0));
    let object = object("x.ics", &event(&["SUMMARY:No start"]));

    let err = matches(&query.comp_filter, &object).unwrap_err();
    assert!(matches!(
        err,
        DataFormatError::MissingProperty { ref property, .. } if property == "DTSTART"
    ));
}

#[test]
fn malformed_values_are_errors() {
    let query = in_range(utc(4, 9, 0, 0), utc(4, 10, 0, 0));

    let bad_start = object("x.ics", &event(&["DTSTART:2006-01-04"]));
    assert!(matches!(
        matches(&query.comp_filter, &bad_start),
        Err(DataFormatError::InvalidDateTime { .. })
    ));

    let bad_duration = object(
        "x.ics",
        &event(&["DTSTART:20060104T100000Z", "DURATION:5 hours"]),
    );
    assert!(matches!(
        matches(&query.comp_filter, &bad_duration),
        Err(DataFormatError::InvalidDuration { .. })
    ));

    let bad_zone = object(
        "x.ics",
        &event(&["DTSTART;TZID=Mars/Olympus:20060104T100000"]),
    );
    assert!(matches!(
        matches(&query.comp_filter, &bad_zone),
        Err(DataFormatError::Conversion { .. })
    ));

    let period = object(
        "x.ics",
        &event(&["DTSTART;VALUE=PERIOD:20060104T100000Z/PT1H"]),
    );
    assert!(matches!(
        matches(&query.comp_filter, &period),
        Err(DataFormatError::UnsupportedValueType { .. })
    ));
}

#[test]
fn oversized_duration_is_an_error() {
    let query = in_range(utc(4, 9, 0, 0), utc(4, 10, 0, 0));
    let object = object(
        "x.ics",
        &event(&["DTSTART:20060104T100000Z", "DURATION:P4000000000W"]),
    );

    let err = matches(&query.comp_filter, &object).unwrap_err();
    assert!(matches!(
        err,
        DataFormatError::InvalidDuration { ref value, .. } if value == "P4000000000W"
    ));
}

#[test_log::test]
fn error_aborts_whole_batch() {
    let objects = vec![
        object("a.ics", EVENT_ABC123),
        object("bad.ics", &event(&["DTSTART:not-a-date"])),
        object("c.ics", EVENT_XYZ999),
    ];
    let query = in_range(utc(1, 0, 0, 0), utc(31, 0, 0, 0));

    assert!(filter(Some(&query), objects).is_err());
}

#[test]
fn unneeded_values_are_not_interpreted() {
    // The text match rejects the event before its time range would be tested.
    let query = events_where(
        vevent()
            .with_prop_filter(PropFilter::new("UID").with_text_match(TextMatch::equals("other")))
            .with_prop_filter(
                PropFilter::new("DTSTART").with_time_range(TimeRange::starting(utc(1, 0, 0, 0))),
            ),
    );
    assert!(!is_match(&query, &event(&["DTSTART:garbage"])));
}

#[test]
fn mock_tree_matches() {
    use mock::{MockComponent, MockProperty};

    let tree = MockComponent::new("VCALENDAR").with_child(
        MockComponent::new("VEVENT")
            .with_property(MockProperty::new("UID", "abc123"))
            .with_property(MockProperty::at("DTSTART", utc(4, 10, 0, 0)))
            .with_property(MockProperty::new("DURATION", "PT1H")),
    );

    let query = in_range(utc(4, 10, 30, 0), utc(4, 12, 0, 0));
    assert!(matches_node(&query.comp_filter, &tree).unwrap());

    let query = in_range(utc(4, 11, 0, 0), utc(4, 12, 0, 0));
    assert!(!matches_node(&query.comp_filter, &tree).unwrap());

    let query = events_where(
        vevent().with_prop_filter(
            PropFilter::new("UID").with_text_match(TextMatch::equals("abc123")),
        ),
    );
    assert!(matches_node(&query.comp_filter, &tree).unwrap());
}

#[test]
fn mock_tree_errors_propagate() {
    use mock::{MockComponent, MockProperty};

    let tree = MockComponent::new("VCALENDAR").with_child(
        MockComponent::new("VEVENT").with_property(MockProperty::new("DTSTART", "unreadable")),
    );

    let query = in_range(utc(4, 10, 0, 0), utc(4, 12, 0, 0));
    assert!(matches_node(&query.comp_filter, &tree).is_err());
}
