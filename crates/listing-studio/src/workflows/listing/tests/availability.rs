use super::common::*;
use crate::workflows::listing::availability::{
    AvailabilityError, AvailabilityPicker, DateRangeSelection, DayMarking, TimeField, TimeRange,
    MAX_RANGE_DAYS,
};
use chrono::NaiveDate;

#[test]
fn ordered_taps_complete_the_range() {
    let range = DateRangeSelection::default()
        .tap(day(1, 10))
        .and_then(|range| range.tap(day(1, 15)))
        .expect("ordered taps accepted");

    assert_eq!(
        range,
        DateRangeSelection::RangeComplete {
            start: day(1, 10),
            end: day(1, 15)
        }
    );
}

#[test]
fn same_day_tap_completes_a_single_day_range() {
    let range = DateRangeSelection::StartPicked { start: day(3, 1) }
        .tap(day(3, 1))
        .expect("same day accepted");

    assert_eq!(range.days_in_range(), vec![day(3, 1)]);
    assert_eq!(range.marking(day(3, 1)), DayMarking::Start);
}

#[test]
fn earlier_end_tap_is_rejected_and_start_kept() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.tap_day(day(1, 10)).expect("start accepted");

    let err = picker.tap_day(day(1, 8)).expect_err("earlier day rejected");
    assert_eq!(
        err,
        AvailabilityError::EndDateBeforeStart {
            start: day(1, 10),
            tapped: day(1, 8)
        }
    );
    assert!(err.to_string().starts_with("End date cannot be before start date"));
    assert_eq!(
        picker.range(),
        DateRangeSelection::StartPicked { start: day(1, 10) }
    );
}

#[test]
fn range_may_span_a_full_leap_year() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date");

    let range = DateRangeSelection::StartPicked { start }
        .tap(end)
        .expect("366 days accepted");

    assert_eq!(range.day_count(), MAX_RANGE_DAYS);
}

#[test]
fn overlong_range_is_rejected_and_start_kept() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    let start = NaiveDate::from_ymd_opt(1, 1, 1).expect("valid date");
    let far = NaiveDate::from_ymd_opt(9999, 12, 31).expect("valid date");
    picker.tap_day(start).expect("start accepted");

    let err = picker.tap_day(far).expect_err("overlong range rejected");
    assert_eq!(err, AvailabilityError::RangeTooLong { start, tapped: far });
    assert!(err.to_string().contains("366 days"));
    assert_eq!(picker.range(), DateRangeSelection::StartPicked { start });
    assert_eq!(picker.range().day_count(), 0);

    picker
        .tap_day(NaiveDate::from_ymd_opt(2, 1, 2).expect("valid date"))
        .expect_err("one day past the limit rejected");
}

#[test]
fn tapping_a_complete_range_restarts_selection() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.tap_day(day(1, 10)).expect("start");
    picker.tap_day(day(1, 15)).expect("end");

    let restarted = picker.tap_day(day(1, 5)).expect("restart accepted");
    assert_eq!(restarted, DateRangeSelection::StartPicked { start: day(1, 5) });
    assert_eq!(restarted.end_date(), None);
    assert!(restarted.days_in_range().is_empty());
}

#[test]
fn january_range_marks_six_days_then_clears() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.tap_day(day(1, 10)).expect("start");
    picker.tap_day(day(1, 15)).expect("end");

    let marked = picker.range().days_in_range();
    assert_eq!(marked.len(), 6);
    assert_eq!(picker.range().day_count(), 6);
    assert_eq!(marked.first(), Some(&day(1, 10)));
    assert_eq!(marked.last(), Some(&day(1, 15)));
    assert!(picker.range().contains(day(1, 12)));
    assert!(!picker.range().contains(day(1, 16)));
    assert_eq!(picker.marking(day(1, 10)), DayMarking::Start);
    assert_eq!(picker.marking(day(1, 13)), DayMarking::InRange);
    assert_eq!(picker.marking(day(1, 15)), DayMarking::End);
    assert_eq!(picker.marking(day(1, 9)), DayMarking::Unmarked);

    picker.tap_day(day(1, 5)).expect("restart");
    assert!(picker.range().days_in_range().is_empty());
    assert!(!picker.range().contains(day(1, 12)));
}

#[test]
fn times_default_to_the_opening_minute() {
    let opened = opened_at().time();
    let times = TimeRange::opened_at(opened);

    assert_eq!(times.start(), time(9, 30));
    assert_eq!(times.end(), time(9, 30));
}

#[test]
fn earlier_end_time_is_a_no_op() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.set_start_time(time(10, 0));
    picker.set_end_time(time(12, 0)).expect("later end accepted");

    let err = picker
        .set_end_time(time(9, 45))
        .expect_err("earlier end rejected");
    assert!(matches!(err, AvailabilityError::EndTimeBeforeStart { .. }));
    assert_eq!(picker.times().end(), time(12, 0));
}

#[test]
fn start_time_is_always_accepted() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.set_end_time(time(10, 0)).expect("end accepted");
    picker.set_start_time(time(11, 0));

    assert_eq!(picker.times().start(), time(11, 0));
    assert_eq!(picker.times().end(), time(10, 0));
}

#[test]
fn confirming_a_picker_applies_and_closes_it() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.open_time_picker(TimeField::End);

    assert_eq!(picker.confirm_time(time(15, 30)), Ok(TimeField::End));
    assert_eq!(picker.times().end(), time(15, 30));
    assert_eq!(picker.open_picker(), None);
}

#[test]
fn rejected_confirmation_still_closes_the_dialog() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.open_time_picker(TimeField::End);

    assert!(picker.confirm_time(time(8, 0)).is_err());
    assert_eq!(picker.times().end(), time(9, 0));
    assert_eq!(picker.open_picker(), None);
}

#[test]
fn dismissing_a_picker_changes_nothing() {
    let mut picker = AvailabilityPicker::new(time(9, 0));
    picker.open_time_picker(TimeField::Start);
    picker.dismiss_time_picker();

    assert_eq!(picker.open_picker(), None);
    assert_eq!(picker.times().start(), time(9, 0));
    assert_eq!(
        picker.confirm_time(time(11, 0)),
        Err(AvailabilityError::NoPickerOpen)
    );
}
