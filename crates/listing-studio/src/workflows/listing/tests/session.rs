use super::common::*;
use crate::workflows::listing::availability::{AvailabilityError, DateRangeSelection, TimeField};
use crate::workflows::listing::geolocation::{locate_address, GeolocationError};
use crate::workflows::listing::navigation::{ListingStep, NavigationCommand};
use crate::workflows::listing::publisher::PublishError;
use crate::workflows::listing::session::{ListingSession, SessionError};
use crate::workflows::listing::AddressField;

#[test]
fn continue_requires_a_category() {
    let mut session = ListingSession::new(selector());

    match session.continue_to_details(opened_at()) {
        Err(SessionError::NoCategorySelected) => {}
        other => panic!("expected missing category, got {other:?}"),
    }
    assert_eq!(session.step(), ListingStep::Categories);
}

#[test]
fn continue_seeds_times_from_the_clock() {
    let session = details_session();

    assert_eq!(session.step(), ListingStep::Details);
    let times = session
        .details()
        .expect("details form present")
        .availability
        .times();
    assert_eq!(times.start(), time(9, 30));
    assert_eq!(times.end(), time(9, 30));
}

#[test]
fn details_actions_are_rejected_on_the_category_step() {
    let mut session = ListingSession::new(selector());

    match session.tap_day(day(1, 10)) {
        Err(SessionError::WrongStep { expected, actual }) => {
            assert_eq!(expected, ListingStep::Details);
            assert_eq!(actual, ListingStep::Categories);
        }
        other => panic!("expected wrong step, got {other:?}"),
    }
}

#[test]
fn back_from_details_discards_the_form_but_keeps_categories() {
    let mut session = details_session();
    session
        .set_address_field(AddressField::City, "Ames")
        .expect("city set");

    assert_eq!(session.back(), NavigationCommand::Back);
    assert_eq!(session.step(), ListingStep::Categories);
    assert!(session.details().is_none());
    assert!(session
        .selector()
        .state()
        .selected_subcategories()
        .contains("Tables"));

    assert_eq!(session.back(), NavigationCommand::Home);
}

#[test]
fn rejected_day_tap_reports_an_invalid_date_notice() {
    let mut session = details_session();
    session.tap_day(day(1, 10)).expect("start");

    let err = session.tap_day(day(1, 9)).expect_err("earlier rejected");
    let notice = err.notice();
    assert_eq!(notice.title, "Invalid Date");
    assert!(notice.message.contains("End date cannot be before start date"));
    assert_eq!(
        session.details().expect("details").availability.range(),
        DateRangeSelection::StartPicked { start: day(1, 10) }
    );
}

#[test]
fn unknown_selections_have_distinct_notices() {
    let mut session = ListingSession::new(selector());

    let err = session
        .toggle_category(&category_id("99"))
        .expect_err("unknown category rejected");
    assert_eq!(err.notice().title, "Unknown Category");

    let err = session
        .toggle_subcategory("Hovercraft")
        .expect_err("unknown subcategory rejected");
    assert_eq!(err.notice().title, "Unknown Subcategory");
    assert!(err.notice().message.contains("Hovercraft"));
}

#[test]
fn time_picker_flow_runs_through_the_session() {
    let mut session = details_session();
    session.open_time_picker(TimeField::Start).expect("open start");
    session.confirm_time(time(10, 0)).expect("start confirmed");
    session.open_time_picker(TimeField::End).expect("open end");

    match session.confirm_time(time(9, 0)) {
        Err(SessionError::Availability(AvailabilityError::EndTimeBeforeStart { .. })) => {}
        other => panic!("expected end time rejection, got {other:?}"),
    }

    let availability = &session.details().expect("details").availability;
    assert_eq!(availability.times().start(), time(10, 0));
    assert_eq!(availability.times().end(), time(9, 30));
}

#[test]
fn failed_lookup_leaves_address_untouched() {
    let mut session = details_session();
    session
        .set_address_field(AddressField::Street, "12 Elm St")
        .expect("street set");

    let gateway = ScriptedGeolocation::denied();
    let err = session
        .locate_address(&gateway)
        .expect_err("denied lookup fails");

    assert!(matches!(
        err,
        SessionError::Geolocation(GeolocationError::PermissionDenied)
    ));
    assert_eq!(err.notice().title, "Permission Denied");
    assert_eq!(
        session.details().expect("details").address.street,
        "12 Elm St"
    );
}

#[test]
fn later_lookup_result_wins() {
    let mut session = details_session();
    let gateway = ScriptedGeolocation::granted(vec![
        geocoded("1 First Ave", "Ames"),
        geocoded("2 Second Ave", "Ankeny"),
    ]);

    let first = locate_address(&gateway);
    let second = locate_address(&gateway);
    session.apply_address_lookup(second).expect("second applies");
    session.apply_address_lookup(first).expect("first applies last");

    let address = &session.details().expect("details").address;
    assert_eq!(address.street, "1 First Ave");
    assert_eq!(address.city, "Ames");
}

#[test]
fn draft_carries_categories_and_details() {
    let mut session = details_session();
    session.set_title("Oak dining table").expect("title");
    session.tap_day(day(1, 10)).expect("start");
    session.tap_day(day(1, 15)).expect("end");

    let draft = session.draft();
    assert_eq!(draft.categories, vec![furniture_id()]);
    assert_eq!(draft.subcategories, vec!["Tables".to_string()]);
    assert_eq!(draft.title, "Oak dining table");
    assert_eq!(draft.start_date, Some(day(1, 10)));
    assert_eq!(draft.end_date, Some(day(1, 15)));
    assert_eq!(draft.start_time, Some(time(9, 30)));
}

#[test]
fn publish_aggregates_missing_fields() {
    let mut session = details_session();
    let (publisher, submissions) = publisher();
    session.tap_day(day(1, 10)).expect("start");

    let err = session.publish(&publisher).expect_err("incomplete draft");
    match &err {
        SessionError::Publish(PublishError::MissingFields(missing)) => assert_eq!(
            missing.labels(),
            vec!["Address", "Street Address", "City", "State", "ZIP Code", "End Date"]
        ),
        other => panic!("expected missing fields, got {other:?}"),
    }
    assert_eq!(err.notice().title, "Missing Fields");
    assert!(submissions.drafts().is_empty());
    assert_eq!(session.step(), ListingStep::Details);
}

#[test]
fn successful_publish_completes_the_session() {
    let mut session = details_session();
    let (publisher, submissions) = publisher();
    let address = complete_address();
    for (field, value) in [
        (AddressField::Street, &address.street),
        (AddressField::City, &address.city),
        (AddressField::State, &address.state),
        (AddressField::Zip, &address.zip),
    ] {
        session
            .set_address_field(field, value.as_str())
            .expect("address field set");
    }
    session.tap_day(day(1, 10)).expect("start");
    session.tap_day(day(1, 15)).expect("end");
    session.set_end_time(time(17, 0)).expect("end time");

    let (acknowledgement, navigation) = session.publish(&publisher).expect("publish succeeds");

    assert_eq!(navigation, NavigationCommand::Home);
    assert_eq!(acknowledgement.listing_id, "listing-001");
    assert_eq!(session.step(), ListingStep::Completed);
    assert_eq!(session.listing_id(), Some("listing-001"));
    assert_eq!(submissions.drafts().len(), 1);
    assert!(matches!(
        session.toggle_category(&furniture_id()),
        Err(SessionError::WrongStep { .. })
    ));
}
