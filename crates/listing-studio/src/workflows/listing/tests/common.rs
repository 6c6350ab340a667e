use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::workflows::listing::draft::{AddressDraft, ListingDraft};
use crate::workflows::listing::geolocation::{
    Coordinates, GeocodedAddress, GeolocationError, GeolocationGateway, PermissionStatus,
};
use crate::workflows::listing::publisher::{
    ListingPublisher, SubmissionError, SubmissionGateway, SubmissionReceipt,
};
use crate::workflows::listing::{
    AccordionSettings, CategoryCatalog, CategoryId, CategorySelector, ListingService,
    ListingSession,
};

pub(super) fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn opened_at() -> NaiveDateTime {
    day(1, 2).and_hms_opt(9, 30, 42).expect("valid timestamp")
}

pub(super) fn category_id(raw: &str) -> CategoryId {
    CategoryId::new(raw)
}

pub(super) fn furniture_id() -> CategoryId {
    category_id("3")
}

pub(super) fn selector() -> CategorySelector {
    CategorySelector::new(CategoryCatalog::standard(), AccordionSettings::default())
}

/// Session already on the details step with Furniture/Tables picked.
pub(super) fn details_session() -> ListingSession {
    let mut session = ListingSession::new(selector());
    session
        .toggle_category(&furniture_id())
        .expect("furniture toggles");
    session
        .toggle_subcategory("Tables")
        .expect("tables toggles");
    session
        .continue_to_details(opened_at())
        .expect("continue allowed");
    session
}

pub(super) fn complete_address() -> AddressDraft {
    AddressDraft {
        street: "400 Locust St".to_string(),
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        zip: "50309".to_string(),
    }
}

pub(super) fn complete_draft() -> ListingDraft {
    ListingDraft {
        title: "Oak dining table".to_string(),
        description: "Seats six".to_string(),
        categories: vec![furniture_id()],
        subcategories: vec!["Tables".to_string()],
        address: complete_address(),
        start_date: Some(day(1, 10)),
        end_date: Some(day(1, 15)),
        start_time: Some(time(9, 0)),
        end_time: Some(time(17, 0)),
    }
}

#[derive(Default)]
pub(super) struct MemorySubmissions {
    drafts: Mutex<Vec<ListingDraft>>,
}

impl MemorySubmissions {
    pub(super) fn drafts(&self) -> Vec<ListingDraft> {
        self.drafts.lock().expect("submission mutex").clone()
    }
}

impl SubmissionGateway for MemorySubmissions {
    fn submit_listing(&self, draft: &ListingDraft) -> Result<SubmissionReceipt, SubmissionError> {
        let mut guard = self.drafts.lock().expect("submission mutex");
        guard.push(draft.clone());
        Ok(SubmissionReceipt {
            listing_id: format!("listing-{:03}", guard.len()),
        })
    }
}

pub(super) struct OfflineSubmissions;

impl SubmissionGateway for OfflineSubmissions {
    fn submit_listing(&self, _draft: &ListingDraft) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Unavailable("offline".to_string()))
    }
}

pub(super) struct CrashingSubmissions;

impl SubmissionGateway for CrashingSubmissions {
    fn submit_listing(&self, _draft: &ListingDraft) -> Result<SubmissionReceipt, SubmissionError> {
        panic!("submission backend crashed");
    }
}

pub(super) fn publisher() -> (ListingPublisher<MemorySubmissions>, Arc<MemorySubmissions>) {
    let submissions = Arc::new(MemorySubmissions::default());
    (ListingPublisher::new(submissions.clone()), submissions)
}

/// Hands out the queued addresses in order, then fails.
pub(super) struct ScriptedGeolocation {
    permission: PermissionStatus,
    addresses: Mutex<Vec<GeocodedAddress>>,
    pub(super) calls: AtomicUsize,
}

impl ScriptedGeolocation {
    pub(super) fn granted(addresses: Vec<GeocodedAddress>) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            addresses: Mutex::new(addresses),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            addresses: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl GeolocationGateway for ScriptedGeolocation {
    fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn current_coordinates(&self) -> Result<Coordinates, GeolocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Coordinates {
            latitude: 41.586,
            longitude: -93.625,
        })
    }

    fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<GeocodedAddress, GeolocationError> {
        let mut queue = self.addresses.lock().expect("geocode mutex");
        if queue.is_empty() {
            return Err(GeolocationError::Geocoding("no results".to_string()));
        }
        Ok(queue.remove(0))
    }
}

pub(super) fn geocoded(street: &str, city: &str) -> GeocodedAddress {
    GeocodedAddress {
        street: Some(street.to_string()),
        city: Some(city.to_string()),
        region: Some("IA".to_string()),
        postal_code: Some("50309".to_string()),
    }
}

pub(super) fn fixed_clock() -> NaiveDateTime {
    opened_at()
}

pub(super) fn build_service(
    geolocation: ScriptedGeolocation,
) -> (
    Arc<ListingService<MemorySubmissions, ScriptedGeolocation>>,
    Arc<MemorySubmissions>,
) {
    let submissions = Arc::new(MemorySubmissions::default());
    let service = ListingService::new(
        CategoryCatalog::standard(),
        AccordionSettings::default(),
        submissions.clone(),
        Arc::new(geolocation),
    )
    .with_clock(fixed_clock);
    (Arc::new(service), submissions)
}

/// Service over arbitrary submissions with denied geolocation and the fixed clock.
pub(super) fn service_with<S: SubmissionGateway + 'static>(
    submissions: S,
) -> ListingService<S, ScriptedGeolocation> {
    ListingService::new(
        CategoryCatalog::standard(),
        AccordionSettings::default(),
        Arc::new(submissions),
        Arc::new(ScriptedGeolocation::denied()),
    )
    .with_clock(fixed_clock)
}
