//! Create-listing workflow: the category accordion, the availability picker, and the
//! completeness gate in front of publishing.

pub mod availability;
pub mod catalog;
pub mod draft;
pub mod geolocation;
pub mod navigation;
pub mod notice;
pub mod publisher;
pub mod router;
pub mod selection;
pub mod service;
pub mod session;
pub mod validation;

mod animation;

#[cfg(test)]
mod tests;

pub use animation::{AccordionAnimations, AccordionSettings};
pub use availability::{
    AvailabilityError, AvailabilityPicker, DateRangeSelection, DayMarking, TimeField, TimeRange,
    MAX_RANGE_DAYS,
};
pub use catalog::{icon_for, Category, CategoryCatalog, CategoryId, CatalogError};
pub use draft::{AddressDraft, AddressField, ListingDraft};
pub use geolocation::{
    locate_address, Coordinates, GeocodedAddress, GeolocationError, GeolocationGateway,
    PermissionStatus,
};
pub use navigation::{ListingStep, NavigationCommand, Navigator};
pub use notice::Notice;
pub use publisher::{
    ListingPublisher, PublishAcknowledgement, PublishError, SubmissionError, SubmissionGateway,
    SubmissionReceipt,
};
pub use router::{listing_router, parse_time};
pub use selection::{
    toggle_expansion, CategoryRow, CategorySelector, SelectionError, SelectionState,
    SubcategoryRow,
};
pub use service::{ListingService, ListingServiceError, SessionId, DEFAULT_SESSION_LIMIT};
pub use session::{DetailsForm, ListingSession, SessionError, SessionView};
pub use validation::{missing_fields, validate, DraftField, MissingFields};
