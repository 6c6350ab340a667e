use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::time::Duration;

use super::availability::{AvailabilityError, AvailabilityPicker, DateRangeSelection, TimeField};
use super::catalog::CategoryId;
use super::draft::{AddressDraft, AddressField, ListingDraft};
use super::geolocation::{locate_address, GeocodedAddress, GeolocationError, GeolocationGateway};
use super::navigation::{ListingStep, NavigationCommand};
use super::notice::Notice;
use super::publisher::{ListingPublisher, PublishAcknowledgement, PublishError, SubmissionGateway};
use super::selection::{CategoryRow, CategorySelector, SelectionError};
use super::validation;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("action requires the {expected:?} step but the session is on {actual:?}")]
    WrongStep {
        expected: ListingStep,
        actual: ListingStep,
    },
    #[error("Please select at least one category to continue.")]
    NoCategorySelected,
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl SessionError {
    pub fn notice(&self) -> Notice {
        let title = match self {
            SessionError::WrongStep { .. } => "Not Available",
            SessionError::NoCategorySelected => "Select a Category",
            SessionError::Selection(SelectionError::UnknownCategory(_)) => "Unknown Category",
            SessionError::Selection(SelectionError::UnknownSubcategory(_)) => {
                "Unknown Subcategory"
            }
            SessionError::Availability(
                AvailabilityError::EndDateBeforeStart { .. }
                | AvailabilityError::RangeTooLong { .. },
            ) => "Invalid Date",
            SessionError::Availability(_) => "Invalid Time",
            SessionError::Geolocation(GeolocationError::PermissionDenied) => "Permission Denied",
            SessionError::Geolocation(_) => "Location Unavailable",
            SessionError::Publish(PublishError::MissingFields(_)) => "Missing Fields",
            SessionError::Publish(PublishError::Submission(_)) => "Submission Failed",
        };
        Notice::new(title, self.to_string())
    }
}

/// Everything entered on the details step. Recreated each time the step is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsForm {
    pub title: String,
    pub description: String,
    pub address: AddressDraft,
    pub availability: AvailabilityPicker,
}

impl DetailsForm {
    pub fn new(opened_at: NaiveTime) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            address: AddressDraft::default(),
            availability: AvailabilityPicker::new(opened_at),
        }
    }
}

/// One user's pass through the two-step create-listing flow.
#[derive(Debug, Clone)]
pub struct ListingSession {
    step: ListingStep,
    selector: CategorySelector,
    details: Option<DetailsForm>,
    listing_id: Option<String>,
}

impl ListingSession {
    pub fn new(selector: CategorySelector) -> Self {
        Self {
            step: ListingStep::Categories,
            selector,
            details: None,
            listing_id: None,
        }
    }

    pub fn step(&self) -> ListingStep {
        self.step
    }

    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    pub fn details(&self) -> Option<&DetailsForm> {
        self.details.as_ref()
    }

    pub fn listing_id(&self) -> Option<&str> {
        self.listing_id.as_deref()
    }

    pub fn toggle_category(&mut self, category_id: &CategoryId) -> Result<(), SessionError> {
        self.require(ListingStep::Categories)?;
        self.selector.toggle_category_expansion(category_id)?;
        Ok(())
    }

    pub fn toggle_subcategory(&mut self, name: &str) -> Result<(), SessionError> {
        self.require(ListingStep::Categories)?;
        self.selector.toggle_subcategory(name)?;
        Ok(())
    }

    pub fn advance_animations(&mut self, elapsed: Duration) {
        self.selector.advance_animations(elapsed);
    }

    pub fn continue_to_details(
        &mut self,
        now: NaiveDateTime,
    ) -> Result<NavigationCommand, SessionError> {
        self.require(ListingStep::Categories)?;
        if !self.selector.has_selection() {
            return Err(SessionError::NoCategorySelected);
        }

        self.details = Some(DetailsForm::new(now.time()));
        self.step = ListingStep::Details;
        tracing::debug!(
            categories = self.selector.state().selected_categories().len(),
            subcategories = self.selector.state().selected_subcategories().len(),
            "entered details step"
        );
        Ok(NavigationCommand::DetailsStep)
    }

    /// Leaving the details step discards its form; the category selection survives.
    pub fn back(&mut self) -> NavigationCommand {
        match self.step {
            ListingStep::Categories | ListingStep::Completed => NavigationCommand::Home,
            ListingStep::Details => {
                self.details = None;
                self.step = ListingStep::Categories;
                NavigationCommand::Back
            }
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), SessionError> {
        self.details_mut()?.title = title.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), SessionError> {
        self.details_mut()?.description = description.into();
        Ok(())
    }

    pub fn set_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.details_mut()?.address.set(field, value);
        Ok(())
    }

    pub fn tap_day(&mut self, day: NaiveDate) -> Result<DateRangeSelection, SessionError> {
        let details = self.details_mut()?;
        match details.availability.tap_day(day) {
            Ok(range) => Ok(range),
            Err(err) => {
                tracing::warn!(%day, error = %err, "calendar tap rejected");
                Err(err.into())
            }
        }
    }

    pub fn set_start_time(&mut self, time: NaiveTime) -> Result<(), SessionError> {
        self.details_mut()?.availability.set_start_time(time);
        Ok(())
    }

    pub fn set_end_time(&mut self, time: NaiveTime) -> Result<(), SessionError> {
        let details = self.details_mut()?;
        details.availability.set_end_time(time).map_err(|err| {
            tracing::warn!(%time, error = %err, "end time rejected");
            err.into()
        })
    }

    pub fn open_time_picker(&mut self, field: TimeField) -> Result<(), SessionError> {
        self.details_mut()?.availability.open_time_picker(field);
        Ok(())
    }

    pub fn confirm_time(&mut self, time: NaiveTime) -> Result<TimeField, SessionError> {
        Ok(self.details_mut()?.availability.confirm_time(time)?)
    }

    pub fn dismiss_time_picker(&mut self) -> Result<(), SessionError> {
        self.details_mut()?.availability.dismiss_time_picker();
        Ok(())
    }

    /// Applies a finished lookup. Failures leave the address untouched; the latest
    /// successful result wins.
    pub fn apply_address_lookup(
        &mut self,
        lookup: Result<GeocodedAddress, GeolocationError>,
    ) -> Result<&AddressDraft, SessionError> {
        let details = self.details_mut()?;
        match lookup {
            Ok(found) => {
                details.address.apply_geocoded(found);
                Ok(&details.address)
            }
            Err(err) => {
                tracing::warn!(error = %err, "address lookup failed");
                Err(err.into())
            }
        }
    }

    pub fn locate_address<G>(&mut self, gateway: &G) -> Result<&AddressDraft, SessionError>
    where
        G: GeolocationGateway + ?Sized,
    {
        self.require(ListingStep::Details)?;
        let lookup = locate_address(gateway);
        self.apply_address_lookup(lookup)
    }

    pub fn draft(&self) -> ListingDraft {
        let state = self.selector.state();
        let categories = self
            .selector
            .catalog()
            .categories()
            .iter()
            .filter(|category| state.is_category_selected(category))
            .map(|category| category.id.clone())
            .collect();
        let subcategories = state.selected_subcategories().iter().cloned().collect();

        let mut draft = ListingDraft {
            categories,
            subcategories,
            ..ListingDraft::default()
        };

        if let Some(details) = &self.details {
            let range = details.availability.range();
            let times = details.availability.times();
            draft.title = details.title.clone();
            draft.description = details.description.clone();
            draft.address = details.address.clone();
            draft.start_date = range.start_date();
            draft.end_date = range.end_date();
            draft.start_time = Some(times.start());
            draft.end_time = Some(times.end());
        }

        draft
    }

    pub fn validate(&self) -> Vec<&'static str> {
        validation::validate(&self.draft())
    }

    pub fn publish<G>(
        &mut self,
        publisher: &ListingPublisher<G>,
    ) -> Result<(PublishAcknowledgement, NavigationCommand), SessionError>
    where
        G: SubmissionGateway + ?Sized,
    {
        self.require(ListingStep::Details)?;
        let acknowledgement = publisher.publish(&self.draft())?;

        self.listing_id = Some(acknowledgement.listing_id.clone());
        self.step = ListingStep::Completed;
        Ok((acknowledgement, NavigationCommand::Home))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            step: self.step,
            step_label: self.step.label(),
            progress: self.step.progress(),
            categories: self.selector.rows(),
            details: self.details.as_ref().map(DetailsView::from_form),
            listing_id: self.listing_id.clone(),
        }
    }

    fn require(&self, expected: ListingStep) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SessionError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    fn details_mut(&mut self) -> Result<&mut DetailsForm, SessionError> {
        self.require(ListingStep::Details)?;
        self.details.as_mut().ok_or(SessionError::WrongStep {
            expected: ListingStep::Details,
            actual: ListingStep::Categories,
        })
    }
}

impl Default for ListingSession {
    fn default() -> Self {
        Self::new(CategorySelector::default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub step: ListingStep,
    pub step_label: &'static str,
    pub progress: f32,
    pub categories: Vec<CategoryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailsView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub title: String,
    pub description: String,
    pub address: AddressDraft,
    pub range: DateRangeSelection,
    pub day_count: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_picker: Option<TimeField>,
}

impl DetailsView {
    fn from_form(form: &DetailsForm) -> Self {
        let range = form.availability.range();
        let times = form.availability.times();
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            address: form.address.clone(),
            range,
            day_count: range.day_count(),
            start_time: times.start().format("%H:%M").to_string(),
            end_time: times.end().format("%H:%M").to_string(),
            open_picker: form.availability.open_picker(),
        }
    }
}
