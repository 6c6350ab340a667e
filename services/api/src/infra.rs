use chrono::NaiveDate;
use listing_studio::config::ListingConfig;
use listing_studio::workflows::listing::{
    CatalogError, CategoryCatalog, Coordinates, GeocodedAddress, GeolocationError,
    GeolocationGateway, ListingDraft, PermissionStatus, SubmissionError, SubmissionGateway,
    SubmissionReceipt,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps submitted drafts in memory and hands out sequential listing ids.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionGateway {
    drafts: Arc<Mutex<Vec<ListingDraft>>>,
}

impl SubmissionGateway for InMemorySubmissionGateway {
    fn submit_listing(&self, draft: &ListingDraft) -> Result<SubmissionReceipt, SubmissionError> {
        let mut guard = self.drafts.lock().expect("submission mutex poisoned");
        guard.push(draft.clone());
        Ok(SubmissionReceipt {
            listing_id: format!("listing-{:06}", guard.len()),
        })
    }
}

impl InMemorySubmissionGateway {
    pub(crate) fn drafts(&self) -> Vec<ListingDraft> {
        self.drafts.lock().expect("submission mutex poisoned").clone()
    }
}

/// Answers every lookup with the same address, or denies permission when none is configured.
#[derive(Debug, Clone, Default)]
pub(crate) struct FixedGeolocation {
    address: Option<GeocodedAddress>,
}

impl FixedGeolocation {
    pub(crate) fn denied() -> Self {
        Self { address: None }
    }

    pub(crate) fn at(address: GeocodedAddress) -> Self {
        Self {
            address: Some(address),
        }
    }
}

impl GeolocationGateway for FixedGeolocation {
    fn request_permission(&self) -> PermissionStatus {
        if self.address.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn current_coordinates(&self) -> Result<Coordinates, GeolocationError> {
        Ok(Coordinates {
            latitude: 41.5868,
            longitude: -93.625,
        })
    }

    fn reverse_geocode(
        &self,
        _coordinates: Coordinates,
    ) -> Result<GeocodedAddress, GeolocationError> {
        self.address
            .clone()
            .ok_or_else(|| GeolocationError::Geocoding("no address configured".to_string()))
    }
}

pub(crate) fn load_catalog(config: &ListingConfig) -> Result<CategoryCatalog, CatalogError> {
    match &config.catalog_csv {
        Some(path) => {
            let catalog = CategoryCatalog::from_path(path)?;
            tracing::info!(path = %path.display(), categories = catalog.categories().len(), "loaded category catalog");
            Ok(catalog)
        }
        None => Ok(CategoryCatalog::standard()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) use listing_studio::workflows::listing::parse_time;
