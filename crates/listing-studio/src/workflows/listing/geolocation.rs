use super::draft::AddressDraft;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Components returned by a reverse lookup; any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission was denied. Please enter your address manually.")]
    PermissionDenied,
    #[error("Unable to determine your current location: {0}")]
    PositionUnavailable(String),
    #[error("Unable to look up an address for your location: {0}")]
    Geocoding(String),
}

/// Device location services as seen by the workflow.
pub trait GeolocationGateway: Send + Sync {
    fn request_permission(&self) -> PermissionStatus;
    fn current_coordinates(&self) -> Result<Coordinates, GeolocationError>;
    fn reverse_geocode(&self, coordinates: Coordinates)
        -> Result<GeocodedAddress, GeolocationError>;
}

pub fn locate_address<G>(gateway: &G) -> Result<GeocodedAddress, GeolocationError>
where
    G: GeolocationGateway + ?Sized,
{
    if gateway.request_permission() == PermissionStatus::Denied {
        return Err(GeolocationError::PermissionDenied);
    }

    let coordinates = gateway.current_coordinates()?;
    gateway.reverse_geocode(coordinates)
}

impl AddressDraft {
    /// Overwrites all four fields; missing components clear the field.
    pub fn apply_geocoded(&mut self, found: GeocodedAddress) {
        self.street = found.street.unwrap_or_default();
        self.city = found.city.unwrap_or_default();
        self.state = found.region.unwrap_or_default();
        self.zip = found.postal_code.unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGateway {
        permission: PermissionStatus,
        lookups: AtomicUsize,
    }

    impl GeolocationGateway for CountingGateway {
        fn request_permission(&self) -> PermissionStatus {
            self.permission
        }

        fn current_coordinates(&self) -> Result<Coordinates, GeolocationError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(Coordinates {
                latitude: 41.59,
                longitude: -93.62,
            })
        }

        fn reverse_geocode(
            &self,
            _coordinates: Coordinates,
        ) -> Result<GeocodedAddress, GeolocationError> {
            Ok(GeocodedAddress {
                street: Some("400 Locust St".to_string()),
                city: Some("Des Moines".to_string()),
                region: Some("IA".to_string()),
                postal_code: None,
            })
        }
    }

    #[test]
    fn denied_permission_skips_position_lookup() {
        let gateway = CountingGateway {
            permission: PermissionStatus::Denied,
            lookups: AtomicUsize::new(0),
        };

        assert_eq!(
            locate_address(&gateway),
            Err(GeolocationError::PermissionDenied)
        );
        assert_eq!(gateway.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn located_address_overwrites_every_field() {
        let gateway = CountingGateway {
            permission: PermissionStatus::Granted,
            lookups: AtomicUsize::new(0),
        };
        let mut address = AddressDraft {
            zip: "50309".to_string(),
            ..AddressDraft::default()
        };

        address.apply_geocoded(locate_address(&gateway).expect("lookup succeeds"));

        assert_eq!(address.street, "400 Locust St");
        assert_eq!(address.city, "Des Moines");
        assert_eq!(address.state, "IA");
        assert_eq!(address.zip, "");
    }
}
