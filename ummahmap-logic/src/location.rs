use std::{future::Future, time::Duration};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Capability, UserFacingError};

/// A "part" of a location
pub type LocationComponent = f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Some location in the world as gotten from a Geolocation API
pub struct Location {
    /// Latitude
    pub lat: LocationComponent,
    /// Longitude
    pub lng: LocationComponent,
}

impl Location {
    pub const fn new(lat: LocationComponent, lng: LocationComponent) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Timed out getting location")]
    TimedOut,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl From<LocationError> for UserFacingError {
    fn from(value: LocationError) -> Self {
        match value {
            LocationError::Unsupported => Self::Unsupported(Capability::Geolocation),
            LocationError::PermissionDenied => Self::PermissionDenied(Capability::Geolocation),
            other => Self::request(other.to_string()),
        }
    }
}

/// How long to wait on a position fix before giving up
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(12);

pub trait LocationService {
    /// Get a one-shot, high accuracy position fix
    fn current_location(&self) -> impl Future<Output = Result<Location, LocationError>>;
}

/// Get the current location, failing with [LocationError::TimedOut] after [LOCATION_TIMEOUT]
pub async fn acquire_location<L: LocationService>(service: &L) -> Result<Location, LocationError> {
    match tokio::time::timeout(LOCATION_TIMEOUT, service.current_location()).await {
        Ok(res) => res,
        Err(_) => {
            warn!("No position fix after {}s", LOCATION_TIMEOUT.as_secs());
            Err(LocationError::TimedOut)
        }
    }
}
