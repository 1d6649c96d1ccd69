use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("no location source available")]
    Unavailable,
    #[error("location lookup failed: {0}")]
    Lookup(String),
}

pub trait LocationProvider {
    fn current_position(&self) -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// A signing location configured ahead of time.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        let Coordinates {
            latitude,
            longitude,
        } = self.0;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::Lookup(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }
        Ok(self.0)
    }
}

pub fn provider_for(configured: Option<Coordinates>) -> Box<dyn LocationProvider> {
    match configured {
        Some(coordinates) => Box::new(FixedLocation(coordinates)),
        None => Box::new(NoLocation),
    }
}

/// Never fails; a missing location must not block signing.
pub fn capture_best_effort(provider: &dyn LocationProvider) -> Option<Coordinates> {
    match provider.current_position() {
        Ok(coordinates) => {
            tracing::info!(
                latitude = coordinates.latitude,
                longitude = coordinates.longitude,
                "signing location captured"
            );
            Some(coordinates)
        }
        Err(err) => {
            tracing::debug!(%err, "signing location unavailable");
            None
        }
    }
}
