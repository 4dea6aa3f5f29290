//! Device location: where the dashboard gets coordinates from.

use crate::types::{Location, LocationError};
use twcast_core::LocationConfig;

/// Source of device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource {
    /// Coordinates are known (from flags or the config file)
    Fixed(Location),
    /// The user has turned location off
    Denied,
    /// No location capability
    Unavailable,
}

impl LocationSource {
    pub fn from_config(config: &LocationConfig) -> Self {
        if !config.enabled {
            return Self::Denied;
        }
        match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Self::Fixed(Location {
                latitude,
                longitude,
            }),
            _ => Self::Unavailable,
        }
    }

    pub async fn current_location(&self) -> Result<Location, LocationError> {
        match self {
            Self::Fixed(location) => Ok(*location),
            Self::Denied => Err(LocationError::PermissionDenied),
            Self::Unavailable => Err(LocationError::ServiceUnavailable),
        }
    }
}
