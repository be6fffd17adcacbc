//! Service error types.

use thiserror::Error;

use crate::config::ConfigFileError;
use crate::control::ControlError;
use crate::legend::LegendError;
use crate::shelter::ShelterLoadError;
use crate::tile::FetchError;

/// Errors that can occur while starting or driving the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigFileError),

    /// A shelter dataset failed to load
    #[error("Shelter data error: {0}")]
    ShelterData(#[from] ShelterLoadError),

    /// The hazard legend document failed to load
    #[error("Legend error: {0}")]
    Legend(#[from] LegendError),

    /// Failed to create the tile HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] FetchError),

    /// Layer control misuse
    #[error("Layer control error: {0}")]
    Control(#[from] ControlError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let err = ServiceError::from(ShelterLoadError::NotFound(PathBuf::from("/data/x.geojson")));
        assert_eq!(err.to_string(), "Shelter data error: Shelter data not found at: /data/x.geojson");

        let err = ServiceError::from(ControlError::Detached);
        assert!(err.to_string().starts_with("Layer control error: "));
    }
}
