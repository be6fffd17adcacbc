//! Geocoder types and the interface expected by the search control.

use std::future::Future;

use serde_json::{json, Value};
use thiserror::Error;

use crate::coord::LngLat;

/// Errors that can occur during geocoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// Neither value of a reverse query can be a latitude, or a value is not finite.
    #[error("Invalid coordinate pair ({0}, {1}): cannot be a latitude/longitude pair")]
    InvalidCoordinatePair(f64, f64),
}

/// A geocoding candidate: a point and a human-readable label.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeFeature {
    pub center: LngLat,
    pub place_name: String,
}

impl GeocodeFeature {
    pub fn new(center: LngLat, place_name: impl Into<String>) -> Self {
        Self {
            center,
            place_name: place_name.into(),
        }
    }

    /// Renders the candidate as the GeoJSON feature the search control consumes.
    pub fn to_geojson(&self) -> Value {
        let coordinates = [self.center.lng, self.center.lat];
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": coordinates,
            },
            "place_name": self.place_name,
            "center": coordinates,
        })
    }
}

/// Result of a forward or reverse geocode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeResponse {
    pub features: Vec<GeocodeFeature>,
}

impl GeocodeResponse {
    pub fn to_geojson(&self) -> Value {
        json!({
            "features": self.features.iter().map(GeocodeFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}

/// Asynchronous geocoding interface of the host search control.
///
/// The control always awaits its geocoder, so both operations are async even
/// when the implementation does no I/O.
pub trait GeocoderApi: Send + Sync {
    /// Text query to candidate points.
    fn forward_geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<GeocodeResponse, GeocodeError>> + Send;

    /// Coordinate pair of unknown axis order to candidate labels.
    fn reverse_geocode(
        &self,
        query: (f64, f64),
    ) -> impl Future<Output = Result<GeocodeResponse, GeocodeError>> + Send;
}
