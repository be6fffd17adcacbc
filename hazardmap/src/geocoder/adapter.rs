//! Geocoder backed by the shelter search index.

use super::types::{GeocodeError, GeocodeFeature, GeocodeResponse, GeocoderApi};
use crate::coord::LngLat;
use crate::search::ShelterIndex;

/// Separator between facility name and address in forward-search labels.
pub const PLACE_NAME_SEPARATOR: &str = ",";

/// Largest magnitude a latitude can have.
const LATITUDE_LIMIT: f64 = 90.0;

/// Forward and reverse geocoding over a static shelter collection.
///
/// No network calls are made; the async interface exists because the
/// search control awaits its geocoder.
#[derive(Debug, Clone)]
pub struct ShelterGeocoder {
    index: ShelterIndex,
}

impl ShelterGeocoder {
    pub fn new(index: ShelterIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &ShelterIndex {
        &self.index
    }

    /// Searches shelters and labels each hit `"{name},{address}"`, best first.
    pub fn forward_search(&self, query: &str) -> Vec<GeocodeFeature> {
        self.index
            .search(query)
            .into_iter()
            .map(|hit| {
                let record = hit.record;
                GeocodeFeature::new(
                    record.location,
                    format!("{}{}{}", record.name, PLACE_NAME_SEPARATOR, record.address),
                )
            })
            .collect()
    }

    /// Interprets a coordinate pair whose axis order is unknown.
    ///
    /// A value outside [-90, 90] cannot be a latitude, so it is taken as the
    /// longitude and a single candidate is returned. When both values are
    /// within [-90, 90] the order is ambiguous and both readings are returned,
    /// `(first, second)` as (lng, lat) first. When neither can be a latitude
    /// the pair is rejected.
    pub fn reverse_search(&self, query: (f64, f64)) -> Result<Vec<GeocodeFeature>, GeocodeError> {
        let (first, second) = query;
        if !first.is_finite() || !second.is_finite() {
            return Err(GeocodeError::InvalidCoordinatePair(first, second));
        }

        let first_is_lat = first.abs() <= LATITUDE_LIMIT;
        let second_is_lat = second.abs() <= LATITUDE_LIMIT;

        let features = match (first_is_lat, second_is_lat) {
            (false, true) => vec![coordinate_feature(first, second)],
            (true, false) => vec![coordinate_feature(second, first)],
            (true, true) => vec![
                coordinate_feature(first, second),
                coordinate_feature(second, first),
            ],
            (false, false) => return Err(GeocodeError::InvalidCoordinatePair(first, second)),
        };
        Ok(features)
    }
}

fn coordinate_feature(lng: f64, lat: f64) -> GeocodeFeature {
    GeocodeFeature::new(LngLat::new(lng, lat), format!("lat: {} lon: {}", lat, lng))
}

impl GeocoderApi for ShelterGeocoder {
    async fn forward_geocode(&self, query: &str) -> Result<GeocodeResponse, GeocodeError> {
        Ok(GeocodeResponse {
            features: self.forward_search(query),
        })
    }

    async fn reverse_geocode(&self, query: (f64, f64)) -> Result<GeocodeResponse, GeocodeError> {
        let features = self.reverse_search(query).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected reverse geocode query");
        })?;
        Ok(GeocodeResponse { features })
    }
}
