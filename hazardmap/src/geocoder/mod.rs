//! Geocoding adapter for the map's search control.
//!
//! Forward geocoding searches the shelter index; reverse geocoding turns a
//! coordinate pair of unknown axis order into labelled candidates.
//!
//! # Example
//!
//! ```
//! use hazardmap::geocoder::ShelterGeocoder;
//! use hazardmap::search::{SearchConfig, ShelterIndex};
//!
//! let geocoder = ShelterGeocoder::new(ShelterIndex::build(Vec::new(), &SearchConfig::default()));
//!
//! // 100 cannot be a latitude, so it must be the longitude
//! let features = geocoder.reverse_search((100.0, 30.0)).unwrap();
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].place_name, "lat: 30 lon: 100");
//! ```

mod adapter;
mod types;

pub use adapter::{ShelterGeocoder, PLACE_NAME_SEPARATOR};
pub use types::{GeocodeError, GeocodeFeature, GeocodeResponse, GeocoderApi};
