//! Shelter search.
//!
//! [`normalize`] canonicalizes text, [`FuzzyMatcher`] scores approximate
//! substring matches, and [`ShelterIndex`] ties them together over a fixed
//! collection of shelter records.
//!
//! # Example
//!
//! ```
//! use hazardmap::coord::LngLat;
//! use hazardmap::search::{SearchConfig, ShelterIndex};
//! use hazardmap::shelter::{ShelterId, ShelterRecord};
//!
//! let records = vec![ShelterRecord::new(
//!     ShelterId::new("13103-001"),
//!     "芝公園",
//!     "東京都港区芝公園四丁目",
//!     LngLat::new(139.7487, 35.6568),
//! )];
//! let index = ShelterIndex::build(records, &SearchConfig::default());
//!
//! let hits = index.search("港区 芝公園");
//! assert_eq!(hits[0].record.name, "芝公園");
//! ```

mod fuzzy;
mod index;
mod normalize;

pub use fuzzy::FuzzyMatcher;
pub use index::{SearchHit, ShelterIndex};
pub use normalize::normalize;

/// Default similarity threshold: accept matches within 30% relative edit distance.
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.3;

/// Default location-penalty divisor.
pub const DEFAULT_SEARCH_DISTANCE: f64 = 100.0;

/// Configuration for fuzzy shelter search.
///
/// # Example
///
/// ```
/// use hazardmap::search::SearchConfig;
///
/// let config = SearchConfig::default().with_threshold(0.4);
/// assert_eq!(config.threshold(), 0.4);
/// assert_eq!(config.distance(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    threshold: f64,
    distance: f64,
}

impl SearchConfig {
    /// Set the highest accepted match score (0.0 = exact only, 1.0 = anything).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set how many characters into a key a match may start before the
    /// location penalty alone reaches 1.0.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance.max(0.0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SEARCH_THRESHOLD,
            distance: DEFAULT_SEARCH_DISTANCE,
        }
    }
}
