//! Fuzzy-searchable index over shelter records.

use super::fuzzy::FuzzyMatcher;
use super::normalize::normalize;
use super::SearchConfig;
use crate::shelter::ShelterRecord;

/// A record matched by a query, with its score (lower is better).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub record: &'a ShelterRecord,
    pub score: f64,
}

/// Normalized search keys for one record.
#[derive(Debug, Clone)]
struct IndexEntry {
    name: Vec<char>,
    address: Vec<char>,
}

/// Read-only fuzzy index keyed on each record's normalized name and address.
///
/// Every source record has exactly one entry, in source order.
#[derive(Debug, Clone)]
pub struct ShelterIndex {
    records: Vec<ShelterRecord>,
    entries: Vec<IndexEntry>,
    matcher: FuzzyMatcher,
}

impl ShelterIndex {
    /// Builds the index. Keys are normalized with the same function that
    /// [`search`](Self::search) applies to queries.
    pub fn build<I>(records: I, config: &SearchConfig) -> Self
    where
        I: IntoIterator<Item = ShelterRecord>,
    {
        let records: Vec<ShelterRecord> = records.into_iter().collect();
        let entries = records
            .iter()
            .map(|record| IndexEntry {
                name: normalize(&record.name).chars().collect(),
                address: normalize(&record.address).chars().collect(),
            })
            .collect();

        tracing::info!(
            count = records.len(),
            threshold = config.threshold(),
            "Built shelter search index"
        );

        Self {
            records,
            entries,
            matcher: FuzzyMatcher::new(config.threshold(), config.distance()),
        }
    }

    /// Returns matching records, best match first.
    ///
    /// Records with equal scores keep their source order. A query that is
    /// empty after normalization matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let pattern: Vec<char> = normalize(query).chars().collect();
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .records
            .iter()
            .zip(&self.entries)
            .filter_map(|(record, entry)| {
                let by_name = self.matcher.score(&pattern, &entry.name);
                let by_address = self.matcher.score(&pattern, &entry.address);
                let score = match (by_name, by_address) {
                    (Some(a), Some(b)) => a.min(b),
                    (Some(s), None) | (None, Some(s)) => s,
                    (None, None) => return None,
                };
                Some(SearchHit { record, score })
            })
            .collect();

        // Stable sort keeps source order among equal scores.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));

        tracing::debug!(query = query, hits = hits.len(), "Shelter search");
        hits
    }

    /// Returns the indexed records in source order.
    pub fn records(&self) -> &[ShelterRecord] {
        &self.records
    }

    /// Returns the number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
