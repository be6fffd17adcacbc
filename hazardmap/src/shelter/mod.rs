//! Shelter records and the datasets they are loaded from.
//!
//! Records are loaded once at startup from GeoJSON documents whose property
//! names are natural-language labels. A [`FieldSchema`] maps those labels to
//! the fixed fields of [`ShelterRecord`], so nothing downstream ever looks a
//! property up by its label.

mod loader;
mod schema;

pub use loader::{load_from_path, load_from_str, ShelterLoadError};
pub use schema::{AccessibilityFields, FieldSchema, UnknownSchemaError};

use std::collections::HashMap;
use std::fmt;

use crate::coord::LngLat;

/// Unique identifier of a shelter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShelterId(String);

impl ShelterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShelterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Barrier-free facilities of a shelter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accessibility {
    /// Elevator available, or the shelter space is on the ground floor
    pub elevator_or_ground_floor: bool,
    /// Slopes or ramps
    pub slope: bool,
    /// Tactile paving
    pub braille_blocks: bool,
    /// Wheelchair-accessible toilet
    pub wheelchair_toilet: bool,
    /// Free-text remarks
    pub other: Option<String>,
}

impl Accessibility {
    /// Display labels for the facilities that are present, in a fixed order.
    pub fn items(&self) -> Vec<String> {
        let mut items = Vec::new();
        if self.elevator_or_ground_floor {
            items.push("エレベーター有/避難スペースが１階".to_string());
        }
        if self.slope {
            items.push("スロープ有".to_string());
        }
        if self.braille_blocks {
            items.push("点字ブロック有".to_string());
        }
        if self.wheelchair_toilet {
            items.push("車椅子対応トイレ有".to_string());
        }
        if let Some(other) = &self.other {
            items.push(other.clone());
        }
        items
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// An evacuation shelter. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterRecord {
    pub id: ShelterId,
    /// Facility or place name
    pub name: String,
    pub address: String,
    pub location: LngLat,
    pub accessibility: Accessibility,
    /// Who the shelter accepts, when the dataset says
    pub accepted_persons: Option<String>,
    pub notes: Option<String>,
}

impl ShelterRecord {
    /// Creates a record with no accessibility information or remarks.
    pub fn new(
        id: ShelterId,
        name: impl Into<String>,
        address: impl Into<String>,
        location: LngLat,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            location,
            accessibility: Accessibility::default(),
            accepted_persons: None,
            notes: None,
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }
}

/// All loaded shelters, in dataset order, with lookup by id.
#[derive(Debug, Clone, Default)]
pub struct ShelterCatalog {
    records: Vec<ShelterRecord>,
    by_id: HashMap<ShelterId, usize>,
}

impl ShelterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one dataset's records.
    ///
    /// Ids stay unique: a record whose id is already taken is renamed to
    /// `"{id}#{n}"` with the smallest free `n` starting at 2, so every record
    /// can be looked up by the id it carries.
    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = ShelterRecord>,
    {
        for mut record in records {
            if self.by_id.contains_key(&record.id) {
                let unique = self.free_id(&record.id);
                tracing::warn!(id = %record.id, renamed = %unique, "Duplicate shelter id");
                record.id = unique;
            }
            self.by_id.insert(record.id.clone(), self.records.len());
            self.records.push(record);
        }
    }

    fn free_id(&self, id: &ShelterId) -> ShelterId {
        (2..)
            .map(|n| ShelterId::new(format!("{}#{}", id, n)))
            .find(|candidate| !self.by_id.contains_key(candidate))
            .unwrap_or_else(|| id.clone())
    }

    pub fn get(&self, id: &ShelterId) -> Option<&ShelterRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[ShelterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ShelterRecord> for ShelterCatalog {
    fn from_iter<I: IntoIterator<Item = ShelterRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}
