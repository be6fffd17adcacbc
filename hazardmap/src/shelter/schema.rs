//! Translation tables from dataset property labels to record fields.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Property labels carrying barrier-free information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityFields {
    pub elevator_or_ground_floor: &'static str,
    pub slope: &'static str,
    pub braille_blocks: &'static str,
    pub wheelchair_toilet: &'static str,
    pub other: &'static str,
    /// Value that marks a facility as present
    pub present_marker: &'static str,
}

/// Maps one dataset's property labels onto [`ShelterRecord`](super::ShelterRecord) fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Dataset name, also used to synthesize ids for records without one
    pub dataset: &'static str,
    /// Id labels, tried in order
    pub id: &'static [&'static str],
    pub name: &'static str,
    pub address: &'static str,
    pub accepted_persons: Option<&'static str>,
    pub notes: Option<&'static str>,
    pub accessibility: Option<AccessibilityFields>,
}

impl FieldSchema {
    /// Designated emergency evacuation sites (national open data).
    pub const fn designated() -> Self {
        Self {
            dataset: "designated",
            id: &["共通ID", "NO"],
            name: "施設・場所名",
            address: "住所",
            accepted_persons: Some("受入対象者"),
            notes: Some("備考"),
            accessibility: None,
        }
    }

    /// Tokyo metropolitan shelter list, which carries barrier-free columns.
    pub const fn tokyo() -> Self {
        Self {
            dataset: "tokyo",
            id: &[],
            name: "避難所_施設名称",
            address: "所在地住所",
            accepted_persons: None,
            notes: None,
            accessibility: Some(AccessibilityFields {
                elevator_or_ground_floor: "エレベーター有/\n避難スペースが１階",
                slope: "スロープ等",
                braille_blocks: "点字ブロック",
                wheelchair_toilet: "車椅子使用者対応トイレ",
                other: "その他",
                present_marker: "○",
            }),
        }
    }
}

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset)
    }
}

/// A dataset schema name that is not known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shelter schema '{0}' (expected 'designated' or 'tokyo')")]
pub struct UnknownSchemaError(pub String);

impl FromStr for FieldSchema {
    type Err = UnknownSchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "designated" => Ok(Self::designated()),
            "tokyo" => Ok(Self::tokyo()),
            other => Err(UnknownSchemaError(other.to_string())),
        }
    }
}
