//! GeoJSON shelter dataset loading.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::{AccessibilityFields, FieldSchema};
use super::{Accessibility, ShelterId, ShelterRecord};
use crate::coord::LngLat;

/// Errors raised while loading a shelter dataset.
#[derive(Debug, Error)]
pub enum ShelterLoadError {
    #[error("Shelter data not found at: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed shelter document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid feature #{index} in {dataset} dataset: {reason}")]
    InvalidFeature {
        dataset: String,
        index: usize,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<FeatureDoc>,
}

#[derive(Debug, Deserialize)]
struct FeatureDoc {
    geometry: Option<GeometryDoc>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Loads a dataset from a GeoJSON file.
pub fn load_from_path<P: AsRef<Path>>(
    path: P,
    schema: &FieldSchema,
) -> Result<Vec<ShelterRecord>, ShelterLoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ShelterLoadError::NotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    let doc: FeatureCollectionDoc = serde_json::from_reader(reader)?;
    let records = convert(doc, schema)?;

    tracing::info!(
        path = %path.display(),
        dataset = schema.dataset,
        count = records.len(),
        "Loaded shelter dataset"
    );
    Ok(records)
}

/// Loads a dataset from a GeoJSON string.
pub fn load_from_str(
    json: &str,
    schema: &FieldSchema,
) -> Result<Vec<ShelterRecord>, ShelterLoadError> {
    let doc: FeatureCollectionDoc = serde_json::from_str(json)?;
    convert(doc, schema)
}

fn convert(
    doc: FeatureCollectionDoc,
    schema: &FieldSchema,
) -> Result<Vec<ShelterRecord>, ShelterLoadError> {
    doc.features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| convert_feature(index, feature, schema))
        .collect()
}

fn convert_feature(
    index: usize,
    feature: FeatureDoc,
    schema: &FieldSchema,
) -> Result<ShelterRecord, ShelterLoadError> {
    let invalid = |reason: &str| ShelterLoadError::InvalidFeature {
        dataset: schema.dataset.to_string(),
        index,
        reason: reason.to_string(),
    };

    let location = match feature.geometry {
        Some(GeometryDoc { kind, coordinates }) if kind == "Point" => {
            point(&coordinates).ok_or_else(|| invalid("point has no valid coordinates"))?
        }
        Some(_) => return Err(invalid("geometry is not a Point")),
        None => return Err(invalid("missing geometry")),
    };

    let props = feature.properties.unwrap_or_default();

    let name = text(&props, schema.name).ok_or_else(|| invalid("missing facility name"))?;
    let address = text(&props, schema.address).unwrap_or_default();

    let id = schema
        .id
        .iter()
        .find_map(|label| text(&props, label))
        .map(ShelterId::new)
        .unwrap_or_else(|| ShelterId::new(format!("{}-{}", schema.dataset, index)));

    let accessibility = schema
        .accessibility
        .map(|fields| accessibility(&props, &fields))
        .unwrap_or_default();

    Ok(ShelterRecord {
        id,
        name,
        address,
        location,
        accessibility,
        accepted_persons: schema.accepted_persons.and_then(|label| text(&props, label)),
        notes: schema.notes.and_then(|label| text(&props, label)),
    })
}

fn accessibility(props: &Map<String, Value>, fields: &AccessibilityFields) -> Accessibility {
    let flag = |label: &str| text(props, label).is_some_and(|v| v == fields.present_marker);
    Accessibility {
        elevator_or_ground_floor: flag(fields.elevator_or_ground_floor),
        slope: flag(fields.slope),
        braille_blocks: flag(fields.braille_blocks),
        wheelchair_toilet: flag(fields.wheelchair_toilet),
        other: text(props, fields.other),
    }
}

fn point(coordinates: &Value) -> Option<LngLat> {
    let pair = coordinates.as_array()?;
    let lng = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    (lng.is_finite() && lat.is_finite()).then(|| LngLat::new(lng, lat))
}

/// Reads a property as trimmed, non-empty text. Numbers are rendered as text.
fn text(props: &Map<String, Value>, label: &str) -> Option<String> {
    let value = match props.get(label)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESIGNATED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "NO": "1",
                    "共通ID": "131030001",
                    "施設・場所名": "芝公園",
                    "住所": "東京都港区芝公園四丁目",
                    "指定緊急避難場所との住所同一": "",
                    "その他市町村長が必要と認める事項": null,
                    "受入対象者": null,
                    "備考": "広域避難場所"
                },
                "geometry": { "type": "Point", "coordinates": [139.7487, 35.6568] }
            },
            {
                "type": "Feature",
                "properties": {
                    "NO": 2,
                    "施設・場所名": "港区立みなと小学校",
                    "住所": "東京都港区海岸一丁目"
                },
                "geometry": { "type": "Point", "coordinates": [139.7601, 35.6512] }
            }
        ]
    }"#;

    const TOKYO: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "避難所_施設名称": "港南中学校",
                    "所在地住所": "東京都港区港南四丁目",
                    "エレベーター有/\n避難スペースが１階": "○",
                    "スロープ等": "○",
                    "点字ブロック": "",
                    "車椅子使用者対応トイレ": "×",
                    "その他": "オストメイト対応"
                },
                "geometry": { "type": "Point", "coordinates": [139.7503, 35.6301] }
            }
        ]
    }"#;

    #[test]
    fn test_designated_dataset() {
        let records = load_from_str(DESIGNATED, &FieldSchema::designated()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id.as_str(), "131030001");
        assert_eq!(first.name, "芝公園");
        assert_eq!(first.address, "東京都港区芝公園四丁目");
        assert_eq!(first.location, LngLat::new(139.7487, 35.6568));
        assert_eq!(first.notes.as_deref(), Some("広域避難場所"));
        assert_eq!(first.accepted_persons, None);
        assert!(first.accessibility.is_empty());
    }

    #[test]
    fn test_id_falls_back_to_second_label() {
        let records = load_from_str(DESIGNATED, &FieldSchema::designated()).unwrap();
        assert_eq!(records[1].id.as_str(), "2");
    }

    #[test]
    fn test_tokyo_dataset_accessibility() {
        let records = load_from_str(TOKYO, &FieldSchema::tokyo()).unwrap();
        let record = &records[0];

        assert_eq!(record.id.as_str(), "tokyo-0");
        assert_eq!(record.name, "港南中学校");
        assert!(record.accessibility.elevator_or_ground_floor);
        assert!(record.accessibility.slope);
        assert!(!record.accessibility.braille_blocks);
        assert!(!record.accessibility.wheelchair_toilet);
        assert_eq!(record.accessibility.other.as_deref(), Some("オストメイト対応"));
    }

    #[test]
    fn test_wrong_schema_reports_missing_name() {
        let err = load_from_str(TOKYO, &FieldSchema::designated()).unwrap_err();
        assert!(matches!(err, ShelterLoadError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn test_non_point_geometry_rejected() {
        let json = r#"{"features": [{
            "properties": {"施設・場所名": "x"},
            "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
        }]}"#;
        let err = load_from_str(json, &FieldSchema::designated()).unwrap_err();
        assert!(err.to_string().contains("not a Point"));
    }

    #[test]
    fn test_point_without_coordinates_rejected() {
        let json = r#"{"features": [{
            "properties": {"施設・場所名": "x"},
            "geometry": {"type": "Point", "coordinates": [139.7]}
        }]}"#;
        let err = load_from_str(json, &FieldSchema::designated()).unwrap_err();
        assert!(err.to_string().contains("no valid coordinates"));
    }

    #[test]
    fn test_missing_geometry_rejected() {
        let json = r#"{"features": [{"properties": {"施設・場所名": "x"}, "geometry": null}]}"#;
        let err = load_from_str(json, &FieldSchema::designated()).unwrap_err();
        assert!(err.to_string().contains("missing geometry"));
    }

    #[test]
    fn test_empty_collection() {
        let records = load_from_str(r#"{"features": []}"#, &FieldSchema::designated()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_from_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("shelters.json");
        std::fs::write(&path, DESIGNATED).unwrap();

        let records = load_from_path(&path, &FieldSchema::designated()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_from_missing_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = load_from_path(temp_dir.path().join("nope.json"), &FieldSchema::designated())
            .unwrap_err();
        assert!(matches!(err, ShelterLoadError::NotFound(_)));
    }
}
