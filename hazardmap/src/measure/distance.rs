//! Interactive distance measurement.

use geo::{HaversineDistance, LineString, Point};
use serde_json::{json, Value};

use crate::coord::LngLat;

/// A measurement point with its cumulative-distance label.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurePoint {
    pub id: u64,
    pub position: LngLat,
    /// Cumulative distance from the first point, empty for the first point
    pub label: String,
}

/// What the host draws for a measurement session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasureOverlay {
    pub points: Vec<MeasurePoint>,
    /// Present once there are at least two points
    pub line: Option<LineString<f64>>,
}

impl MeasureOverlay {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// GeoJSON FeatureCollection: the points, then the line if any.
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .points
            .iter()
            .map(|p| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [p.position.lng, p.position.lat] },
                    "properties": { "id": p.id, "distance": p.label },
                })
            })
            .collect();

        if let Some(line) = &self.line {
            let coordinates: Vec<[f64; 2]> = line.coords().map(|c| [c.x, c.y]).collect();
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": {},
            }));
        }

        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// Formats a distance in kilometres with two decimals.
pub fn format_km(meters: f64) -> String {
    format!("{:.2}km", meters / 1000.0)
}

/// Ordered measurement points placed by context clicks.
#[derive(Debug, Clone, Default)]
pub struct DistanceSession {
    points: Vec<(u64, LngLat)>,
    next_id: u64,
}

impl DistanceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point and returns its id.
    pub fn add_point(&mut self, position: LngLat) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.points.push((id, position));
        id
    }

    /// Removes a point. Returns false if no point has that id.
    pub fn remove_point(&mut self, id: u64) -> bool {
        let before = self.points.len();
        self.points.retain(|(point_id, _)| *point_id != id);
        self.points.len() != before
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total great-circle length of the measured path in metres.
    pub fn total_meters(&self) -> f64 {
        self.cumulative_meters().last().copied().unwrap_or(0.0)
    }

    fn cumulative_meters(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut prev: Option<Point<f64>> = None;
        self.points
            .iter()
            .map(|(_, pos)| {
                let here = Point::new(pos.lng, pos.lat);
                if let Some(p) = prev {
                    total += p.haversine_distance(&here);
                }
                prev = Some(here);
                total
            })
            .collect()
    }

    /// Builds the overlay: labelled points and, with two or more points, the line.
    pub fn overlay(&self) -> MeasureOverlay {
        let cumulative = self.cumulative_meters();
        let with_line = self.points.len() > 1;

        let points = self
            .points
            .iter()
            .zip(&cumulative)
            .enumerate()
            .map(|(i, ((id, position), meters))| MeasurePoint {
                id: *id,
                position: *position,
                label: if i == 0 || !with_line {
                    String::new()
                } else {
                    format_km(*meters)
                },
            })
            .collect();

        let line: Option<LineString<f64>> = with_line.then(|| {
            self.points
                .iter()
                .map(|(_, pos)| (pos.lng, pos.lat))
                .collect::<Vec<_>>()
                .into()
        });

        MeasureOverlay { points, line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_has_no_line_or_label() {
        let mut session = DistanceSession::new();
        session.add_point(LngLat::new(139.7671, 35.6812));

        let overlay = session.overlay();
        assert_eq!(overlay.points.len(), 1);
        assert_eq!(overlay.points[0].label, "");
        assert!(overlay.line.is_none());
    }

    #[test]
    fn test_cumulative_labels() {
        let mut session = DistanceSession::new();
        // One degree of longitude along the equator is about 111.2 km
        session.add_point(LngLat::new(0.0, 0.0));
        session.add_point(LngLat::new(1.0, 0.0));
        session.add_point(LngLat::new(2.0, 0.0));

        let overlay = session.overlay();
        assert_eq!(overlay.points[0].label, "");
        assert_eq!(overlay.points[1].label, "111.20km");
        assert_eq!(overlay.points[2].label, "222.39km");
        assert_eq!(overlay.line.as_ref().unwrap().0.len(), 3);
        assert!((session.total_meters() - 222_390.16).abs() < 1.0);
    }

    #[test]
    fn test_remove_point_relabels() {
        let mut session = DistanceSession::new();
        session.add_point(LngLat::new(0.0, 0.0));
        let middle = session.add_point(LngLat::new(1.0, 0.0));
        session.add_point(LngLat::new(1.0, 1.0));

        assert!(session.remove_point(middle));
        assert!(!session.remove_point(middle));

        let overlay = session.overlay();
        assert_eq!(overlay.points.len(), 2);
        // Straight from (0,0) to (1,1)
        assert_eq!(overlay.points[1].label, "157.25km");
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut session = DistanceSession::new();
        let a = session.add_point(LngLat::new(0.0, 0.0));
        session.remove_point(a);
        let b = session.add_point(LngLat::new(0.0, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_clear() {
        let mut session = DistanceSession::new();
        session.add_point(LngLat::new(0.0, 0.0));
        session.add_point(LngLat::new(1.0, 0.0));
        session.clear();

        assert!(session.is_empty());
        assert!(session.overlay().is_empty());
        assert_eq!(session.total_meters(), 0.0);
    }

    #[test]
    fn test_geojson_shape() {
        let mut session = DistanceSession::new();
        session.add_point(LngLat::new(0.0, 0.0));
        session.add_point(LngLat::new(1.0, 0.0));

        let geojson = session.overlay().to_geojson();
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[1]["properties"]["distance"], "111.20km");
        assert_eq!(features[2]["geometry"]["type"], "LineString");
    }
}
