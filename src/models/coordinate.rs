//! Coordinates, GPS fixes and road polylines.

use chrono::{DateTime, Utc};
use geo::{BoundingRect, Coord, LineString};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a coordinate, rejecting NaN and out-of-range values
    pub fn checked(lat: f64, lng: f64) -> Result<Self, ModelError> {
        let coordinate = Self { lat, lng };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(ModelError::InvalidCoordinate { lat, lng })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.lng, y: c.lat }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(c: Coord<f64>) -> Self {
        Self { lat: c.y, lng: c.x }
    }
}

/// A single GPS reading from the vehicle.
///
/// Request-scoped; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    pub accuracy_m: f64,
}

impl LocationFix {
    pub fn new(
        coordinate: Coordinate,
        timestamp: DateTime<Utc>,
        accuracy_m: f64,
    ) -> Result<Self, ModelError> {
        if !coordinate.is_valid() {
            return Err(ModelError::InvalidCoordinate {
                lat: coordinate.lat,
                lng: coordinate.lng,
            });
        }
        if !(accuracy_m >= 0.0) {
            return Err(ModelError::InvalidAccuracy(accuracy_m));
        }
        Ok(Self {
            coordinate,
            timestamp,
            accuracy_m,
        })
    }

    /// Fix taken now with unknown (zero) accuracy
    pub fn at(lat: f64, lng: f64) -> Result<Self, ModelError> {
        Self::new(Coordinate::checked(lat, lng)?, Utc::now(), 0.0)
    }
}

/// Ordered road geometry. Stored as a `LineString` with x = lng, y = lat.
///
/// Zero or one vertex is a valid (degenerate) polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    line: LineString<f64>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self {
            line: LineString::new(points.into_iter().map(Coord::from).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.line.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.0.is_empty()
    }

    /// Vertices in order
    pub fn points(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.line.0.iter().map(|c| Coordinate::from(*c))
    }

    /// Consecutive vertex pairs
    pub fn segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.line
            .0
            .windows(2)
            .map(|w| (Coordinate::from(w[0]), Coordinate::from(w[1])))
    }

    /// (min_lng, min_lat, max_lng, max_lat), or None when empty
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        self.line
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

}

impl Default for Polyline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Serialize for Polyline {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points())
    }
}

impl<'de> Deserialize<'de> for Polyline {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Coordinate>::deserialize(deserializer).map(Polyline::new)
    }
}

impl FromIterator<Coordinate> for Polyline {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::checked(47.6, -122.3).is_ok());
        assert!(Coordinate::checked(90.5, 0.0).is_err());
        assert!(Coordinate::checked(0.0, -180.1).is_err());
        assert!(Coordinate::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_fix_rejects_negative_accuracy() {
        let c = Coordinate::new(10.0, 10.0);
        assert!(LocationFix::new(c, Utc::now(), -1.0).is_err());
        assert!(LocationFix::new(c, Utc::now(), f64::NAN).is_err());
        assert!(LocationFix::new(c, Utc::now(), 0.0).is_ok());
    }

    #[test]
    fn test_polyline_segments_and_bbox() {
        let line = Polyline::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 2.0),
            Coordinate::new(-1.0, 1.0),
        ]);
        assert_eq!(line.segments().count(), 2);
        assert_eq!(line.bounding_box(), Some((0.0, -1.0, 2.0, 1.0)));
        assert!(Polyline::default().is_empty());
        assert!(Polyline::default().bounding_box().is_none());
        assert_eq!(Polyline::new(vec![Coordinate::new(1.0, 1.0)]).segments().count(), 0);
    }

    #[test]
    fn test_polyline_serializes_as_points() {
        let line = Polyline::new(vec![Coordinate::new(1.0, 2.0)]);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json, serde_json::json!([{ "lat": 1.0, "lng": 2.0 }]));
        let back: Polyline = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }
}
