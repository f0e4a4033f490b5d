//! Deterministic fallback POIs used when discovery cannot produce results.

use crate::geometry::great_circle_distance;
use crate::models::{Coordinate, LocationFix, PoiCategory, PoiMetadata, PointOfInterest};

const SOURCE: &str = "fallback";

/// Offsets in degrees from the fix with fixed names and scores
const FALLBACK_ENTRIES: &[(&str, PoiCategory, f64, f64, f64, &str)] = &[
    (
        "Nearby Town Center",
        PoiCategory::Town,
        0.01,
        0.0,
        60.0,
        "A nearby community along your route.",
    ),
    (
        "Regional Landmark",
        PoiCategory::Landmark,
        0.0,
        0.015,
        50.0,
        "A local landmark in the surrounding area.",
    ),
    (
        "Scenic Viewpoint",
        PoiCategory::ScenicOverlook,
        -0.012,
        -0.008,
        45.0,
        "A viewpoint overlooking the landscape.",
    ),
];

/// Fixed, non-empty POI set around the fix. Same input always yields the
/// same output.
pub fn fallback_pois(fix: &LocationFix) -> Vec<PointOfInterest> {
    let origin = fix.coordinate;

    FALLBACK_ENTRIES
        .iter()
        .enumerate()
        .map(|(i, (name, category, d_lat, d_lng, significance, description))| {
            let coordinate = Coordinate::new(
                (origin.lat + d_lat).clamp(-90.0, 90.0),
                (origin.lng + d_lng).clamp(-180.0, 180.0),
            );
            PointOfInterest {
                id: format!("fallback-{}-{:.4}-{:.4}", i, origin.lat, origin.lng),
                name: name.to_string(),
                category: *category,
                coordinate,
                description: description.to_string(),
                metadata: PoiMetadata {
                    significance: *significance,
                    tags: vec![SOURCE.to_string()],
                    rating: None,
                    distance_m: Some(great_circle_distance(origin, coordinate)),
                    source: SOURCE.to_string(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_deterministic_and_valid() {
        let fix = LocationFix::at(89.995, 179.999).unwrap();
        let a = fallback_pois(&fix);
        let b = fallback_pois(&fix);

        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.coordinate, y.coordinate);
        }
        for poi in &a {
            assert!(poi.coordinate.is_valid());
            assert!((0.0..=100.0).contains(&poi.metadata.significance));
        }
    }
}
