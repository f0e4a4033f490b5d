//! Distance primitives for road proximity.
//!
//! Segment projection is done in local planar (degree) space and the final
//! distance measured with Haversine. This is accurate at road-segment scale,
//! which is all the locator ever feeds it, but is not a geodesic projection.

use crate::models::{Coordinate, Polyline};

/// Mean Earth radius used for all great-circle distances
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters
pub fn great_circle_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Project `p` onto the segment and return the clamped projection
fn project_onto_segment(p: Coordinate, start: Coordinate, end: Coordinate) -> Coordinate {
    let dx = end.lng - start.lng;
    let dy = end.lat - start.lat;
    let len_sq = dx * dx + dy * dy;

    // Zero-length segment
    if len_sq == 0.0 {
        return start;
    }

    let t = (((p.lng - start.lng) * dx + (p.lat - start.lat) * dy) / len_sq).clamp(0.0, 1.0);

    Coordinate::new(start.lat + t * dy, start.lng + t * dx)
}

/// Distance in meters from `p` to the closest point of segment `start`–`end`
pub fn point_to_segment_distance(p: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    great_circle_distance(p, project_onto_segment(p, start, end))
}

/// Minimum distance in meters from `p` to any segment of the polyline.
///
/// Returns `f64::INFINITY` for polylines with fewer than two vertices.
pub fn point_to_polyline_distance(p: Coordinate, polyline: &Polyline) -> f64 {
    polyline
        .segments()
        .map(|(start, end)| point_to_segment_distance(p, start, end))
        .fold(f64::INFINITY, f64::min)
}

/// Closest point on the polyline to `p`, or None for fewer than two vertices
pub fn closest_point_on_polyline(p: Coordinate, polyline: &Polyline) -> Option<Coordinate> {
    let mut best: Option<(Coordinate, f64)> = None;

    for (start, end) in polyline.segments() {
        let candidate = project_onto_segment(p, start, end);
        let distance = great_circle_distance(p, candidate);
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(c, _)| c)
}

/// Arithmetic mean of the vertices
pub fn polyline_centroid(polyline: &Polyline) -> Option<Coordinate> {
    if polyline.is_empty() {
        return None;
    }
    let n = polyline.len() as f64;
    let (lat_sum, lng_sum) = polyline
        .points()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.lat, lng + c.lng));
    Some(Coordinate::new(lat_sum / n, lng_sum / n))
}

/// Summed great-circle length of all segments in meters
pub fn polyline_length(polyline: &Polyline) -> f64 {
    polyline
        .segments()
        .map(|(start, end)| great_circle_distance(start, end))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng)
    }

    #[test]
    fn test_great_circle_known_distance() {
        // One degree of latitude on a 6371 km sphere
        let d = great_circle_distance(c(0.0, 0.0), c(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 1.0, "got {}", d);
        assert_eq!(great_circle_distance(c(45.0, 7.0), c(45.0, 7.0)), 0.0);
    }

    #[test]
    fn test_great_circle_is_symmetric() {
        let a = c(47.6062, -122.3321);
        let b = c(45.5152, -122.6784);
        let ab = great_circle_distance(a, b);
        let ba = great_circle_distance(b, a);
        assert!((ab - ba).abs() < EPS);
        assert!((ab - 233_000.0).abs() < 2_000.0, "got {}", ab);
    }

    #[test]
    fn test_segment_distance_bounded_by_endpoints() {
        let cases = [
            (c(0.001, 0.0005), c(0.0, 0.0), c(0.0, 0.001)),
            (c(0.01, 0.02), c(0.0, 0.0), c(0.0, 0.001)),
            (c(-0.003, -0.004), c(0.0, 0.0), c(0.002, 0.001)),
            (c(47.61, -122.33), c(47.60, -122.34), c(47.62, -122.32)),
            (c(1.0, 1.0), c(1.0, 1.0), c(1.0, 1.0)),
        ];
        for (p, a, b) in cases {
            let d = point_to_segment_distance(p, a, b);
            assert!(d <= great_circle_distance(p, a) + EPS);
            assert!(d <= great_circle_distance(p, b) + EPS);
        }
    }

    #[test]
    fn test_point_on_segment_is_zero() {
        let d = point_to_segment_distance(c(0.0, 0.0005), c(0.0, 0.0), c(0.0, 0.001));
        assert!(d < 1e-3, "got {}", d);

        let d = point_to_segment_distance(c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.001));
        assert!(d < EPS);
    }

    #[test]
    fn test_projection_clamps_to_endpoint() {
        let p = c(0.0, 0.002);
        let d = point_to_segment_distance(p, c(0.0, 0.0), c(0.0, 0.001));
        let to_end = great_circle_distance(p, c(0.0, 0.001));
        assert!((d - to_end).abs() < EPS);
    }

    #[test]
    fn test_zero_length_segment() {
        let p = c(0.001, 0.0);
        let d = point_to_segment_distance(p, c(0.0, 0.0), c(0.0, 0.0));
        assert!(d.is_finite());
        assert!((d - great_circle_distance(p, c(0.0, 0.0))).abs() < EPS);
    }

    #[test]
    fn test_degenerate_polylines_are_infinite() {
        let p = c(0.0, 0.0);
        assert_eq!(point_to_polyline_distance(p, &Polyline::default()), f64::INFINITY);
        let single = Polyline::new(vec![c(0.0, 0.0)]);
        assert_eq!(point_to_polyline_distance(p, &single), f64::INFINITY);
        assert!(closest_point_on_polyline(p, &single).is_none());
    }

    #[test]
    fn test_polyline_distance_is_min_over_segments() {
        let line = Polyline::new(vec![c(0.0, 0.0), c(0.0, 0.01), c(0.01, 0.01)]);
        let p = c(0.005, 0.0101);
        let expected = point_to_segment_distance(p, c(0.0, 0.01), c(0.01, 0.01));
        assert!((point_to_polyline_distance(p, &line) - expected).abs() < EPS);
        assert!(expected < 20.0);
    }

    #[test]
    fn test_closest_point_on_polyline() {
        let line = Polyline::new(vec![c(0.0, 0.0), c(0.0, 0.01)]);
        let closest = closest_point_on_polyline(c(0.001, 0.004), &line).unwrap();
        assert!(closest.lat.abs() < EPS);
        assert!((closest.lng - 0.004).abs() < EPS);
    }

    #[test]
    fn test_centroid_and_length() {
        let line = Polyline::new(vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, 2.0)]);
        assert_eq!(polyline_centroid(&line), Some(c(0.0, 1.0)));
        let expected = 2.0 * great_circle_distance(c(0.0, 0.0), c(0.0, 1.0));
        assert!((polyline_length(&line) - expected).abs() < 1e-3);

        assert!(polyline_centroid(&Polyline::default()).is_none());
        assert_eq!(polyline_length(&Polyline::new(vec![c(3.0, 3.0)])), 0.0);
    }
}
