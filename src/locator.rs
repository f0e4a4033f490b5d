//! Progressive highway locator.
//!
//! Queries the road graph at increasing radii and stops at the first radius
//! that yields any way. Each way is measured with point-to-polyline distance
//! and scored for confidence.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::geometry::point_to_polyline_distance;
use crate::models::{
    sort_by_distance, Coordinate, DetectionMethod, Polyline, RoadClass, RoadMatch, RoadWay,
};
use crate::providers::RoadNetworkSource;

/// Search radii in meters, ascending
pub const SEARCH_RADII_M: [f64; 3] = [100.0, 500.0, 2000.0];

/// Largest radius the standard search will use
pub const DEFAULT_MAX_RADIUS_M: f64 = 2000.0;

/// Which filters and scoring the locator applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorProfile {
    /// Motorway through secondary, no class bonus
    Standard,
    /// Motorway through primary, class bonus, combined ref/name labels
    Enhanced,
}

impl LocatorProfile {
    pub fn classes(&self) -> &'static [RoadClass] {
        match self {
            LocatorProfile::Standard => &[
                RoadClass::Motorway,
                RoadClass::Trunk,
                RoadClass::Primary,
                RoadClass::Secondary,
            ],
            LocatorProfile::Enhanced => &[RoadClass::Motorway, RoadClass::Trunk, RoadClass::Primary],
        }
    }

    pub fn method(&self) -> DetectionMethod {
        match self {
            LocatorProfile::Standard => DetectionMethod::Progressive,
            LocatorProfile::Enhanced => DetectionMethod::Enhanced,
        }
    }
}

/// Match confidence from distance, vertex count and (optionally) road class.
///
/// Base 0.5; distance ≤50 m +0.4, ≤200 m +0.3, ≤500 m +0.2, ≤1000 m +0.1;
/// ≥10 vertices +0.1, ≥5 +0.05; clamped to [0, 1].
pub fn road_confidence(distance_m: f64, vertex_count: usize, class_bonus: Option<RoadClass>) -> f64 {
    let mut confidence = 0.5;

    confidence += if distance_m <= 50.0 {
        0.4
    } else if distance_m <= 200.0 {
        0.3
    } else if distance_m <= 500.0 {
        0.2
    } else if distance_m <= 1000.0 {
        0.1
    } else {
        0.0
    };

    if vertex_count >= 10 {
        confidence += 0.1;
    } else if vertex_count >= 5 {
        confidence += 0.05;
    }

    if let Some(class) = class_bonus {
        confidence += class.confidence_bonus();
    }

    confidence.clamp(0.0, 1.0)
}

/// "I 5 (Golden State Freeway)" style label
fn combined_label(way: &RoadWay) -> Option<String> {
    match (way.reference.as_deref(), way.name.as_deref()) {
        (Some(r), Some(n)) if r != n => Some(format!("{} ({})", r, n)),
        (Some(r), _) => Some(r.to_string()),
        (None, Some(n)) => Some(n.to_string()),
        (None, None) => None,
    }
}

/// Expanding-radius highway search over a road-graph source
#[derive(Clone)]
pub struct HighwayLocator {
    source: Arc<dyn RoadNetworkSource>,
    profile: LocatorProfile,
}

impl HighwayLocator {
    pub fn new(source: Arc<dyn RoadNetworkSource>, profile: LocatorProfile) -> Self {
        Self { source, profile }
    }

    /// Ranked road matches near `point`, nearest first.
    ///
    /// Radii above `max_radius_m` are skipped. Never fails: a radius whose
    /// query errors counts as empty and the search moves on.
    pub async fn locate(&self, point: Coordinate, max_radius_m: f64) -> Vec<RoadMatch> {
        for radius in SEARCH_RADII_M.iter().copied().filter(|r| *r <= max_radius_m) {
            let ways = match self
                .source
                .query_ways(point, radius, self.profile.classes())
                .await
            {
                Ok(ways) => ways,
                Err(e) => {
                    warn!(
                        "Road query at {}m around ({}, {}) failed: {}",
                        radius, point.lat, point.lng, e
                    );
                    continue;
                }
            };

            let candidates: Vec<RoadWay> = ways.into_iter().filter(|w| self.accepts(w)).collect();
            if candidates.is_empty() {
                debug!("No roads within {}m, expanding", radius);
                continue;
            }

            let mut matches: Vec<RoadMatch> =
                candidates.into_iter().map(|w| self.score(point, w)).collect();
            sort_by_distance(&mut matches);

            info!(
                "Found {} {} road matches within {}m (nearest {:.1}m)",
                matches.len(),
                self.profile.method(),
                radius,
                matches[0].distance_m
            );
            return matches;
        }

        debug!("No roads found around ({}, {})", point.lat, point.lng);
        Vec::new()
    }

    fn accepts(&self, way: &RoadWay) -> bool {
        if !self.profile.classes().contains(&way.class) || way.label().is_none() {
            return false;
        }
        match self.profile {
            LocatorProfile::Standard => true,
            LocatorProfile::Enhanced => way.polyline.len() >= 2,
        }
    }

    fn score(&self, point: Coordinate, way: RoadWay) -> RoadMatch {
        let distance_m = point_to_polyline_distance(point, &way.polyline);

        let (class_bonus, display_name) = match self.profile {
            LocatorProfile::Standard => (None, way.label().map(String::from)),
            LocatorProfile::Enhanced => (Some(way.class), combined_label(&way)),
        };
        let confidence = road_confidence(distance_m, way.polyline.len(), class_bonus);

        if let Some((min_lng, min_lat, max_lng, max_lat)) = way.polyline.bounding_box() {
            debug!(
                "Way {} spans ({}, {})-({}, {}), {:.1}m away",
                way.id, min_lat, min_lng, max_lat, max_lng, distance_m
            );
        }

        RoadMatch {
            polyline: way.polyline,
            classification: Some(way.class),
            distance_m,
            confidence,
            display_name: display_name.unwrap_or_default(),
            detection_method: self.profile.method(),
        }
    }
}

/// Single-vertex polyline for point-based matches
pub(crate) fn point_polyline(point: Coordinate) -> Polyline {
    Polyline::new(vec![point])
}
