//! Snap-to-road matching.

use std::sync::Arc;

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::great_circle_distance;
use crate::models::{sort_by_distance, DetectionMethod, LocationFix, Polyline, RoadMatch};
use crate::providers::{SnapService, SnappedPoint};

/// Displacement at which snap confidence reaches zero
pub const SNAP_CONFIDENCE_RANGE_M: f64 = 1000.0;

const UNNAMED_ROAD: &str = "Unnamed road";

/// Linear confidence: 1.0 at 0 m, 0.0 at 1000 m and beyond
pub fn snap_confidence(distance_m: f64) -> f64 {
    (1.0 - distance_m / SNAP_CONFIDENCE_RANGE_M).clamp(0.0, 1.0)
}

/// Road matcher backed by a snapping service
#[derive(Clone)]
pub struct RoadSnapper {
    service: Arc<dyn SnapService>,
}

impl RoadSnapper {
    pub fn new(service: Arc<dyn SnapService>) -> Self {
        Self { service }
    }

    /// Best snapped road for the fix, or None if snapping fails or finds nothing
    pub async fn snap(&self, fix: &LocationFix) -> Option<RoadMatch> {
        match self.try_snap(fix).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Snap to road failed: {}", e);
                None
            }
        }
    }

    /// Candidate roads near the fix, nearest first; empty on failure
    pub async fn nearby_roads(&self, fix: &LocationFix) -> Vec<RoadMatch> {
        self.try_nearby_roads(fix).await.unwrap_or_else(|e| {
            warn!("Nearest roads lookup failed: {}", e);
            Vec::new()
        })
    }

    pub async fn try_snap(&self, fix: &LocationFix) -> Result<Option<RoadMatch>> {
        let points = self.service.snap_to_roads(fix.coordinate, true).await?;
        let mut matches = self.to_matches(fix, points).await;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }

    pub async fn try_nearby_roads(&self, fix: &LocationFix) -> Result<Vec<RoadMatch>> {
        let points = self.service.nearest_roads(fix.coordinate).await?;
        Ok(self.to_matches(fix, points).await)
    }

    /// One match per distinct place id, sorted by displacement
    async fn to_matches(&self, fix: &LocationFix, points: Vec<SnappedPoint>) -> Vec<RoadMatch> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for point in points {
            if let Some(id) = &point.place_id {
                if !seen.insert(id.clone()) {
                    continue;
                }
            }

            let distance_m = great_circle_distance(fix.coordinate, point.coordinate);
            let display_name = match &point.place_id {
                Some(id) => self.resolve_name(id).await,
                None => UNNAMED_ROAD.to_string(),
            };

            matches.push(RoadMatch {
                polyline: Polyline::new(vec![point.coordinate]),
                classification: None,
                distance_m,
                confidence: snap_confidence(distance_m),
                display_name,
                detection_method: DetectionMethod::RoadSnap,
            });
        }

        sort_by_distance(&mut matches);
        debug!("Snapping produced {} candidate roads", matches.len());
        matches
    }

    async fn resolve_name(&self, place_id: &str) -> String {
        match self.service.place_name(place_id).await {
            Ok(Some(name)) => name,
            Ok(None) => UNNAMED_ROAD.to_string(),
            Err(e) => {
                debug!("Place lookup for {} failed: {}", place_id, e);
                UNNAMED_ROAD.to_string()
            }
        }
    }
}
