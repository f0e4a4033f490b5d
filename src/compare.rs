//! Side-by-side evaluation of the four road detection strategies.
//!
//! All strategies run concurrently on the same fix. Each branch is isolated:
//! an error or panic in one is recorded on that branch's result and never
//! affects the others. The comparison returns only after every branch has
//! settled.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{info, warn};

use crate::categorize::categorize;
use crate::error::{ProviderError, Result};
use crate::geometry::great_circle_distance;
use crate::locator::{point_polyline, road_confidence, HighwayLocator, DEFAULT_MAX_RADIUS_M};
use crate::models::{
    sort_by_distance, DetectionMethod, DetectionMethodResult, LocationFix, RoadMatch,
};
use crate::providers::PoiProvider;
use crate::snap::RoadSnapper;

/// Search radius for the legacy POI-based strategy
const LEGACY_RADIUS_M: f64 = 2000.0;

/// Provider category used to ask for roads
const LEGACY_ROAD_CATEGORY: &str = "route";

/// One way of finding the road a fix is on
#[async_trait]
pub trait DetectionStrategy: Send + Sync {
    async fn detect(&self, fix: &LocationFix) -> Result<Vec<RoadMatch>>;
}

/// Point-to-point distance against road-typed POI search results
pub struct LegacyStrategy {
    provider: Arc<dyn PoiProvider>,
}

impl LegacyStrategy {
    pub fn new(provider: Arc<dyn PoiProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DetectionStrategy for LegacyStrategy {
    async fn detect(&self, fix: &LocationFix) -> Result<Vec<RoadMatch>> {
        let places = self
            .provider
            .search(fix.coordinate, LEGACY_RADIUS_M, Some(LEGACY_ROAD_CATEGORY))
            .await?;

        Ok(places
            .into_iter()
            .filter(|p| categorize(&p.tags).is_road())
            .map(|p| {
                let distance_m = great_circle_distance(fix.coordinate, p.coordinate);
                RoadMatch {
                    polyline: point_polyline(p.coordinate),
                    classification: None,
                    distance_m,
                    confidence: road_confidence(distance_m, 1, None),
                    display_name: p.name,
                    detection_method: DetectionMethod::Legacy,
                }
            })
            .collect())
    }
}

#[async_trait]
impl DetectionStrategy for HighwayLocator {
    async fn detect(&self, fix: &LocationFix) -> Result<Vec<RoadMatch>> {
        Ok(self.locate(fix.coordinate, DEFAULT_MAX_RADIUS_M).await)
    }
}

/// Nearest-roads snapping; unlike the hot path, errors are reported
#[async_trait]
impl DetectionStrategy for RoadSnapper {
    async fn detect(&self, fix: &LocationFix) -> Result<Vec<RoadMatch>> {
        self.try_nearby_roads(fix).await
    }
}

/// Stand-in for a strategy whose provider has no credentials
pub struct UnconfiguredStrategy {
    provider: &'static str,
}

impl UnconfiguredStrategy {
    pub fn new(provider: &'static str) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DetectionStrategy for UnconfiguredStrategy {
    async fn detect(&self, _fix: &LocationFix) -> Result<Vec<RoadMatch>> {
        Err(ProviderError::NotConfigured {
            provider: self.provider,
            reason: "adapter was skipped at startup".to_string(),
        })
    }
}

/// Runs all four strategies and collects per-method results
#[derive(Clone)]
pub struct DetectionComparator {
    legacy: Arc<dyn DetectionStrategy>,
    progressive: Arc<dyn DetectionStrategy>,
    road_snap: Arc<dyn DetectionStrategy>,
    enhanced: Arc<dyn DetectionStrategy>,
}

impl DetectionComparator {
    pub fn new(
        legacy: Arc<dyn DetectionStrategy>,
        progressive: Arc<dyn DetectionStrategy>,
        road_snap: Arc<dyn DetectionStrategy>,
        enhanced: Arc<dyn DetectionStrategy>,
    ) -> Self {
        Self {
            legacy,
            progressive,
            road_snap,
            enhanced,
        }
    }

    /// Result for every method, keyed by method. Always has all four keys.
    pub async fn compare(&self, fix: &LocationFix) -> BTreeMap<DetectionMethod, DetectionMethodResult> {
        let (legacy, progressive, road_snap, enhanced) = tokio::join!(
            run_branch(DetectionMethod::Legacy, self.legacy.as_ref(), fix),
            run_branch(DetectionMethod::Progressive, self.progressive.as_ref(), fix),
            run_branch(DetectionMethod::RoadSnap, self.road_snap.as_ref(), fix),
            run_branch(DetectionMethod::Enhanced, self.enhanced.as_ref(), fix),
        );

        let results: BTreeMap<_, _> = [legacy, progressive, road_snap, enhanced]
            .into_iter()
            .map(|r| (r.method, r))
            .collect();

        for result in results.values() {
            info!(
                "{}: {} matches in {}ms, nearest {}",
                result.method,
                result.matches.len(),
                result.processing_time_ms,
                result
                    .matches
                    .first()
                    .map(|m| format!("{} at {:.1}m", m.display_name, m.distance_m))
                    .unwrap_or_else(|| "none".to_string())
            );
        }

        results
    }
}

async fn run_branch(
    method: DetectionMethod,
    strategy: &dyn DetectionStrategy,
    fix: &LocationFix,
) -> DetectionMethodResult {
    let started = Instant::now();
    let outcome = AssertUnwindSafe(strategy.detect(fix)).catch_unwind().await;
    let processing_time_ms = started.elapsed().as_millis();

    let (matches, error) = match outcome {
        Ok(Ok(mut matches)) => {
            sort_by_distance(&mut matches);
            (matches, None)
        }
        Ok(Err(e)) => {
            warn!("Detection method {} failed: {}", method, e);
            (Vec::new(), Some(e.to_string()))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!("Detection method {} panicked: {}", method, message);
            (Vec::new(), Some(format!("panicked: {}", message)))
        }
    };

    DetectionMethodResult {
        method,
        matches,
        processing_time_ms,
        error,
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
