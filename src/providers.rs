//! Ports to the external services the engine depends on.
//!
//! Adapters implement these traits; services receive them as
//! `Arc<dyn Trait>` so tests can substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AdminContext, Coordinate, RawPlace, RoadClass, RoadWay};

/// Road-graph query service
#[async_trait]
pub trait RoadNetworkSource: Send + Sync {
    /// Named or ref-tagged ways of the given classes within `radius_m` of
    /// `center`. Geometry is already normalized: every returned polyline has
    /// at least two valid vertices.
    async fn query_ways(
        &self,
        center: Coordinate,
        radius_m: f64,
        classes: &[RoadClass],
    ) -> Result<Vec<RoadWay>>;
}

/// A point returned by the snapping service
#[derive(Debug, Clone, PartialEq)]
pub struct SnappedPoint {
    pub coordinate: Coordinate,
    pub place_id: Option<String>,
}

/// Point-to-road snapping service
#[async_trait]
pub trait SnapService: Send + Sync {
    async fn snap_to_roads(&self, point: Coordinate, interpolate: bool)
        -> Result<Vec<SnappedPoint>>;

    async fn nearest_roads(&self, point: Coordinate) -> Result<Vec<SnappedPoint>>;

    /// Display name for a snapped place id
    async fn place_name(&self, place_id: &str) -> Result<Option<String>>;
}

/// Place-search service
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Short identifier used in logs and POI metadata
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        center: Coordinate,
        radius_m: f64,
        category: Option<&str>,
    ) -> Result<Vec<RawPlace>>;
}

/// Reverse geocoding to administrative context
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, point: Coordinate) -> Result<AdminContext>;
}
