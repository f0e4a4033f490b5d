//! Core data model for road and POI discovery.

pub mod coordinate;
pub mod poi;
pub mod road;

pub use coordinate::{Coordinate, LocationFix, Polyline};
pub use poi::{
    AdminContext, CategoryGroup, DiscoveryConfig, PoiCategory, PoiMetadata, PointOfInterest,
    RawPlace,
};
pub use road::{
    sort_by_distance, DetectionMethod, DetectionMethodResult, RoadClass, RoadMatch, RoadWay,
};

use thiserror::Error;

/// Construction errors for request-scoped model values
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("coordinate out of range: ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("accuracy must be a non-negative number, got {0}")]
    InvalidAccuracy(f64),
}
