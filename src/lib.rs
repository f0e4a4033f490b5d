//! Roadside - highway identification and POI significance for road trips
//!
//! This library locates the highway a vehicle is on, gathers nearby points
//! of interest from OSM and Google, and ranks them by how noticeable they are
//! from the road.

pub mod categorize;
pub mod compare;
pub mod config;
pub mod dedup;
pub mod discovery;
pub mod error;
pub mod fallback;
pub mod geometry;
pub mod google;
pub mod locator;
pub mod models;
pub mod overpass;
pub mod providers;
pub mod significance;
pub mod snap;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use discovery::{filter_by_distance, sort_by_significance, DiscoveryServices, PoiDiscoveryService};
pub use error::ProviderError;
pub use models::{
    Coordinate, DetectionMethod, DetectionMethodResult, DiscoveryConfig, LocationFix,
    PoiCategory, PointOfInterest, RoadMatch,
};
