//! Road geometry and road-match types.

use serde::{Deserialize, Serialize};

use super::Polyline;

/// Road classification, following OSM `highway=*` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadClass {
    /// Interstate-equivalent
    Motorway,
    /// National-highway-equivalent
    Trunk,
    /// State-highway-equivalent
    Primary,
    Secondary,
}

impl RoadClass {
    /// Parse an OSM `highway` tag value
    pub fn from_osm(value: &str) -> Option<Self> {
        match value {
            "motorway" => Some(RoadClass::Motorway),
            "trunk" => Some(RoadClass::Trunk),
            "primary" => Some(RoadClass::Primary),
            "secondary" => Some(RoadClass::Secondary),
            _ => None,
        }
    }

    pub fn as_osm(&self) -> &'static str {
        match self {
            RoadClass::Motorway => "motorway",
            RoadClass::Trunk => "trunk",
            RoadClass::Primary => "primary",
            RoadClass::Secondary => "secondary",
        }
    }

    /// Confidence bonus applied by the enhanced locator
    pub fn confidence_bonus(&self) -> f64 {
        match self {
            RoadClass::Motorway => 0.1,
            RoadClass::Trunk => 0.08,
            RoadClass::Primary => 0.05,
            RoadClass::Secondary => 0.0,
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_osm())
    }
}

/// A road way normalized from the road-graph service
#[derive(Debug, Clone)]
pub struct RoadWay {
    pub id: i64,
    pub polyline: Polyline,
    pub class: RoadClass,
    pub name: Option<String>,
    /// Route reference, e.g. "I 5" or "US 101"
    pub reference: Option<String>,
}

impl RoadWay {
    /// Name if present, otherwise the route reference
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.reference.as_deref())
    }
}

/// Strategy that produced a road match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Point-to-point distance against POI search results
    Legacy,
    /// Progressive radius search, point-to-polyline distance
    Progressive,
    /// External snap-to-road service
    RoadSnap,
    /// Progressive search with stricter filters and class bonus
    Enhanced,
}

impl DetectionMethod {
    pub fn all() -> &'static [DetectionMethod] {
        &[
            DetectionMethod::Legacy,
            DetectionMethod::Progressive,
            DetectionMethod::RoadSnap,
            DetectionMethod::Enhanced,
        ]
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMethod::Legacy => write!(f, "legacy"),
            DetectionMethod::Progressive => write!(f, "progressive"),
            DetectionMethod::RoadSnap => write!(f, "road_snap"),
            DetectionMethod::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// A road near the fix with its distance and match confidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadMatch {
    pub polyline: Polyline,
    /// None when the source (e.g. snapping) carries no classification
    pub classification: Option<RoadClass>,
    pub distance_m: f64,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub display_name: String,
    pub detection_method: DetectionMethod,
}

/// Outcome of one detection strategy in a comparison run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionMethodResult {
    pub method: DetectionMethod,
    /// Sorted by ascending distance
    pub matches: Vec<RoadMatch>,
    pub processing_time_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Sort matches nearest first
pub fn sort_by_distance(matches: &mut [RoadMatch]) {
    matches.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
}
