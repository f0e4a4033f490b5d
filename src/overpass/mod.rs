//! Overpass API adapter: road geometry and OSM points of interest.

mod pois;
mod roads;

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::OverpassSettings;
use crate::error::Result;
use crate::models::Coordinate;
use crate::transport::HttpTransport;

pub use roads::normalize_ways;

const SERVICE: &str = "overpass";

/// Client for an Overpass QL interpreter endpoint
#[derive(Clone)]
pub struct OverpassClient {
    transport: HttpTransport,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Node position
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Way/relation center from `out center`
    pub center: Option<OverpassPoint>,
    /// Full vertex list from `out geom`; clipped vertices come back as null
    #[serde(default)]
    pub geometry: Vec<Option<OverpassPoint>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassPoint {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassPoint {
    pub fn to_coordinate(self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

impl OverpassElement {
    /// Representative position: node coordinate or way center
    pub fn position(&self) -> Option<Coordinate> {
        let position = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => self.center.map(OverpassPoint::to_coordinate),
        };
        position.filter(Coordinate::is_valid)
    }

    /// Non-empty, trimmed tag value
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl OverpassClient {
    pub fn new(transport: HttpTransport, settings: &OverpassSettings) -> Result<Self> {
        Ok(Self {
            transport,
            endpoint: Url::parse(&settings.endpoint)?,
        })
    }

    /// Run an Overpass QL query
    pub async fn execute(&self, query: &str) -> Result<OverpassResponse> {
        debug!("Overpass query: {}", query);

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("data", query);

        self.transport.get_json(SERVICE, url).await
    }
}

/// `(around:radius,lat,lon)` filter
fn around(center: Coordinate, radius_m: f64) -> String {
    format!("(around:{:.0},{},{})", radius_m, center.lat, center.lng)
}
