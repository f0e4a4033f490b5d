//! Road-network queries and way normalization.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{around, OverpassClient, OverpassElement, OverpassResponse};
use crate::error::Result;
use crate::models::{Coordinate, Polyline, RoadClass, RoadWay};
use crate::providers::RoadNetworkSource;

/// Build the union query for named or ref-tagged ways of `classes`
pub(crate) fn build_road_query(center: Coordinate, radius_m: f64, classes: &[RoadClass]) -> String {
    let pattern = classes
        .iter()
        .map(RoadClass::as_osm)
        .collect::<Vec<_>>()
        .join("|");
    let area = around(center, radius_m);

    format!(
        r#"[out:json][timeout:25];
(
  way["highway"~"^({pattern})$"]["name"]{area};
  way["highway"~"^({pattern})$"]["ref"]{area};
);
out geom;"#
    )
}

/// Convert raw way elements into typed road ways.
///
/// Drops elements that are not ways, have an unsupported class, carry
/// neither name nor ref, or have fewer than two valid vertices.
pub fn normalize_ways(response: OverpassResponse) -> Vec<RoadWay> {
    let total = response.elements.len();

    let ways: Vec<RoadWay> = response
        .elements
        .into_iter()
        .filter(|e| e.element_type == "way")
        .filter_map(normalize_way)
        .collect();

    if ways.len() < total {
        debug!("Dropped {} of {} way elements during normalization", total - ways.len(), total);
    }

    ways
}

fn normalize_way(element: OverpassElement) -> Option<RoadWay> {
    let class = RoadClass::from_osm(element.tag("highway")?)?;
    let name = element.tag("name").map(String::from);
    let reference = element.tag("ref").map(String::from);

    if name.is_none() && reference.is_none() {
        return None;
    }

    let points: Vec<Coordinate> = element
        .geometry
        .iter()
        .flatten()
        .map(|p| p.to_coordinate())
        .filter(Coordinate::is_valid)
        .collect();

    if points.len() < 2 {
        return None;
    }

    Some(RoadWay {
        id: element.id,
        polyline: Polyline::new(points),
        class,
        name,
        reference,
    })
}

#[async_trait]
impl RoadNetworkSource for OverpassClient {
    async fn query_ways(
        &self,
        center: Coordinate,
        radius_m: f64,
        classes: &[RoadClass],
    ) -> Result<Vec<RoadWay>> {
        let query = build_road_query(center, radius_m, classes);
        let response = self.execute(&query).await?;
        let ways = normalize_ways(response);

        info!(
            "Overpass returned {} road ways within {}m of ({}, {})",
            ways.len(),
            radius_m,
            center.lat,
            center.lng
        );

        Ok(ways)
    }
}
