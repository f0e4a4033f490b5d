//! OSM points of interest via Overpass, used as the secondary POI provider.

use async_trait::async_trait;
use tracing::info;

use super::{around, OverpassClient, OverpassElement};
use crate::error::Result;
use crate::models::{Coordinate, RawPlace};
use crate::providers::PoiProvider;

const PROVIDER: &str = "osm";

/// Tag keys whose values become POI type tags, in priority order
const TYPE_KEYS: &[&str] = &[
    "highway", "place", "boundary", "aeroway", "railway", "military", "historic", "tourism",
    "natural", "waterway", "leisure", "amenity", "man_made", "landuse", "building", "shop",
];

/// Keys that also contribute themselves as a tag, e.g. `historic=castle`
/// yields both "historic" and "castle"
const KEY_TAGS: &[&str] = &["historic", "military", "shop"];

const MAX_ELEMENTS: usize = 200;

pub(crate) fn build_poi_query(center: Coordinate, radius_m: f64) -> String {
    let area = around(center, radius_m);
    let clauses: String = [
        "tourism", "historic", "natural", "leisure", "amenity", "man_made", "aeroway", "military",
    ]
    .iter()
    .map(|key| format!("  nwr[\"{key}\"][\"name\"]{area};\n"))
    .collect();

    format!(
        "[out:json][timeout:25];\n(\n{clauses}  node[\"place\"][\"name\"]{area};\n);\nout center {MAX_ELEMENTS};"
    )
}

/// Flatten OSM tags into ordered, lowercase type tags
pub(crate) fn type_tags(element: &OverpassElement) -> Vec<String> {
    let mut tags = Vec::new();
    for key in TYPE_KEYS {
        let Some(value) = element.tag(key) else {
            continue;
        };
        if KEY_TAGS.contains(key) {
            tags.push(key.to_string());
        }
        if value != "yes" {
            tags.push(value.to_lowercase());
        }
    }
    tags.dedup();
    tags
}

fn to_raw_place(element: &OverpassElement) -> Option<RawPlace> {
    let name = element.tag("name")?;
    let coordinate = element.position()?;

    let mut place = RawPlace::new(name, coordinate, PROVIDER)
        .with_id(format!("osm:{}/{}", element.element_type, element.id))
        .with_tags(type_tags(element));
    place.vicinity = element.tag("addr:city").map(String::from);

    Some(place)
}

#[async_trait]
impl PoiProvider for OverpassClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(
        &self,
        center: Coordinate,
        radius_m: f64,
        category: Option<&str>,
    ) -> Result<Vec<RawPlace>> {
        let response = self.execute(&build_poi_query(center, radius_m)).await?;

        let places: Vec<RawPlace> = response
            .elements
            .iter()
            .filter_map(to_raw_place)
            .filter(|p| category.map_or(true, |c| p.has_tag(c)))
            .collect();

        info!("OSM returned {} places within {}m", places.len(), radius_m);
        Ok(places)
    }
}
