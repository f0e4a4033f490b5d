//! Roads API snapping and Places name lookup.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, GoogleMapsClient};
use crate::error::Result;
use crate::models::Coordinate;
use crate::providers::{SnapService, SnappedPoint};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapResponse {
    #[serde(default)]
    snapped_points: Vec<RawSnappedPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnappedPoint {
    location: RoadsLatLng,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoadsLatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    name: Option<String>,
}

fn to_snapped(response: SnapResponse) -> Vec<SnappedPoint> {
    response
        .snapped_points
        .into_iter()
        .map(|p| SnappedPoint {
            coordinate: Coordinate::new(p.location.latitude, p.location.longitude),
            place_id: p.place_id,
        })
        .filter(|p| p.coordinate.is_valid())
        .collect()
}

fn point_param(point: Coordinate) -> String {
    format!("{},{}", point.lat, point.lng)
}

#[async_trait]
impl SnapService for GoogleMapsClient {
    async fn snap_to_roads(
        &self,
        point: Coordinate,
        interpolate: bool,
    ) -> Result<Vec<SnappedPoint>> {
        let url = self.roads_url(
            "snapToRoads",
            &[
                ("path", point_param(point)),
                ("interpolate", interpolate.to_string()),
            ],
        )?;
        let response: SnapResponse = self.transport.get_json("roads", url).await?;
        Ok(to_snapped(response))
    }

    async fn nearest_roads(&self, point: Coordinate) -> Result<Vec<SnappedPoint>> {
        let url = self.roads_url("nearestRoads", &[("points", point_param(point))])?;
        let response: SnapResponse = self.transport.get_json("roads", url).await?;
        Ok(to_snapped(response))
    }

    async fn place_name(&self, place_id: &str) -> Result<Option<String>> {
        let url = self.maps_url(
            "place/details/json",
            &[
                ("place_id", place_id.to_string()),
                ("fields", "name".to_string()),
            ],
        )?;
        let response: DetailsResponse = self.transport.get_json("places", url).await?;
        check_status("places", &response.status)?;

        let name = response
            .result
            .and_then(|r| r.name)
            .filter(|n| !n.trim().is_empty());
        debug!("Place {} resolved to {:?}", place_id, name);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_snap_response() {
        let response: SnapResponse = serde_json::from_value(json!({
            "snappedPoints": [
                { "location": { "latitude": 47.1, "longitude": -122.2 }, "originalIndex": 0, "placeId": "ChIJ1" },
                { "location": { "latitude": 47.2, "longitude": -122.3 } },
                { "location": { "latitude": 123.0, "longitude": -122.3 }, "placeId": "bad" }
            ]
        }))
        .unwrap();

        let points = to_snapped(response);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].place_id.as_deref(), Some("ChIJ1"));
        assert_eq!(points[1].coordinate, Coordinate::new(47.2, -122.3));
    }

    #[test]
    fn test_empty_snap_response() {
        let response: SnapResponse = serde_json::from_value(json!({})).unwrap();
        assert!(to_snapped(response).is_empty());
    }
}
