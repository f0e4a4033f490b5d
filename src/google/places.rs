//! Places nearby search, the primary POI provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{check_status, GoogleMapsClient, LatLng};
use crate::error::Result;
use crate::models::{Coordinate, RawPlace};
use crate::providers::PoiProvider;

const PROVIDER: &str = "google";

/// Places API caps nearby-search radius at 50 km
const MAX_RADIUS_M: f64 = 50_000.0;

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    place_id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    geometry: Option<NearbyGeometry>,
    rating: Option<f64>,
    vicinity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyGeometry {
    location: LatLng,
}

fn to_raw_place(result: NearbyResult) -> Option<RawPlace> {
    let name = result.name.filter(|n| !n.trim().is_empty())?;
    let location = result.geometry?.location;
    let coordinate = Coordinate::new(location.lat, location.lng);
    if !coordinate.is_valid() {
        return None;
    }

    let mut place = RawPlace::new(name, coordinate, PROVIDER).with_tags(&result.types);
    place.place_id = result.place_id;
    place.rating = result.rating.filter(|r| (0.0..=5.0).contains(r));
    place.vicinity = result.vicinity;
    Some(place)
}

#[async_trait]
impl PoiProvider for GoogleMapsClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(
        &self,
        center: Coordinate,
        radius_m: f64,
        category: Option<&str>,
    ) -> Result<Vec<RawPlace>> {
        let mut params = vec![
            ("location", format!("{},{}", center.lat, center.lng)),
            ("radius", format!("{:.0}", radius_m.min(MAX_RADIUS_M))),
        ];
        if let Some(category) = category {
            params.push(("type", category.to_string()));
        }

        let url = self.maps_url("place/nearbysearch/json", &params)?;
        let response: NearbyResponse = self.transport.get_json("places", url).await?;
        check_status("places", &response.status)?;

        let places: Vec<RawPlace> = response.results.into_iter().filter_map(to_raw_place).collect();
        info!("Google returned {} places within {}m", places.len(), radius_m);
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nearby_results() {
        let response: NearbyResponse = serde_json::from_value(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "p1",
                    "name": "Space Needle",
                    "types": ["tourist_attraction", "point_of_interest"],
                    "geometry": { "location": { "lat": 47.6205, "lng": -122.3493 } },
                    "rating": 4.6,
                    "vicinity": "400 Broad St, Seattle"
                },
                {
                    "name": "No geometry",
                    "types": ["cafe"]
                },
                {
                    "place_id": "p3",
                    "name": "Odd rating",
                    "types": ["cafe"],
                    "geometry": { "location": { "lat": 47.0, "lng": -122.0 } },
                    "rating": 7.0
                }
            ]
        }))
        .unwrap();

        let places: Vec<RawPlace> = response.results.into_iter().filter_map(to_raw_place).collect();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].place_id.as_deref(), Some("p1"));
        assert_eq!(places[0].rating, Some(4.6));
        assert_eq!(places[0].tags, vec!["tourist_attraction", "point_of_interest"]);
        assert_eq!(places[1].rating, None);
    }
}
