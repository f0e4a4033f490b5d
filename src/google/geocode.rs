//! Reverse geocoding into administrative context.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, GoogleMapsClient};
use crate::error::Result;
use crate::models::{AdminContext, Coordinate};
use crate::providers::ReverseGeocoder;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Fill each admin level from the first component tagged with it.
///
/// `postal_town` stands in for `locality` where the latter is missing.
pub fn admin_context_from_components<'a, I>(components: I) -> AdminContext
where
    I: IntoIterator<Item = &'a AddressComponent>,
{
    let mut context = AdminContext::default();
    let mut postal_town = None;

    for component in components {
        let name = component.long_name.trim();
        if name.is_empty() {
            continue;
        }
        for kind in &component.types {
            let slot = match kind.as_str() {
                "locality" => &mut context.locality,
                "postal_town" => &mut postal_town,
                "administrative_area_level_2" => &mut context.county,
                "administrative_area_level_1" => &mut context.state,
                "country" => &mut context.country,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(name.to_string());
            }
        }
    }

    if context.locality.is_none() {
        context.locality = postal_town;
    }
    context
}

#[async_trait]
impl ReverseGeocoder for GoogleMapsClient {
    async fn reverse(&self, point: Coordinate) -> Result<AdminContext> {
        let url = self.maps_url(
            "geocode/json",
            &[("latlng", format!("{},{}", point.lat, point.lng))],
        )?;
        let response: GeocodeResponse = self.transport.get_json("geocoding", url).await?;
        check_status("geocoding", &response.status)?;

        let context = admin_context_from_components(
            response
                .results
                .iter()
                .flat_map(|r| r.address_components.iter()),
        );
        debug!("Reverse geocoded ({}, {}) to {:?}", point.lat, point.lng, context);
        Ok(context)
    }
}
