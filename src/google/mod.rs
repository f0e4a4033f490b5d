//! Google Maps Platform adapters: roads, places and geocoding.

mod geocode;
mod places;
mod roads;

use serde::Deserialize;
use url::Url;

use crate::config::GoogleSettings;
use crate::error::{ProviderError, Result};
use crate::transport::HttpTransport;

pub use geocode::{admin_context_from_components, AddressComponent};

/// Client for the Google Roads, Places and Geocoding APIs.
///
/// Construction fails with `ProviderError::NotConfigured` when no API key is
/// available, so callers can skip the adapter up front.
#[derive(Clone)]
pub struct GoogleMapsClient {
    transport: HttpTransport,
    api_key: String,
    maps_base: Url,
    roads_base: Url,
}

/// `{lat, lng}` as used by Places and Geocoding
#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Statuses that mean "answered, possibly with nothing"
fn check_status(service: &'static str, status: &str) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(ProviderError::Upstream {
            service,
            status: other.to_string(),
        }),
    }
}

impl GoogleMapsClient {
    pub fn new(transport: HttpTransport, settings: &GoogleSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::NotConfigured {
                provider: "google",
                reason: "missing API key".to_string(),
            })?
            .to_string();

        Ok(Self {
            transport,
            api_key,
            maps_base: Url::parse(&settings.maps_base_url)?,
            roads_base: Url::parse(&settings.roads_base_url)?,
        })
    }

    /// Maps API endpoint with query parameters and the key appended
    fn maps_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Self::with_params(self.maps_base.join(path)?, params, &self.api_key)
    }

    fn roads_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Self::with_params(self.roads_base.join(path)?, params, &self.api_key)
    }

    fn with_params(mut url: Url, params: &[(&str, String)], key: &str) -> Result<Url> {
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("key", key);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportSettings;

    fn transport() -> HttpTransport {
        HttpTransport::new(&TransportSettings::default()).unwrap()
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let settings = GoogleSettings::default();
        let err = GoogleMapsClient::new(transport(), &settings).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured { provider: "google", .. }));

        let blank = GoogleSettings {
            api_key: Some("   ".to_string()),
            ..GoogleSettings::default()
        };
        assert!(GoogleMapsClient::new(transport(), &blank).is_err());
    }

    #[test]
    fn test_urls_carry_params_and_key() {
        let settings = GoogleSettings {
            api_key: Some("secret".to_string()),
            ..GoogleSettings::default()
        };
        let client = GoogleMapsClient::new(transport(), &settings).unwrap();

        let url = client
            .roads_url("nearestRoads", &[("points", "1.5,2.5".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://roads.googleapis.com/v1/nearestRoads?points=1.5%2C2.5&key=secret"
        );

        let url = client
            .maps_url("place/details/json", &[("place_id", "abc".to_string())])
            .unwrap();
        assert!(url.as_str().starts_with("https://maps.googleapis.com/maps/api/place/details/json?"));
    }

    #[test]
    fn test_status_check() {
        assert!(check_status("places", "OK").is_ok());
        assert!(check_status("places", "ZERO_RESULTS").is_ok());
        assert!(matches!(
            check_status("places", "REQUEST_DENIED"),
            Err(ProviderError::Upstream { .. })
        ));
    }
}
