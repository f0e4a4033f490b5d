//! Service configuration loaded from a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::DiscoveryConfig;
use crate::significance::ScoringWeights;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub transport: TransportSettings,
    pub overpass: OverpassSettings,
    pub google: GoogleSettings,
    pub discovery: DiscoveryConfig,
    pub scoring: ScoringWeights,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TransportSettings {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 3,
            backoff_ms: 500,
            user_agent: format!("roadside/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassSettings {
    pub endpoint: String,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleSettings {
    pub api_key: Option<String>,
    pub maps_base_url: String,
    pub roads_base_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            maps_base_url: "https://maps.googleapis.com/maps/api/".to_string(),
            roads_base_url: "https://roads.googleapis.com/v1/".to_string(),
        }
    }
}

impl Settings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let settings: Settings =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [google]
            api_key = "abc"

            [discovery]
            radius_m = 2500.0
            max_results = 5

            [scoring]
            municipality_bonus = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.google.api_key.as_deref(), Some("abc"));
        assert!(settings.google.roads_base_url.starts_with("https://roads"));
        assert_eq!(settings.discovery.max_results, 5);
        assert_eq!(settings.discovery.min_significance, None);
        assert_eq!(settings.transport.max_attempts, 3);
        assert_eq!(settings.scoring.municipality_bonus, 20.0);
        assert_eq!(settings.scoring.county_or_state_bonus, 10.0);
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.google.api_key.is_none());
        assert_eq!(settings.discovery, DiscoveryConfig::default());
    }
}
