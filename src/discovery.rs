//! POI discovery: the top-level entry point.
//!
//! Resolves administrative context, nearby highways and provider POIs
//! concurrently, then merges, deduplicates, categorizes, scores and ranks
//! them. Discovery never fails: any error or panic, or an empty outcome,
//! degrades to the fixed fallback set.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join3;
use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::categorize::categorize;
use crate::compare::{
    panic_message, DetectionComparator, DetectionStrategy, LegacyStrategy, UnconfiguredStrategy,
};
use crate::config::Settings;
use crate::dedup::{dedupe, identity_key};
use crate::error::ProviderError;
use crate::fallback::fallback_pois;
use crate::geometry::{closest_point_on_polyline, great_circle_distance, polyline_centroid};
use crate::google::GoogleMapsClient;
use crate::locator::{HighwayLocator, LocatorProfile};
use crate::models::{
    AdminContext, Coordinate, DetectionMethod, DetectionMethodResult, DiscoveryConfig,
    LocationFix, PoiMetadata, PointOfInterest, RawPlace, RoadClass, RoadMatch,
};
use crate::overpass::OverpassClient;
use crate::providers::{PoiProvider, ReverseGeocoder, RoadNetworkSource, SnapService};
use crate::significance::{ScoringContext, ScoringWeights, SignificanceScorer};
use crate::snap::RoadSnapper;
use crate::transport::HttpTransport;

const ROAD_SOURCE: &str = "roads";

/// Internal failure that triggers the fallback set
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid discovery config: {0}")]
    InvalidConfig(String),
    #[error("invalid location: ({lat}, {lng})")]
    InvalidLocation { lat: f64, lng: f64 },
}

/// External collaborators. Optional ports are skipped when absent.
#[derive(Clone)]
pub struct DiscoveryServices {
    pub roads: Arc<dyn RoadNetworkSource>,
    pub snap: Option<Arc<dyn SnapService>>,
    pub primary_pois: Option<Arc<dyn PoiProvider>>,
    pub secondary_pois: Option<Arc<dyn PoiProvider>>,
    pub geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

/// Discovers and ranks POIs around a fix
#[derive(Clone)]
pub struct PoiDiscoveryService {
    locator: HighwayLocator,
    comparator: DetectionComparator,
    primary_pois: Option<Arc<dyn PoiProvider>>,
    secondary_pois: Option<Arc<dyn PoiProvider>>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
    scorer: SignificanceScorer,
}

impl PoiDiscoveryService {
    pub fn new(services: DiscoveryServices, weights: ScoringWeights) -> Self {
        let locator = HighwayLocator::new(services.roads.clone(), LocatorProfile::Standard);
        let enhanced = HighwayLocator::new(services.roads, LocatorProfile::Enhanced);

        let legacy: Arc<dyn DetectionStrategy> = match &services.primary_pois {
            Some(provider) => Arc::new(LegacyStrategy::new(provider.clone())),
            None => Arc::new(UnconfiguredStrategy::new("poi search")),
        };
        let road_snap: Arc<dyn DetectionStrategy> = match services.snap {
            Some(service) => Arc::new(RoadSnapper::new(service)),
            None => Arc::new(UnconfiguredStrategy::new("road snapping")),
        };
        let comparator = DetectionComparator::new(
            legacy,
            Arc::new(locator.clone()),
            road_snap,
            Arc::new(enhanced),
        );

        Self {
            locator,
            comparator,
            primary_pois: services.primary_pois,
            secondary_pois: services.secondary_pois,
            geocoder: services.geocoder,
            scorer: SignificanceScorer::new(weights),
        }
    }

    /// Wire up the Overpass and Google adapters from settings.
    ///
    /// Google is optional: without an API key, snapping, primary POI search
    /// and reverse geocoding are skipped and OSM becomes the only POI source.
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let transport = HttpTransport::new(&settings.transport)?;
        let overpass = Arc::new(OverpassClient::new(transport.clone(), &settings.overpass)?);

        let services = match GoogleMapsClient::new(transport, &settings.google) {
            Ok(google) => {
                let google = Arc::new(google);
                DiscoveryServices {
                    roads: overpass.clone(),
                    snap: Some(google.clone()),
                    primary_pois: Some(google.clone()),
                    secondary_pois: Some(overpass),
                    geocoder: Some(google),
                }
            }
            Err(e @ ProviderError::NotConfigured { .. }) => {
                warn!("{}; continuing with OSM only", e);
                DiscoveryServices {
                    roads: overpass.clone(),
                    snap: None,
                    primary_pois: Some(overpass),
                    secondary_pois: None,
                    geocoder: None,
                }
            }
            Err(e) => return Err(e),
        };

        Ok(Self::new(services, settings.scoring))
    }

    /// Ranked POIs around the fix.
    ///
    /// Failures, panics and searches that find nothing yield the fallback
    /// set, which honors `min_significance` and is never empty. The result
    /// is empty only when real candidates were scored and the caller's
    /// threshold removed all of them, including every fallback entry.
    pub async fn discover_pois(
        &self,
        fix: &LocationFix,
        config: &DiscoveryConfig,
    ) -> Vec<PointOfInterest> {
        let outcome = AssertUnwindSafe(self.try_discover(fix, config))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(ranked)) if !ranked.pois.is_empty() => ranked.pois,
            Ok(Ok(ranked)) if ranked.scored > 0 => {
                info!(
                    "All {} scored POIs fell below the significance threshold",
                    ranked.scored
                );
                fallback_for(fix, config, true)
            }
            Ok(Ok(_)) => {
                warn!("Discovery found nothing, using fallback POIs");
                fallback_for(fix, config, false)
            }
            Ok(Err(e)) => {
                error!("Discovery failed, using fallback POIs: {}", e);
                fallback_for(fix, config, false)
            }
            Err(panic) => {
                error!(
                    "Discovery panicked, using fallback POIs: {}",
                    panic_message(panic.as_ref())
                );
                fallback_for(fix, config, false)
            }
        }
    }

    /// Per-method road detection results for tuning
    pub async fn compare_detection_methods(
        &self,
        fix: &LocationFix,
    ) -> BTreeMap<DetectionMethod, DetectionMethodResult> {
        self.comparator.compare(fix).await
    }

    async fn try_discover(
        &self,
        fix: &LocationFix,
        config: &DiscoveryConfig,
    ) -> Result<Ranked, DiscoveryError> {
        validate(fix, config)?;
        let origin = fix.coordinate;

        let (admin, roads, places) = join3(
            self.admin_context(origin),
            self.locator.locate(origin, config.radius_m),
            self.search_pois(origin, config.radius_m),
        )
        .await;

        info!(
            "Discovery at ({}, {}): {} roads, {} places, locality {:?}",
            origin.lat,
            origin.lng,
            roads.len(),
            places.len(),
            admin.locality
        );

        let merged: Vec<RawPlace> = roads
            .iter()
            .filter_map(|m| road_to_place(m, origin))
            .chain(places)
            .collect();
        let unique = dedupe(merged);

        let ctx = ScoringContext {
            origin,
            admin: &admin,
        };
        let scored = unique.len();
        let mut pois: Vec<PointOfInterest> = unique
            .into_iter()
            .map(|place| self.build_poi(place, &ctx))
            .filter(|poi| meets_threshold(poi, config))
            .collect();

        sort_by_significance(&mut pois);
        pois.truncate(config.max_results);

        debug!("Discovery produced {} of {} scored POIs", pois.len(), scored);
        Ok(Ranked { pois, scored })
    }

    async fn admin_context(&self, point: Coordinate) -> AdminContext {
        let Some(geocoder) = &self.geocoder else {
            return AdminContext::default();
        };
        geocoder.reverse(point).await.unwrap_or_else(|e| {
            warn!("Reverse geocoding failed: {}", e);
            AdminContext::default()
        })
    }

    /// Primary provider, then the secondary one if the primary found nothing
    async fn search_pois(&self, center: Coordinate, radius_m: f64) -> Vec<RawPlace> {
        let providers = [&self.primary_pois, &self.secondary_pois];

        for provider in providers.into_iter().flatten() {
            match provider.search(center, radius_m, None).await {
                Ok(places) if !places.is_empty() => return places,
                Ok(_) => info!("{} returned no places", provider.name()),
                Err(e) => warn!("{} search failed: {}", provider.name(), e),
            }
        }

        Vec::new()
    }

    fn build_poi(&self, place: RawPlace, ctx: &ScoringContext<'_>) -> PointOfInterest {
        let category = categorize(&place.tags);
        let significance = self.scorer.score(&place, category, ctx);
        let distance_m = place
            .road_distance_m
            .unwrap_or_else(|| great_circle_distance(ctx.origin, place.coordinate));

        PointOfInterest {
            id: place.place_id.clone().unwrap_or_else(|| identity_key(&place)),
            description: describe(&place, distance_m),
            name: place.name,
            category,
            coordinate: place.coordinate,
            metadata: PoiMetadata {
                significance,
                tags: place.tags,
                rating: place.rating,
                distance_m: Some(distance_m),
                source: place.source,
            },
        }
    }
}

/// Discovery output before fallback handling
struct Ranked {
    pois: Vec<PointOfInterest>,
    /// Candidates scored before the significance threshold
    scored: usize,
}

fn meets_threshold(poi: &PointOfInterest, config: &DiscoveryConfig) -> bool {
    config
        .min_significance
        .map_or(true, |min| poi.metadata.significance >= min)
}

/// Fallback set filtered by the caller's threshold. When nothing passes,
/// a failed search still gets the full set; a search whose results were all
/// filtered out stays empty.
fn fallback_for(
    fix: &LocationFix,
    config: &DiscoveryConfig,
    filtered_out: bool,
) -> Vec<PointOfInterest> {
    let all = fallback_pois(fix);
    let mut pois: Vec<PointOfInterest> = all
        .iter()
        .filter(|poi| meets_threshold(poi, config))
        .cloned()
        .collect();

    if pois.is_empty() && !filtered_out {
        debug!("No fallback POI meets the threshold, returning all of them");
        pois = all;
    }

    pois.truncate(config.max_results.max(1));
    pois
}

fn validate(fix: &LocationFix, config: &DiscoveryConfig) -> Result<(), DiscoveryError> {
    if !fix.coordinate.is_valid() {
        return Err(DiscoveryError::InvalidLocation {
            lat: fix.coordinate.lat,
            lng: fix.coordinate.lng,
        });
    }
    if !(config.radius_m.is_finite() && config.radius_m > 0.0) {
        return Err(DiscoveryError::InvalidConfig(format!(
            "radius must be positive, got {}",
            config.radius_m
        )));
    }
    if config.max_results == 0 {
        return Err(DiscoveryError::InvalidConfig(
            "max_results must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Raw place for a road match, positioned at the closest point of the road.
///
/// Segments of one road share an id so only the nearest survives dedupe.
fn road_to_place(road: &RoadMatch, origin: Coordinate) -> Option<RawPlace> {
    if road.display_name.trim().is_empty() {
        return None;
    }

    let coordinate = closest_point_on_polyline(origin, &road.polyline)
        .or_else(|| polyline_centroid(&road.polyline))?;

    let tags: &[&str] = match road.classification {
        Some(RoadClass::Motorway) => &["highway", "motorway"],
        Some(RoadClass::Trunk) => &["highway", "trunk"],
        Some(RoadClass::Primary) => &["primary", "road"],
        Some(RoadClass::Secondary) => &["secondary", "road"],
        None => &["road"],
    };

    let mut place = RawPlace::new(road.display_name.clone(), coordinate, ROAD_SOURCE)
        .with_id(format!("road:{}", road.display_name.to_lowercase()))
        .with_tags(tags);
    place.road_distance_m = Some(road.distance_m);
    Some(place)
}

fn describe(place: &RawPlace, distance_m: f64) -> String {
    let distance = if distance_m < 1000.0 {
        format!("{:.0} m", distance_m)
    } else {
        format!("{:.1} km", distance_m / 1000.0)
    };
    match &place.vicinity {
        Some(vicinity) => format!("{}, {}, {} away", place.name, vicinity, distance),
        None => format!("{}, {} away", place.name, distance),
    }
}

/// POIs within `max_m` meters of `center`, order preserved
pub fn filter_by_distance(
    pois: Vec<PointOfInterest>,
    center: Coordinate,
    max_m: f64,
) -> Vec<PointOfInterest> {
    pois.into_iter()
        .filter(|poi| great_circle_distance(center, poi.coordinate) <= max_m)
        .collect()
}

/// Most significant first; ties keep their order
pub fn sort_by_significance(pois: &mut [PointOfInterest]) {
    pois.sort_by(|a, b| b.metadata.significance.total_cmp(&a.metadata.significance));
}
