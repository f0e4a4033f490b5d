//! Road-trip significance scoring.
//!
//! Rules are applied in a fixed order, each at most once, and the total is
//! clamped to [0, 100] only at the end.

use serde::Deserialize;

use crate::geometry::great_circle_distance;
use crate::models::{AdminContext, Coordinate, PoiCategory, RawPlace};

pub const MIN_SIGNIFICANCE: f64 = 0.0;
pub const MAX_SIGNIFICANCE: f64 = 100.0;

/// Tags that make a place stand out from the road
const HIGH_VISIBILITY_TAGS: &[&str] = &[
    "tourist_attraction",
    "attraction",
    "monument",
    "scenic_overlook",
    "viewpoint",
    "park",
    "historic",
    "castle",
];

/// Places likely to appear on road signage
const SIGNAGE_TAGS: &[&str] = &[
    "airport",
    "aerodrome",
    "university",
    "hospital",
    "stadium",
    "city_hall",
    "townhall",
    "courthouse",
    "train_station",
    "capitol",
    "convention_center",
];

/// Small-scale local businesses
const LOCAL_BUSINESS_TAGS: &[&str] = &[
    "restaurant",
    "cafe",
    "fast_food",
    "bar",
    "gas_station",
    "fuel",
    "pharmacy",
    "bank",
    "atm",
    "convenience_store",
    "supermarket",
    "store",
    "laundry",
    "car_wash",
    "car_repair",
    "hair_care",
    "beauty_salon",
];

const MUNICIPALITY_TAGS: &[&str] = &["locality", "city", "town", "village", "municipality"];

const COUNTY_STATE_TAGS: &[&str] = &[
    "administrative_area_level_1",
    "administrative_area_level_2",
    "county",
    "state",
];

/// Tunable rule weights. Thresholds are fixed; only the adjustments vary.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Rating ≥ 4.5
    pub rating_excellent: f64,
    /// Rating ≥ 4.0
    pub rating_great: f64,
    /// Rating ≥ 3.5
    pub rating_good: f64,
    /// Rating < 3.0
    pub rating_poor: f64,
    pub high_visibility: f64,
    /// Road within 50 m
    pub road_on: f64,
    /// Road within 100 m
    pub road_adjacent: f64,
    /// Road within 500 m
    pub road_near: f64,
    /// Road within 2 km: visible but not the one being driven
    pub road_visible: f64,
    /// Road beyond 2 km
    pub road_distant: f64,
    pub municipality_bonus: f64,
    pub county_or_state_bonus: f64,
    pub signage_bonus: f64,
    pub local_business_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating_excellent: 15.0,
            rating_great: 10.0,
            rating_good: 5.0,
            rating_poor: -5.0,
            high_visibility: 10.0,
            road_on: 15.0,
            road_adjacent: 10.0,
            road_near: 5.0,
            road_visible: -15.0,
            road_distant: -35.0,
            municipality_bonus: 15.0,
            county_or_state_bonus: 10.0,
            signage_bonus: 8.0,
            local_business_penalty: -10.0,
        }
    }
}

/// Starting score for a category
pub fn base_score(category: PoiCategory) -> f64 {
    use PoiCategory::*;
    match category {
        Highway => 95.0,
        NationalPark => 92.0,
        City | Town => 90.0,
        Volcano => 90.0,
        Canyon => 88.0,
        Border | Bridge | Mountain | Waterfall | Monument | HistoricSite => 85.0,
        ScenicOverlook | HotSpring => 85.0,
        State | Battlefield => 80.0,
        Tunnel | Dam | Lighthouse | River | Lake | TouristAttraction => 80.0,
        Village | Beach | Museum | Park | ThemePark | Airport | Cave | RockFormation | Fort => 75.0,
        Road => 70.0,
        County | University | Forest | Valley | Desert | Stadium | SkiResort => 70.0,
        Landmark => 65.0,
        Zoo | Monastery => 65.0,
        Government | MilitaryBase | TrainStation | Port | VisitorCenter => 60.0,
        Neighborhood | Hospital | Theater | ArtGallery | Church | Temple | Mosque => 55.0,
        Library | Cemetery => 50.0,
        PowerPlant | Prison | Campground => 45.0,
        School | GolfCourse | RestArea => 40.0,
        Mine | Refinery | Vineyard => 35.0,
        Factory | Farm | Orchard | Ranch | GasStation | Lodging | Shopping => 30.0,
        Quarry | Restaurant => 25.0,
        Warehouse => 20.0,
    }
}

/// What the scorer knows about the traveler
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub origin: Coordinate,
    pub admin: &'a AdminContext,
}

/// Significance scorer with fixed rule order
#[derive(Debug, Clone, Copy, Default)]
pub struct SignificanceScorer {
    weights: ScoringWeights,
}

impl SignificanceScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score a categorized place, 0 to 100
    pub fn score(&self, place: &RawPlace, category: PoiCategory, ctx: &ScoringContext<'_>) -> f64 {
        let w = &self.weights;
        let mut score = base_score(category);

        if let Some(rating) = place.rating {
            score += self.rating_adjustment(rating);
        }

        if has_any(place, HIGH_VISIBILITY_TAGS) {
            score += w.high_visibility;
        }

        if category.is_road() {
            let distance = place
                .road_distance_m
                .unwrap_or_else(|| great_circle_distance(ctx.origin, place.coordinate));
            score += self.proximity_adjustment(distance);
        }

        if is_municipality(place, ctx.admin) {
            score += w.municipality_bonus;
        } else if is_county_or_state(place, ctx.admin) {
            score += w.county_or_state_bonus;
        }

        if has_any(place, SIGNAGE_TAGS) {
            score += w.signage_bonus;
        }

        if has_any(place, LOCAL_BUSINESS_TAGS) {
            score += w.local_business_penalty;
        }

        score.clamp(MIN_SIGNIFICANCE, MAX_SIGNIFICANCE)
    }

    fn rating_adjustment(&self, rating: f64) -> f64 {
        let w = &self.weights;
        if rating >= 4.5 {
            w.rating_excellent
        } else if rating >= 4.0 {
            w.rating_great
        } else if rating >= 3.5 {
            w.rating_good
        } else if rating < 3.0 {
            w.rating_poor
        } else {
            0.0
        }
    }

    /// Non-monotonic: roads the vehicle is on gain, visible-but-distant roads lose
    fn proximity_adjustment(&self, distance_m: f64) -> f64 {
        let w = &self.weights;
        if distance_m <= 50.0 {
            w.road_on
        } else if distance_m <= 100.0 {
            w.road_adjacent
        } else if distance_m <= 500.0 {
            w.road_near
        } else if distance_m <= 2000.0 {
            w.road_visible
        } else {
            w.road_distant
        }
    }
}

fn has_any(place: &RawPlace, set: &[&str]) -> bool {
    place.tags.iter().any(|t| set.contains(&t.as_str()))
}

fn name_matches(place: &RawPlace, admin_name: Option<&String>) -> bool {
    admin_name.is_some_and(|n| n.trim().eq_ignore_ascii_case(place.name.trim()))
}

fn is_municipality(place: &RawPlace, admin: &AdminContext) -> bool {
    has_any(place, MUNICIPALITY_TAGS) || name_matches(place, admin.locality.as_ref())
}

fn is_county_or_state(place: &RawPlace, admin: &AdminContext) -> bool {
    has_any(place, COUNTY_STATE_TAGS)
        || name_matches(place, admin.county.as_ref())
        || name_matches(place, admin.state.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinate = Coordinate { lat: 0.0, lng: 0.0 };

    fn place(name: &str, tags: &[&str]) -> RawPlace {
        RawPlace::new(name, ORIGIN, "test").with_tags(tags)
    }

    fn score(place: &RawPlace, category: PoiCategory, admin: &AdminContext) -> f64 {
        let ctx = ScoringContext {
            origin: ORIGIN,
            admin,
        };
        SignificanceScorer::default().score(place, category, &ctx)
    }

    #[test]
    fn test_base_scores() {
        let admin = AdminContext::default();
        assert_eq!(score(&place("X", &[]), PoiCategory::Landmark, &admin), 65.0);
        assert_eq!(score(&place("X", &[]), PoiCategory::Warehouse, &admin), 20.0);
        assert_eq!(score(&place("X", &[]), PoiCategory::Farm, &admin), 30.0);
    }

    #[test]
    fn test_rating_adjustments() {
        let admin = AdminContext::default();
        let rated = |r: f64| score(&place("X", &[]).with_rating(r), PoiCategory::Museum, &admin);
        assert_eq!(rated(5.0), 90.0);
        assert_eq!(rated(4.5), 90.0);
        assert_eq!(rated(4.2), 85.0);
        assert_eq!(rated(3.5), 80.0);
        assert_eq!(rated(3.2), 75.0);
        assert_eq!(rated(3.0), 75.0);
        assert_eq!(rated(2.9), 70.0);
    }

    #[test]
    fn test_visibility_signage_and_local_penalty() {
        let admin = AdminContext::default();
        let castle = place("Castle", &["historic", "castle", "tourist_attraction"]);
        assert_eq!(score(&castle, PoiCategory::HistoricSite, &admin), 95.0);

        let airport = place("SEA", &["airport"]);
        assert_eq!(score(&airport, PoiCategory::Airport, &admin), 83.0);

        let diner = place("Diner", &["restaurant", "food"]);
        assert_eq!(score(&diner, PoiCategory::Restaurant, &admin), 15.0);
    }

    #[test]
    fn test_spaced_tag_scores_like_its_category() {
        let admin = AdminContext::default();
        let overlook = place("Vista Point", &["Scenic Overlook"]);
        let category = crate::categorize::categorize(&overlook.tags);
        assert_eq!(category, PoiCategory::ScenicOverlook);
        assert_eq!(score(&overlook, category, &admin), 95.0);
    }

    #[test]
    fn test_road_proximity_is_non_monotonic() {
        let admin = AdminContext::default();
        let at = |d: f64| {
            let mut road = place("I 5", &["highway"]);
            road.road_distance_m = Some(d);
            score(&road, PoiCategory::Road, &admin)
        };
        assert_eq!(at(10.0), 85.0);
        assert_eq!(at(50.0), 85.0);
        assert_eq!(at(100.0), 80.0);
        assert_eq!(at(500.0), 75.0);
        assert_eq!(at(2000.0), 55.0);
        assert_eq!(at(2000.1), 35.0);
    }

    #[test]
    fn test_road_proximity_falls_back_to_point_distance() {
        let admin = AdminContext::default();
        let mut road = place("Far Road", &["route"]);
        road.coordinate = Coordinate::new(0.0, 0.1);
        assert_eq!(score(&road, PoiCategory::Road, &admin), 35.0);
    }

    #[test]
    fn test_proximity_only_for_roads() {
        let admin = AdminContext::default();
        let mut lake = place("Lake", &[]);
        lake.road_distance_m = Some(5000.0);
        assert_eq!(score(&lake, PoiCategory::Lake, &admin), 80.0);
    }

    #[test]
    fn test_municipality_wins_over_county() {
        let admin = AdminContext {
            locality: Some("Olympia".to_string()),
            county: Some("Thurston County".to_string()),
            ..AdminContext::default()
        };
        assert_eq!(score(&place("olympia", &[]), PoiCategory::Landmark, &admin), 80.0);
        assert_eq!(score(&place("Thurston County", &[]), PoiCategory::County, &admin), 80.0);
        let both = place("Somewhere", &["locality", "administrative_area_level_2"]);
        assert_eq!(score(&both, PoiCategory::Town, &admin), 100.0);
        assert_eq!(score(&place("Anywhere", &["county"]), PoiCategory::County, &admin), 80.0);
    }

    #[test]
    fn test_adversarial_stacking_is_clamped() {
        let admin = AdminContext {
            locality: Some("Interstate 5".to_string()),
            ..AdminContext::default()
        };
        let mut road = place("Interstate 5", &["highway", "tourist_attraction", "airport"])
            .with_rating(5.0);
        road.road_distance_m = Some(0.0);
        assert_eq!(score(&road, PoiCategory::Highway, &admin), 100.0);

        let mut sad = place("Lot", &["restaurant"]).with_rating(1.0);
        sad.road_distance_m = Some(10_000.0);
        assert_eq!(score(&sad, PoiCategory::Road, &admin), 20.0);

        let mut worse = place("Lot", &["restaurant"]).with_rating(1.0);
        worse.road_distance_m = Some(10_000.0);
        let harsh = SignificanceScorer::new(ScoringWeights {
            road_distant: -200.0,
            ..ScoringWeights::default()
        });
        let ctx = ScoringContext { origin: ORIGIN, admin: &admin };
        assert_eq!(harsh.score(&worse, PoiCategory::Road, &ctx), 0.0);
    }
}
