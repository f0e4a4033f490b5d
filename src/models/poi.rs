//! Point-of-interest types and discovery configuration.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::categorize::normalize_tag;

/// Broad grouping of POI categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Geographic,
    Infrastructure,
    Institution,
    Natural,
    Cultural,
    Religious,
    Industrial,
    Recreation,
    Military,
    Transportation,
    Geological,
    Agricultural,
    Tourism,
    Commercial,
}

/// Fixed POI taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    // Geographic
    City,
    Town,
    Village,
    Neighborhood,
    County,
    State,
    Border,
    // Infrastructure
    Highway,
    Road,
    Bridge,
    Tunnel,
    Dam,
    PowerPlant,
    Lighthouse,
    // Institution
    University,
    School,
    Hospital,
    Government,
    Library,
    Prison,
    // Natural
    Mountain,
    River,
    Lake,
    Forest,
    Waterfall,
    Beach,
    Valley,
    Desert,
    // Cultural
    Museum,
    Monument,
    HistoricSite,
    Theater,
    ArtGallery,
    Landmark,
    // Religious
    Church,
    Temple,
    Mosque,
    Monastery,
    Cemetery,
    // Industrial
    Factory,
    Mine,
    Quarry,
    Refinery,
    Warehouse,
    // Recreation
    Park,
    NationalPark,
    Stadium,
    ThemePark,
    Zoo,
    GolfCourse,
    Campground,
    SkiResort,
    // Military
    MilitaryBase,
    Battlefield,
    Fort,
    // Transportation
    Airport,
    TrainStation,
    Port,
    RestArea,
    GasStation,
    // Geological
    Volcano,
    Canyon,
    Cave,
    RockFormation,
    HotSpring,
    // Agricultural
    Farm,
    Vineyard,
    Orchard,
    Ranch,
    // Tourism
    TouristAttraction,
    ScenicOverlook,
    VisitorCenter,
    // Commercial
    Restaurant,
    Lodging,
    Shopping,
}

impl PoiCategory {
    pub fn group(&self) -> CategoryGroup {
        use PoiCategory::*;
        match self {
            City | Town | Village | Neighborhood | County | State | Border => {
                CategoryGroup::Geographic
            }
            Highway | Road | Bridge | Tunnel | Dam | PowerPlant | Lighthouse => {
                CategoryGroup::Infrastructure
            }
            University | School | Hospital | Government | Library | Prison => {
                CategoryGroup::Institution
            }
            Mountain | River | Lake | Forest | Waterfall | Beach | Valley | Desert => {
                CategoryGroup::Natural
            }
            Museum | Monument | HistoricSite | Theater | ArtGallery | Landmark => {
                CategoryGroup::Cultural
            }
            Church | Temple | Mosque | Monastery | Cemetery => CategoryGroup::Religious,
            Factory | Mine | Quarry | Refinery | Warehouse => CategoryGroup::Industrial,
            Park | NationalPark | Stadium | ThemePark | Zoo | GolfCourse | Campground
            | SkiResort => CategoryGroup::Recreation,
            MilitaryBase | Battlefield | Fort => CategoryGroup::Military,
            Airport | TrainStation | Port | RestArea | GasStation => {
                CategoryGroup::Transportation
            }
            Volcano | Canyon | Cave | RockFormation | HotSpring => CategoryGroup::Geological,
            Farm | Vineyard | Orchard | Ranch => CategoryGroup::Agricultural,
            TouristAttraction | ScenicOverlook | VisitorCenter => CategoryGroup::Tourism,
            Restaurant | Lodging | Shopping => CategoryGroup::Commercial,
        }
    }

    /// Categories that represent a road the vehicle may be travelling on
    pub fn is_road(&self) -> bool {
        matches!(self, PoiCategory::Highway | PoiCategory::Road)
    }
}

/// Derived metadata attached to a POI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiMetadata {
    /// Road-trip significance, 0 to 100
    pub significance: f64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Distance from the fix in meters (geometric for roads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    /// Provider that produced the underlying record
    pub source: String,
}

/// A categorized, scored point of interest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    pub category: PoiCategory,
    pub coordinate: Coordinate,
    pub description: String,
    pub metadata: PoiMetadata,
}

/// Provider result normalized at the adapter boundary.
///
/// Optional provider fields stay optional here; nothing downstream inspects
/// provider JSON directly.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    pub place_id: Option<String>,
    pub name: String,
    /// Provider type tags in provider order, lowercase
    pub tags: Vec<String>,
    pub coordinate: Coordinate,
    pub rating: Option<f64>,
    pub vicinity: Option<String>,
    /// Geometric distance to the road, for records built from road matches
    pub road_distance_m: Option<f64>,
    pub source: String,
}

impl RawPlace {
    pub fn new(name: impl Into<String>, coordinate: Coordinate, source: &str) -> Self {
        Self {
            place_id: None,
            name: name.into(),
            tags: Vec::new(),
            coordinate,
            rating: None,
            vicinity: None,
            road_distance_m: None,
            source: source.to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.place_id = Some(id.into());
        self
    }

    /// Tags go through the categorizer's normalization so every rule sees
    /// the same form
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| normalize_tag(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Administrative context of the fix from reverse geocoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Per-request discovery parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub radius_m: f64,
    pub max_results: usize,
    pub min_significance: Option<f64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            radius_m: 5000.0,
            max_results: 20,
            min_significance: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_place_tags_are_normalized() {
        let place = RawPlace::new("Pike Place", Coordinate::new(47.6, -122.3), "test")
            .with_tags(["Tourist_Attraction", "  ", " market "]);
        assert_eq!(place.tags, vec!["tourist_attraction", "market"]);
        assert!(place.has_tag("market"));
    }

    #[test]
    fn test_raw_place_tags_fold_spaces_and_hyphens() {
        let place = RawPlace::new("Vista Point", Coordinate::new(37.8, -122.5), "osm")
            .with_tags(["Scenic Overlook", "rest-area"]);
        assert_eq!(place.tags, vec!["scenic_overlook", "rest_area"]);
    }

    #[test]
    fn test_category_groups() {
        assert_eq!(PoiCategory::Highway.group(), CategoryGroup::Infrastructure);
        assert_eq!(PoiCategory::Vineyard.group(), CategoryGroup::Agricultural);
        assert_eq!(PoiCategory::Volcano.group(), CategoryGroup::Geological);
        assert!(PoiCategory::Highway.is_road());
        assert!(!PoiCategory::Bridge.is_road());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&PoiCategory::ScenicOverlook).unwrap();
        assert_eq!(json, "\"scenic_overlook\"");
    }
}
