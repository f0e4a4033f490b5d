//! Maps provider type tags onto the fixed POI taxonomy.

use crate::models::PoiCategory;

/// Tag → category, highest priority first.
///
/// Roads come before everything else so that a road tagged as an attraction
/// is still a road; specific kinds come before generic ones (`fort` before
/// `historic`, `national_park` before `park`).
const CATEGORY_TABLE: &[(&str, PoiCategory)] = &[
    // Roads
    ("highway", PoiCategory::Highway),
    ("motorway", PoiCategory::Highway),
    ("trunk", PoiCategory::Highway),
    ("freeway", PoiCategory::Highway),
    ("interstate", PoiCategory::Highway),
    ("route", PoiCategory::Road),
    ("primary", PoiCategory::Road),
    ("secondary", PoiCategory::Road),
    ("road", PoiCategory::Road),
    // Infrastructure
    ("bridge", PoiCategory::Bridge),
    ("tunnel", PoiCategory::Tunnel),
    ("dam", PoiCategory::Dam),
    ("power_plant", PoiCategory::PowerPlant),
    ("lighthouse", PoiCategory::Lighthouse),
    // Geographic
    ("city", PoiCategory::City),
    ("town", PoiCategory::Town),
    ("locality", PoiCategory::Town),
    ("village", PoiCategory::Village),
    ("hamlet", PoiCategory::Village),
    ("neighborhood", PoiCategory::Neighborhood),
    ("neighbourhood", PoiCategory::Neighborhood),
    ("suburb", PoiCategory::Neighborhood),
    ("sublocality", PoiCategory::Neighborhood),
    ("administrative_area_level_2", PoiCategory::County),
    ("county", PoiCategory::County),
    ("administrative_area_level_1", PoiCategory::State),
    ("state", PoiCategory::State),
    ("border_control", PoiCategory::Border),
    // Military
    ("battlefield", PoiCategory::Battlefield),
    ("fort", PoiCategory::Fort),
    ("military", PoiCategory::MilitaryBase),
    // Transportation
    ("airport", PoiCategory::Airport),
    ("aerodrome", PoiCategory::Airport),
    ("train_station", PoiCategory::TrainStation),
    ("station", PoiCategory::TrainStation),
    ("transit_station", PoiCategory::TrainStation),
    ("ferry_terminal", PoiCategory::Port),
    ("harbour", PoiCategory::Port),
    ("port", PoiCategory::Port),
    ("rest_area", PoiCategory::RestArea),
    ("gas_station", PoiCategory::GasStation),
    ("fuel", PoiCategory::GasStation),
    // Institution
    ("university", PoiCategory::University),
    ("college", PoiCategory::University),
    ("school", PoiCategory::School),
    ("hospital", PoiCategory::Hospital),
    ("city_hall", PoiCategory::Government),
    ("townhall", PoiCategory::Government),
    ("courthouse", PoiCategory::Government),
    ("local_government_office", PoiCategory::Government),
    ("library", PoiCategory::Library),
    ("prison", PoiCategory::Prison),
    // Geological
    ("volcano", PoiCategory::Volcano),
    ("canyon", PoiCategory::Canyon),
    ("gorge", PoiCategory::Canyon),
    ("cave", PoiCategory::Cave),
    ("cave_entrance", PoiCategory::Cave),
    ("arch", PoiCategory::RockFormation),
    ("rock", PoiCategory::RockFormation),
    ("cliff", PoiCategory::RockFormation),
    ("hot_spring", PoiCategory::HotSpring),
    ("geyser", PoiCategory::HotSpring),
    // Natural
    ("peak", PoiCategory::Mountain),
    ("mountain", PoiCategory::Mountain),
    ("ridge", PoiCategory::Mountain),
    ("waterfall", PoiCategory::Waterfall),
    ("river", PoiCategory::River),
    ("stream", PoiCategory::River),
    ("lake", PoiCategory::Lake),
    ("reservoir", PoiCategory::Lake),
    ("water", PoiCategory::Lake),
    ("forest", PoiCategory::Forest),
    ("wood", PoiCategory::Forest),
    ("beach", PoiCategory::Beach),
    ("valley", PoiCategory::Valley),
    ("desert", PoiCategory::Desert),
    // Religious
    ("monastery", PoiCategory::Monastery),
    ("mosque", PoiCategory::Mosque),
    ("hindu_temple", PoiCategory::Temple),
    ("synagogue", PoiCategory::Temple),
    ("temple", PoiCategory::Temple),
    ("church", PoiCategory::Church),
    ("place_of_worship", PoiCategory::Church),
    ("cemetery", PoiCategory::Cemetery),
    ("grave_yard", PoiCategory::Cemetery),
    // Cultural
    ("museum", PoiCategory::Museum),
    ("monument", PoiCategory::Monument),
    ("memorial", PoiCategory::Monument),
    ("castle", PoiCategory::HistoricSite),
    ("ruins", PoiCategory::HistoricSite),
    ("archaeological_site", PoiCategory::HistoricSite),
    ("theatre", PoiCategory::Theater),
    ("movie_theater", PoiCategory::Theater),
    ("art_gallery", PoiCategory::ArtGallery),
    ("gallery", PoiCategory::ArtGallery),
    // Recreation
    ("national_park", PoiCategory::NationalPark),
    ("stadium", PoiCategory::Stadium),
    ("amusement_park", PoiCategory::ThemePark),
    ("theme_park", PoiCategory::ThemePark),
    ("zoo", PoiCategory::Zoo),
    ("aquarium", PoiCategory::Zoo),
    ("golf_course", PoiCategory::GolfCourse),
    ("campground", PoiCategory::Campground),
    ("camp_site", PoiCategory::Campground),
    ("rv_park", PoiCategory::Campground),
    ("ski_resort", PoiCategory::SkiResort),
    ("winter_sports", PoiCategory::SkiResort),
    ("park", PoiCategory::Park),
    ("nature_reserve", PoiCategory::Park),
    // Agricultural
    ("vineyard", PoiCategory::Vineyard),
    ("winery", PoiCategory::Vineyard),
    ("orchard", PoiCategory::Orchard),
    ("ranch", PoiCategory::Ranch),
    ("farm", PoiCategory::Farm),
    ("farmland", PoiCategory::Farm),
    ("farmyard", PoiCategory::Farm),
    // Industrial
    ("refinery", PoiCategory::Refinery),
    ("mine", PoiCategory::Mine),
    ("quarry", PoiCategory::Quarry),
    ("factory", PoiCategory::Factory),
    ("works", PoiCategory::Factory),
    ("warehouse", PoiCategory::Warehouse),
    ("industrial", PoiCategory::Warehouse),
    // Tourism
    ("scenic_overlook", PoiCategory::ScenicOverlook),
    ("viewpoint", PoiCategory::ScenicOverlook),
    ("visitor_center", PoiCategory::VisitorCenter),
    ("information", PoiCategory::VisitorCenter),
    ("tourist_attraction", PoiCategory::TouristAttraction),
    ("attraction", PoiCategory::TouristAttraction),
    ("historic", PoiCategory::HistoricSite),
    // Commercial
    ("lodging", PoiCategory::Lodging),
    ("hotel", PoiCategory::Lodging),
    ("motel", PoiCategory::Lodging),
    ("restaurant", PoiCategory::Restaurant),
    ("cafe", PoiCategory::Restaurant),
    ("fast_food", PoiCategory::Restaurant),
    ("bar", PoiCategory::Restaurant),
    ("shopping_mall", PoiCategory::Shopping),
    ("supermarket", PoiCategory::Shopping),
    ("convenience_store", PoiCategory::Shopping),
    ("store", PoiCategory::Shopping),
];

/// Category used when no tag is recognized
pub const FALLBACK_CATEGORY: PoiCategory = PoiCategory::Landmark;

/// Lowercase with spaces and hyphens folded to underscores
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Category for a tag set. Total: unknown or empty tag sets map to
/// `FALLBACK_CATEGORY`.
pub fn categorize<S: AsRef<str>>(tags: &[S]) -> PoiCategory {
    let normalized: Vec<String> = tags.iter().map(|t| normalize_tag(t.as_ref())).collect();

    CATEGORY_TABLE
        .iter()
        .find(|(tag, _)| normalized.iter().any(|t| t == tag))
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}
