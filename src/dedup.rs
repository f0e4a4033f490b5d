//! Collapses duplicate provider results.

use hashbrown::HashSet;
use tracing::debug;

use crate::models::RawPlace;

/// Identity key: provider place id, else name plus position rounded to
/// four decimal places (about 11 m)
pub fn identity_key(place: &RawPlace) -> String {
    match &place.place_id {
        Some(id) if !id.is_empty() => format!("id:{}", id),
        _ => format!(
            "pos:{}|{:.4}|{:.4}",
            place.name.trim().to_lowercase(),
            place.coordinate.lat,
            place.coordinate.lng
        ),
    }
}

/// Keep the first occurrence of each identity, preserving order
pub fn dedupe(places: Vec<RawPlace>) -> Vec<RawPlace> {
    let before = places.len();
    let mut seen = HashSet::with_capacity(before);

    let unique: Vec<RawPlace> = places
        .into_iter()
        .filter(|p| seen.insert(identity_key(p)))
        .collect();

    if unique.len() < before {
        debug!("Removed {} duplicate places", before - unique.len());
    }
    unique
}
