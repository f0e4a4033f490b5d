//! In-memory fakes for the service ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::models::{AdminContext, Coordinate, Polyline, RawPlace, RoadClass, RoadWay};
use crate::providers::{
    PoiProvider, ReverseGeocoder, RoadNetworkSource, SnapService, SnappedPoint,
};

fn upstream(service: &'static str) -> ProviderError {
    ProviderError::Upstream {
        service,
        status: "UNAVAILABLE".to_string(),
    }
}

/// East-west way crossing longitude 0 at latitude `lat`
pub fn road_way(
    id: i64,
    class: RoadClass,
    name: Option<&str>,
    reference: Option<&str>,
    lat: f64,
) -> RoadWay {
    RoadWay {
        id,
        polyline: Polyline::new(vec![Coordinate::new(lat, -0.001), Coordinate::new(lat, 0.001)]),
        class,
        name: name.map(String::from),
        reference: reference.map(String::from),
    }
}

/// Road network answering per radius and recording every query
#[derive(Default)]
pub struct FakeRoadNetwork {
    by_radius: Vec<(f64, Vec<RoadWay>)>,
    failing: Vec<f64>,
    queried: Mutex<Vec<f64>>,
}

impl FakeRoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_radius(mut self, radius_m: f64, ways: Vec<RoadWay>) -> Self {
        self.by_radius.push((radius_m, ways));
        self
    }

    pub fn failing_at(mut self, radius_m: f64) -> Self {
        self.failing.push(radius_m);
        self
    }

    pub fn queried_radii(&self) -> Vec<f64> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoadNetworkSource for FakeRoadNetwork {
    async fn query_ways(
        &self,
        _center: Coordinate,
        radius_m: f64,
        _classes: &[RoadClass],
    ) -> Result<Vec<RoadWay>> {
        self.queried.lock().unwrap().push(radius_m);
        if self.failing.contains(&radius_m) {
            return Err(upstream("roads"));
        }
        Ok(self
            .by_radius
            .iter()
            .find(|(r, _)| *r == radius_m)
            .map(|(_, ways)| ways.clone())
            .unwrap_or_default())
    }
}

/// Snap service with canned points and place names
#[derive(Default)]
pub struct FakeSnap {
    pub snapped: Vec<SnappedPoint>,
    pub nearest: Vec<SnappedPoint>,
    pub names: HashMap<String, String>,
    pub fail: bool,
}

#[async_trait]
impl SnapService for FakeSnap {
    async fn snap_to_roads(&self, _point: Coordinate, _interpolate: bool) -> Result<Vec<SnappedPoint>> {
        if self.fail {
            return Err(upstream("roads"));
        }
        Ok(self.snapped.clone())
    }

    async fn nearest_roads(&self, _point: Coordinate) -> Result<Vec<SnappedPoint>> {
        if self.fail {
            return Err(upstream("roads"));
        }
        Ok(self.nearest.clone())
    }

    async fn place_name(&self, place_id: &str) -> Result<Option<String>> {
        Ok(self.names.get(place_id).cloned())
    }
}

/// POI provider returning a fixed list regardless of category
pub struct FakePoiProvider {
    pub name: &'static str,
    pub places: Vec<RawPlace>,
    pub fail: bool,
    pub panic: bool,
}

impl FakePoiProvider {
    pub fn new(name: &'static str, places: Vec<RawPlace>) -> Self {
        Self {
            name,
            places,
            fail: false,
            panic: false,
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, Vec::new())
        }
    }

    pub fn panicking(name: &'static str) -> Self {
        Self {
            panic: true,
            ..Self::new(name, Vec::new())
        }
    }
}

#[async_trait]
impl PoiProvider for FakePoiProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(
        &self,
        _center: Coordinate,
        _radius_m: f64,
        _category: Option<&str>,
    ) -> Result<Vec<RawPlace>> {
        if self.panic {
            panic!("provider {} blew up", self.name);
        }
        if self.fail {
            return Err(upstream(self.name));
        }
        Ok(self.places.clone())
    }
}

pub struct FakeGeocoder(pub Option<AdminContext>);

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, _point: Coordinate) -> Result<AdminContext> {
        self.0.clone().ok_or_else(|| upstream("geocoding"))
    }
}
