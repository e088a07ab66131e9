use serde::{Deserialize, Serialize};

pub type ZoneId = i64;
pub type PlaceId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub centroid: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub location: GeoPoint,
    pub category: String,
    pub zone_id: ZoneId,
    pub estimated_duration_hours: f64,
    #[serde(default)]
    pub price_level: Option<String>,
}

/// Structured preferences for one planning request. Field aliases accept the
/// camelCase shape produced by the preference extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningRequest {
    #[serde(default, alias = "tripName")]
    pub trip_name: Option<String>,
    #[serde(default, alias = "zoneName")]
    pub zone_name: Option<String>,
    #[serde(alias = "placeCategory")]
    pub categories: Vec<String>,
    #[serde(alias = "startingTime")]
    pub start_hour: u8,
    #[serde(alias = "duration")]
    pub duration_hours: f64,
}

impl PlanningRequest {
    pub fn new(
        zone_name: Option<&str>,
        categories: &[&str],
        start_hour: u8,
        duration_hours: f64,
    ) -> Self {
        Self {
            trip_name: None,
            zone_name: zone_name.map(ToString::to_string),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            start_hour,
            duration_hours,
        }
    }

    pub fn with_trip_name(mut self, name: impl Into<String>) -> Self {
        self.trip_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub stops: Vec<Place>,
}

impl Itinerary {
    pub fn new(stops: Vec<Place>) -> Self {
        Self { stops }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn total_hours(&self) -> f64 {
        total_hours(&self.stops)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.stops.iter().map(|p| p.category.as_str()).collect()
    }
}

pub fn total_hours(places: &[Place]) -> f64 {
    places.iter().map(|p| p.estimated_duration_hours).sum()
}
