use crate::models::GeoPoint;

/// Distance between two coordinates in kilometres. Shared by zone resolution
/// and route sequencing so either can be swapped for a different metric.
pub trait DistanceMetric: Send + Sync {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

/// Great-circle distance on a spherical earth (R = 6371 km).
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        haversine_km(from, to)
    }
}

pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.lat,
            longitude: from.lon,
        },
        haversine::Location {
            latitude: to.lat,
            longitude: to.lon,
        },
        haversine::Units::Kilometers,
    )
}
