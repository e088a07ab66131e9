use crate::catalog::Catalog;
use crate::models::{GeoPoint, Place, PlaceId, Zone, ZoneId};

pub fn zone(id: ZoneId, name: &str, lat: f64, lon: f64) -> Zone {
    Zone {
        id,
        name: name.to_string(),
        centroid: GeoPoint::new(lat, lon),
    }
}

pub fn place(id: PlaceId, category: &str, zone_id: ZoneId, hours: f64, lat: f64, lon: f64) -> Place {
    Place {
        id,
        name: format!("{category}-{id}"),
        location: GeoPoint::new(lat, lon),
        category: category.to_string(),
        zone_id,
        estimated_duration_hours: hours,
        price_level: None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct VecCatalog {
    pub zones: Vec<Zone>,
    pub places: Vec<Place>,
}

impl VecCatalog {
    pub fn new(zones: Vec<Zone>, places: Vec<Place>) -> Self {
        Self { zones, places }
    }
}

impl Catalog for VecCatalog {
    fn find_zones_all(&self) -> Vec<Zone> {
        self.zones.clone()
    }

    fn find_zone_by_name(&self, name: &str) -> Option<Zone> {
        self.zones.iter().find(|z| z.name == name).cloned()
    }

    fn find_places_by_zone_and_category(&self, zone_id: ZoneId, category: &str) -> Vec<Place> {
        self.places
            .iter()
            .filter(|p| p.zone_id == zone_id && p.category == category)
            .cloned()
            .collect()
    }

    fn find_places_by_category(&self, category: &str) -> Vec<Place> {
        self.places
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }
}
