use std::sync::Arc;

use crate::models::{Place, Zone, ZoneId};

/// Read-only POI and zone lookups consumed by the itinerary engine.
///
/// Implementations are shared across concurrent requests and must not be
/// mutated while planning. Returned lists keep the catalog's iteration order,
/// which the engine relies on for stable tie-breaking.
pub trait Catalog: Send + Sync {
    fn find_zones_all(&self) -> Vec<Zone>;
    fn find_zone_by_name(&self, name: &str) -> Option<Zone>;
    fn find_places_by_zone_and_category(&self, zone_id: ZoneId, category: &str) -> Vec<Place>;
    fn find_places_by_category(&self, category: &str) -> Vec<Place>;
}

impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    fn find_zones_all(&self) -> Vec<Zone> {
        (**self).find_zones_all()
    }

    fn find_zone_by_name(&self, name: &str) -> Option<Zone> {
        (**self).find_zone_by_name(name)
    }

    fn find_places_by_zone_and_category(&self, zone_id: ZoneId, category: &str) -> Vec<Place> {
        (**self).find_places_by_zone_and_category(zone_id, category)
    }

    fn find_places_by_category(&self, category: &str) -> Vec<Place> {
        (**self).find_places_by_category(category)
    }
}
