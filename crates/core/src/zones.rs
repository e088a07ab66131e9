use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::PlannerConfig;
use crate::geo::DistanceMetric;
use crate::models::{GeoPoint, Zone, ZoneId};
use crate::preferences::normalize_text;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneResolution {
    pub zone_ids: Vec<ZoneId>,
    /// The zone matched by name, if any.
    pub anchor: Option<Zone>,
    pub used_fallback: bool,
}

pub struct ZoneResolver<'a, D> {
    config: &'a PlannerConfig,
    metric: &'a D,
}

impl<'a, D> ZoneResolver<'a, D>
where
    D: DistanceMetric,
{
    pub fn new(config: &'a PlannerConfig, metric: &'a D) -> Self {
        Self { config, metric }
    }

    pub fn resolve<C>(&self, catalog: &C, zone_name_hint: Option<&str>) -> ZoneResolution
    where
        C: Catalog + ?Sized,
    {
        let hint = zone_name_hint
            .map(normalize_text)
            .filter(|name| !name.is_empty());

        let Some(name) = hint else {
            return self.fallback();
        };

        let Some(anchor) = catalog.find_zone_by_name(&name) else {
            debug!(zone_name = %name, "zone hint not found, using default zones");
            return self.fallback();
        };

        let zones = catalog.find_zones_all();
        let mut zone_ids = nearest_zones(
            &zones,
            anchor.centroid,
            self.config.nearest_zone_count,
            self.metric,
        )
        .into_iter()
        .map(|zone| zone.id)
        .collect::<Vec<_>>();

        if zone_ids.is_empty() {
            // name lookup and full listing disagree; keep the anchor itself
            zone_ids.push(anchor.id);
        }

        ZoneResolution {
            zone_ids,
            anchor: Some(anchor),
            used_fallback: false,
        }
    }

    fn fallback(&self) -> ZoneResolution {
        ZoneResolution {
            zone_ids: self.config.default_zone_ids.clone(),
            anchor: None,
            used_fallback: true,
        }
    }
}

/// The `count` zones closest to `origin`, ascending. Equal distances keep
/// catalog order.
pub fn nearest_zones<D>(zones: &[Zone], origin: GeoPoint, count: usize, metric: &D) -> Vec<Zone>
where
    D: DistanceMetric + ?Sized,
{
    let mut ranked = zones
        .iter()
        .map(|zone| (metric.distance_km(origin, zone.centroid), zone))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    ranked
        .into_iter()
        .take(count)
        .map(|(_, zone)| zone.clone())
        .collect()
}

/// Closest zone whose centroid lies within `max_distance_km` of `point`.
pub fn nearest_zone_within<D>(
    zones: &[Zone],
    point: GeoPoint,
    max_distance_km: f64,
    metric: &D,
) -> Option<Zone>
where
    D: DistanceMetric + ?Sized,
{
    nearest_zones(zones, point, 1, metric)
        .into_iter()
        .next()
        .filter(|zone| metric.distance_km(point, zone.centroid) <= max_distance_km)
}
