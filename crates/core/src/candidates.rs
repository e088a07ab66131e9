use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::PlannerConfig;
use crate::models::{Place, PlaceId, ZoneId};

pub struct CandidateCollector<'a> {
    config: &'a PlannerConfig,
}

impl<'a> CandidateCollector<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Builds the candidate pool for every (zone, category) pair. Each pair's
    /// matches are shuffled with `rng` and capped by the category's tier; the
    /// pool is deduplicated by place id in first-seen order.
    pub fn collect<C, R>(
        &self,
        catalog: &C,
        zone_ids: &[ZoneId],
        categories: &[String],
        rng: &mut R,
    ) -> Vec<Place>
    where
        C: Catalog + ?Sized,
        R: Rng + ?Sized,
    {
        let mut pool = CandidatePool::default();

        if zone_ids.is_empty() {
            debug!("no zones resolved, collecting candidates citywide");
            for category in categories {
                let matches = catalog.find_places_by_category(category);
                pool.extend(self.sample(matches, category, rng));
            }
            return pool.into_places();
        }

        for &zone_id in zone_ids {
            for category in categories {
                let matches = catalog.find_places_by_zone_and_category(zone_id, category);
                pool.extend(self.sample(matches, category, rng));
            }
        }

        pool.into_places()
    }

    fn sample<R>(&self, mut matches: Vec<Place>, category: &str, rng: &mut R) -> Vec<Place>
    where
        R: Rng + ?Sized,
    {
        matches.shuffle(rng);
        matches.truncate(self.config.cap_for(category));
        matches
    }
}

#[derive(Default)]
struct CandidatePool {
    seen: HashSet<PlaceId>,
    places: Vec<Place>,
}

impl CandidatePool {
    fn extend(&mut self, places: Vec<Place>) {
        for place in places {
            if self.seen.insert(place.id) {
                self.places.push(place);
            }
        }
    }

    fn into_places(self) -> Vec<Place> {
        self.places
    }
}
