use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::candidates::CandidateCollector;
use crate::catalog::Catalog;
use crate::config::PlannerConfig;
use crate::error::PlanResult;
use crate::geo::{DistanceMetric, Haversine};
use crate::models::{Itinerary, PlanningRequest};
use crate::preferences::normalize_request;
use crate::selection::SelectionEngine;
use crate::sequencer::RouteSequencer;
use crate::zones::{ZoneResolution, ZoneResolver};

#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub itinerary: Itinerary,
    pub zones: ZoneResolution,
    pub candidate_count: usize,
}

/// Zone resolution, candidate collection, selection and sequencing for one
/// request. Holds no per-request state; randomness comes from the caller.
#[derive(Debug, Clone)]
pub struct ItineraryEngine<D = Haversine> {
    config: PlannerConfig,
    metric: D,
}

impl Default for ItineraryEngine<Haversine> {
    fn default() -> Self {
        Self {
            config: PlannerConfig::default(),
            metric: Haversine,
        }
    }
}

impl ItineraryEngine<Haversine> {
    pub fn new(config: PlannerConfig) -> PlanResult<Self> {
        Self::with_metric(config, Haversine)
    }
}

impl<D> ItineraryEngine<D>
where
    D: DistanceMetric,
{
    pub fn with_metric(config: PlannerConfig, metric: D) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config, metric })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn metric(&self) -> &D {
        &self.metric
    }

    pub fn generate_itinerary<C, R>(
        &self,
        catalog: &C,
        request: &PlanningRequest,
        rng: &mut R,
    ) -> PlanResult<Itinerary>
    where
        C: Catalog + ?Sized,
        R: Rng + ?Sized,
    {
        self.plan(catalog, request, rng).map(|outcome| outcome.itinerary)
    }

    #[instrument(skip_all, fields(zone_hint = ?request.zone_name, duration = request.duration_hours))]
    pub fn plan<C, R>(
        &self,
        catalog: &C,
        request: &PlanningRequest,
        rng: &mut R,
    ) -> PlanResult<PlanOutcome>
    where
        C: Catalog + ?Sized,
        R: Rng + ?Sized,
    {
        let request = normalize_request(request)?;

        let zones = ZoneResolver::new(&self.config, &self.metric)
            .resolve(catalog, request.zone_name.as_deref());

        let candidates = CandidateCollector::new(&self.config).collect(
            catalog,
            &zones.zone_ids,
            &request.categories,
            rng,
        );

        let selected = SelectionEngine::new(&self.config.categories).select(
            &candidates,
            &request.categories,
            request.duration_hours,
        );

        let stops = RouteSequencer::new(&self.config.categories, &self.config.meal, &self.metric)
            .sequence(selected, request.start_hour);

        debug!(
            zones = ?zones.zone_ids,
            candidates = candidates.len(),
            stops = stops.len(),
            "itinerary generated"
        );

        Ok(PlanOutcome {
            itinerary: Itinerary::new(stops),
            zones,
            candidate_count: candidates.len(),
        })
    }
}
