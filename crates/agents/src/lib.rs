use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;
use dayplan_core::{
    build_trip_schedule, nearest_zone_within, next_day_start, parse_planning_request, Catalog,
    GeoPoint, Itinerary, ItineraryEngine, PlanError, PlanResult, PlannerConfig, PlanningRequest,
    TripSchedule, Zone, ZoneResolution,
};
use dayplan_observability::{AppMetrics, MetricsSnapshot};
use dayplan_storage::{load_catalog, CatalogSource, MemoryCatalog};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const DEFAULT_TRIP_NAME: &str = "Day Trip";

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub plan_id: Uuid,
    /// Seed of the request-scoped shuffle; replaying it reproduces the plan.
    pub seed: Option<u64>,
    pub request: PlanningRequest,
    pub itinerary: Itinerary,
    pub zones: ZoneResolution,
    pub candidate_count: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub plan_id: Uuid,
    pub trip_name: String,
    pub seed: Option<u64>,
    pub schedule: TripSchedule,
}

#[derive(Clone)]
pub struct PlannerAgent<C>
where
    C: Catalog,
{
    engine: Arc<ItineraryEngine>,
    catalog: Arc<C>,
    metrics: Arc<AppMetrics>,
}

impl PlannerAgent<MemoryCatalog> {
    pub async fn load(
        source: &CatalogSource,
        config: PlannerConfig,
        metrics: Arc<AppMetrics>,
    ) -> Result<Self> {
        let engine = ItineraryEngine::new(config)?;
        let catalog = load_catalog(source).await?;
        Ok(Self::new(engine, Arc::new(catalog), metrics))
    }
}

impl<C> PlannerAgent<C>
where
    C: Catalog,
{
    pub fn new(engine: ItineraryEngine, catalog: Arc<C>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            engine: Arc::new(engine),
            catalog,
            metrics,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.engine.config()
    }

    /// Plans with a freshly seeded generator owned by this call.
    pub fn plan(&self, request: &PlanningRequest) -> PlanResult<PlanReport> {
        self.plan_with_seed(request, rand::random::<u64>())
    }

    pub fn plan_with_seed(&self, request: &PlanningRequest, seed: u64) -> PlanResult<PlanReport> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut report = self.plan_with_rng(request, &mut rng)?;
        report.seed = Some(seed);
        Ok(report)
    }

    #[instrument(skip(self, request, rng))]
    pub fn plan_with_rng<R>(&self, request: &PlanningRequest, rng: &mut R) -> PlanResult<PlanReport>
    where
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        self.metrics.inc_plan();

        let outcome = match self.engine.plan(self.catalog.as_ref(), request, rng) {
            Ok(outcome) => outcome,
            Err(err) => {
                if err.is_invalid_argument() {
                    self.metrics.inc_invalid_request();
                }
                self.metrics.observe_latency(started.elapsed());
                warn!(error = %err, "planning request rejected");
                return Err(err);
            }
        };

        if outcome.zones.used_fallback {
            self.metrics.inc_zone_fallback();
        }
        if outcome.itinerary.is_empty() {
            self.metrics.inc_empty_itinerary();
        }
        self.metrics.add_places_selected(outcome.itinerary.len());
        self.metrics.observe_latency(started.elapsed());

        let plan_id = Uuid::new_v4();
        info!(
            plan_id = %plan_id,
            zones = ?outcome.zones.zone_ids,
            fallback = outcome.zones.used_fallback,
            candidates = outcome.candidate_count,
            stops = outcome.itinerary.len(),
            hours = outcome.itinerary.total_hours(),
            "itinerary planned"
        );

        Ok(PlanReport {
            plan_id,
            seed: None,
            request: request.clone(),
            total_hours: outcome.itinerary.total_hours(),
            itinerary: outcome.itinerary,
            zones: outcome.zones,
            candidate_count: outcome.candidate_count,
        })
    }

    /// Plans and schedules a trip for the day after `today`. An empty
    /// itinerary is reported as [`PlanError::NoMatchingDestinations`].
    pub fn plan_trip(
        &self,
        request: &PlanningRequest,
        today: NaiveDate,
        seed: Option<u64>,
    ) -> PlanResult<TripPlan> {
        let report = match seed {
            Some(seed) => self.plan_with_seed(request, seed)?,
            None => self.plan(request)?,
        };

        if report.itinerary.is_empty() {
            return Err(PlanError::NoMatchingDestinations);
        }

        let start_at = next_day_start(today, request.start_hour)?;
        let trip_name = request
            .trip_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TRIP_NAME.to_string());

        Ok(TripPlan {
            plan_id: report.plan_id,
            trip_name,
            seed: report.seed,
            schedule: build_trip_schedule(&report.itinerary, start_at, request.duration_hours)?,
        })
    }

    /// Same as [`Self::plan_trip`], starting from the raw reply of the
    /// preference extractor.
    pub fn plan_trip_from_extractor(
        &self,
        raw_reply: &str,
        today: NaiveDate,
        seed: Option<u64>,
    ) -> PlanResult<TripPlan> {
        let request = match parse_planning_request(raw_reply) {
            Ok(request) => request,
            Err(err) => {
                self.metrics.inc_invalid_request();
                return Err(err);
            }
        };
        self.plan_trip(&request, today, seed)
    }

    pub fn zones(&self) -> Vec<Zone> {
        self.catalog.find_zones_all()
    }

    pub fn nearest_zone(&self, point: GeoPoint, max_distance_km: f64) -> Option<Zone> {
        nearest_zone_within(
            &self.catalog.find_zones_all(),
            point,
            max_distance_km,
            self.engine.metric(),
        )
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
