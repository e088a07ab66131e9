pub mod candidates;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod planner;
pub mod policy;
pub mod preferences;
pub mod schedule;
pub mod selection;
pub mod sequencer;
pub mod zones;

#[cfg(test)]
mod fixtures;

pub use catalog::Catalog;
pub use config::{MealWindow, PlannerConfig};
pub use error::{PlanError, PlanResult};
pub use geo::{haversine_km, DistanceMetric, Haversine};
pub use models::*;
pub use planner::{ItineraryEngine, PlanOutcome};
pub use policy::{CategoryPolicy, InstanceTier, MealTier};
pub use preferences::{
    extract_json_block, normalize_request, parse_planning_request, validate_request,
    MAX_DURATION_HOURS,
};
pub use schedule::{build_trip_schedule, next_day_start, ScheduledVisit, TripSchedule};
pub use zones::{nearest_zone_within, nearest_zones, ZoneResolution};
