use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::models::{Itinerary, Place};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledVisit {
    pub place: Place,
    pub visit_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSchedule {
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub visits: Vec<ScheduledVisit>,
}

/// `start_hour:00` on the day after `today`.
pub fn next_day_start(today: NaiveDate, start_hour: u8) -> PlanResult<NaiveDateTime> {
    today
        .succ_opt()
        .and_then(|day| day.and_hms_opt(u32::from(start_hour), 0, 0))
        .ok_or_else(|| PlanError::invalid(format!("cannot schedule a trip at hour {start_hour}")))
}

/// `time + minutes`, or an invalid-argument error when the result leaves
/// chrono's representable range.
fn add_minutes(time: NaiveDateTime, minutes: i64) -> PlanResult<NaiveDateTime> {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| time.checked_add_signed(delta))
        .ok_or_else(|| PlanError::invalid(format!("{minutes} minutes after {time} is out of range")))
}

pub fn round_up_to_ten_minutes(time: NaiveDateTime) -> PlanResult<NaiveDateTime> {
    let truncated = time
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time);
    match truncated.minute() % 10 {
        0 => Ok(truncated),
        remainder => add_minutes(truncated, i64::from(10 - remainder)),
    }
}

/// Each stop starts once the previous stops' estimated durations have
/// elapsed, rounded up to the next 10-minute mark.
pub fn schedule_visits(
    itinerary: &Itinerary,
    start_at: NaiveDateTime,
) -> PlanResult<Vec<ScheduledVisit>> {
    let mut elapsed_hours = 0.0_f64;
    itinerary
        .stops
        .iter()
        .map(|place| -> PlanResult<ScheduledVisit> {
            let offset = (elapsed_hours * 60.0) as i64;
            elapsed_hours += place.estimated_duration_hours;
            Ok(ScheduledVisit {
                place: place.clone(),
                visit_at: round_up_to_ten_minutes(add_minutes(start_at, offset)?)?,
            })
        })
        .collect()
}

pub fn build_trip_schedule(
    itinerary: &Itinerary,
    start_at: NaiveDateTime,
    duration_hours: f64,
) -> PlanResult<TripSchedule> {
    Ok(TripSchedule {
        start_at,
        end_at: add_minutes(start_at, (duration_hours * 60.0).round() as i64)?,
        visits: schedule_visits(itinerary, start_at)?,
    })
}
