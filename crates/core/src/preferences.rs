use crate::error::{PlanError, PlanResult};
use crate::models::PlanningRequest;

/// A plan covers a single day.
pub const MAX_DURATION_HOURS: f64 = 24.0;

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_category(input: &str) -> String {
    normalize_text(input).to_lowercase()
}

/// Rejects requests the engine cannot plan for.
pub fn validate_request(request: &PlanningRequest) -> PlanResult<()> {
    if !request.duration_hours.is_finite() || request.duration_hours <= 0.0 {
        return Err(PlanError::invalid(format!(
            "duration must be a positive number of hours, got {}",
            request.duration_hours
        )));
    }

    if request.duration_hours > MAX_DURATION_HOURS {
        return Err(PlanError::invalid(format!(
            "duration must not exceed {MAX_DURATION_HOURS} hours, got {}",
            request.duration_hours
        )));
    }

    if request.start_hour > 23 {
        return Err(PlanError::invalid(format!(
            "start hour must be within 0-23, got {}",
            request.start_hour
        )));
    }

    if request
        .categories
        .iter()
        .all(|category| normalize_category(category).is_empty())
    {
        return Err(PlanError::invalid("at least one place category is required"));
    }

    Ok(())
}

/// Validates `request` and returns a copy with trimmed, lowercased categories
/// (blank entries dropped) and a whitespace-normalized zone hint.
pub fn normalize_request(request: &PlanningRequest) -> PlanResult<PlanningRequest> {
    validate_request(request)?;

    let categories = request
        .categories
        .iter()
        .map(|category| normalize_category(category))
        .filter(|category| !category.is_empty())
        .collect();

    let zone_name = request
        .zone_name
        .as_deref()
        .map(normalize_text)
        .filter(|name| !name.is_empty());

    Ok(PlanningRequest {
        trip_name: request.trip_name.clone(),
        zone_name,
        categories,
        start_hour: request.start_hour,
        duration_hours: request.duration_hours,
    })
}

/// The substring from the first `{` to the last `}` of an extractor reply,
/// which may wrap its JSON in prose or code fences.
pub fn extract_json_block(raw: &str) -> PlanResult<&str> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&raw[start..=end]),
        _ => Err(PlanError::invalid(
            "preference extractor response does not contain a JSON object",
        )),
    }
}

pub fn parse_planning_request(raw: &str) -> PlanResult<PlanningRequest> {
    let block = extract_json_block(raw)?;
    let request: PlanningRequest = serde_json::from_str(block)
        .map_err(|err| PlanError::invalid(format!("malformed preferences: {err}")))?;
    normalize_request(&request)
}
