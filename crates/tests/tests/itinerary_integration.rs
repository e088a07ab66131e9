use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Timelike};
use dayplan_agents::PlannerAgent;
use dayplan_core::{
    haversine_km, CategoryPolicy, GeoPoint, ItineraryEngine, MealWindow, Place, PlanError,
    PlannerConfig, PlanningRequest, Zone, MAX_DURATION_HOURS,
};
use dayplan_observability::AppMetrics;
use dayplan_storage::{load_catalog, CatalogSource, MemoryCatalog, SqliteCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample_catalog.json")
}

fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::from_json_file(sample_catalog_path()).expect("sample catalog should load")
}

fn agent_for(catalog: MemoryCatalog) -> PlannerAgent<MemoryCatalog> {
    PlannerAgent::new(
        ItineraryEngine::default(),
        Arc::new(catalog),
        AppMetrics::shared(),
    )
}

fn total_hours(places: &[Place]) -> f64 {
    places.iter().map(|p| p.estimated_duration_hours).sum()
}

fn assert_unique(places: &[Place]) {
    let ids = places.iter().map(|p| p.id).collect::<HashSet<_>>();
    assert_eq!(ids.len(), places.len(), "duplicate place in itinerary");
}

/// Each non-food hop goes to the closest of the stops still ahead.
fn assert_nearest_neighbor_order(places: &[Place], policy: &CategoryPolicy) {
    let tour = places
        .iter()
        .filter(|p| !policy.is_food(&p.category))
        .collect::<Vec<_>>();

    for idx in 0..tour.len().saturating_sub(1) {
        let hop = haversine_km(tour[idx].location, tour[idx + 1].location);
        for later in &tour[idx + 2..] {
            assert!(
                hop <= haversine_km(tour[idx].location, later.location),
                "stop {} is not the nearest successor of {}",
                tour[idx + 1].id,
                tour[idx].id
            );
        }
    }
}

/// Rebuilds the expected food placement from the non-food order and checks
/// the itinerary against it.
fn assert_meal_placement(places: &[Place], start_hour: u8, policy: &CategoryPolicy) {
    let meal = MealWindow::default();
    let meal_hour = meal.meal_hour(start_hour);
    let (mut food, tour): (Vec<Place>, Vec<Place>) =
        places.iter().cloned().partition(|p| policy.is_food(&p.category));

    let mut expected = Vec::new();
    let mut clock = i32::from(start_hour);
    let mut served = false;
    for stop in tour {
        if !served && meal.contains(meal_hour, clock) {
            if !food.is_empty() {
                expected.push(food.remove(0));
            }
            served = true;
        }
        clock += stop.estimated_duration_hours.round() as i32;
        expected.push(stop);
    }
    expected.extend(food);

    assert_eq!(
        expected.iter().map(|p| p.id).collect::<Vec<_>>(),
        places.iter().map(|p| p.id).collect::<Vec<_>>()
    );
}

#[test]
fn times_square_day_covers_requested_categories() {
    let agent = agent_for(sample_catalog());
    let request = PlanningRequest::new(Some("Times Square"), &["cafe", "toys", "attraction"], 9, 9.0);

    for seed in 0..25 {
        let report = agent.plan_with_seed(&request, seed).unwrap();
        let stops = &report.itinerary.stops;

        assert_eq!(report.zones.zone_ids, vec![14, 3, 7]);
        assert_eq!(stops.iter().filter(|p| p.category == "cafe").count(), 1);
        assert!(stops.iter().any(|p| p.category == "toys"));
        assert!(stops.iter().any(|p| p.category == "attraction"));
        assert!(total_hours(stops) <= 9.0);
        assert_unique(stops);
        assert_nearest_neighbor_order(stops, &CategoryPolicy::default());
        assert_meal_placement(stops, 9, &CategoryPolicy::default());
    }
}

#[test]
fn lone_restaurant_without_zone_hint() {
    let catalog = MemoryCatalog::new(
        vec![Zone {
            id: 22,
            name: "Financial District".to_string(),
            centroid: GeoPoint::new(40.7075, -74.0113),
        }],
        vec![Place {
            id: 1,
            name: "Stone Street Tavern".to_string(),
            location: GeoPoint::new(40.7043, -74.0105),
            category: "restaurant".to_string(),
            zone_id: 22,
            estimated_duration_hours: 1.5,
            price_level: None,
        }],
    )
    .unwrap();
    let agent = agent_for(catalog);

    let request = PlanningRequest::new(None, &["restaurant"], 12, 4.0);
    let report = agent.plan_with_seed(&request, 3).unwrap();

    assert_eq!(report.itinerary.stops.len(), 1);
    assert_eq!(report.itinerary.stops[0].id, 1);
    assert!(report.zones.used_fallback);
}

#[test]
fn category_without_matches_is_skipped() {
    let agent = agent_for(sample_catalog());
    let request = PlanningRequest::new(Some("Chelsea"), &["bowling", "museum", "park"], 10, 6.0);
    let report = agent.plan_with_seed(&request, 8).unwrap();
    let categories = report.itinerary.categories();

    assert!(!categories.contains(&"bowling"));
    assert!(categories.contains(&"museum"));
    assert!(categories.contains(&"park"));
}

#[test]
fn tiny_budget_yields_empty_itinerary_and_no_trip() {
    let agent = agent_for(sample_catalog());
    let request = PlanningRequest::new(None, &["museum", "park", "toys"], 9, 0.5);

    let report = agent.plan_with_seed(&request, 1).unwrap();
    assert!(report.itinerary.is_empty());

    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    let err = agent.plan_trip(&request, today, Some(1)).unwrap_err();
    assert_eq!(err, PlanError::NoMatchingDestinations);
}

#[test]
fn different_seeds_vary_but_respect_budget() {
    let agent = agent_for(sample_catalog());
    let request = PlanningRequest::new(Some("Greenwich Village"), &["museum", "toys", "park"], 9, 5.0);

    let mut distinct = HashSet::new();
    for seed in 0..20 {
        let report = agent.plan_with_seed(&request, seed).unwrap();
        assert!(report.total_hours <= 5.0);
        assert_unique(&report.itinerary.stops);
        distinct.insert(report.itinerary.stops.iter().map(|p| p.id).collect::<Vec<_>>());
    }

    assert!(distinct.len() > 1, "shuffling never changed the selection");
}

#[test]
fn same_seed_same_itinerary() {
    let agent = agent_for(sample_catalog());
    let request = PlanningRequest::new(Some("Upper West Side"), &["zoo", "museum", "cafe"], 10, 7.0);

    let first = agent.plan_with_seed(&request, 2024).unwrap();
    let second = agent.plan_with_seed(&request, 2024).unwrap();
    assert_eq!(first.itinerary, second.itinerary);

    let engine = ItineraryEngine::default();
    let catalog = sample_catalog();
    let direct = engine
        .generate_itinerary(&catalog, &request, &mut StdRng::seed_from_u64(2024))
        .unwrap();
    assert_eq!(direct, first.itinerary);
}

#[test]
fn unknown_zone_resolves_like_no_hint() {
    let agent = agent_for(sample_catalog());
    let unknown = PlanningRequest::new(Some("Atlantis"), &["museum"], 9, 4.0);
    let absent = PlanningRequest::new(None, &["museum"], 9, 4.0);

    let unknown = agent.plan_with_seed(&unknown, 5).unwrap();
    let absent = agent.plan_with_seed(&absent, 5).unwrap();

    assert_eq!(unknown.zones.zone_ids, absent.zones.zone_ids);
    assert_eq!(absent.zones.zone_ids, agent.config().default_zone_ids);
    assert_eq!(unknown.itinerary, absent.itinerary);
    assert_eq!(agent.metrics().zone_fallback_total, 2);
}

#[test]
fn budget_and_uniqueness_hold_across_requests() {
    let agent = agent_for(sample_catalog());
    let zones = [None, Some("Times Square"), Some("Financial District"), Some("Nowhere")];
    let category_sets: [&[&str]; 4] = [
        &["museum", "restaurant", "park"],
        &["cafe", "cafe", "attraction", "toys"],
        &["zoo", "bakery", "museum"],
        &["park", "park", "park"],
    ];

    for (z, zone) in zones.iter().enumerate() {
        for (c, categories) in category_sets.iter().enumerate() {
            for budget in [1.0, 2.5, 4.0, 8.0, 12.0] {
                let start_hour = 8 + (z + c) as u8;
                let request = PlanningRequest::new(*zone, categories, start_hour, budget);
                let report = agent.plan_with_seed(&request, (z * 100 + c) as u64).unwrap();
                let stops = &report.itinerary.stops;

                assert!(total_hours(stops) <= budget);
                assert_unique(stops);
                assert_meal_placement(stops, start_hour, &CategoryPolicy::default());
            }
        }
    }
}

#[test]
fn extractor_reply_becomes_scheduled_trip() {
    let agent = agent_for(sample_catalog());
    let raw = r#"Here you go:
```json
{"tripName": "Village stroll", "zoneName": "Greenwich Village", "startingTime": 10, "duration": 6, "placeCategory": ["museum", "cafe", "park"]}
```"#;
    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    let trip = agent.plan_trip_from_extractor(raw, today, Some(17)).unwrap();

    assert_eq!(trip.trip_name, "Village stroll");
    assert_eq!(trip.schedule.start_at.date(), NaiveDate::from_ymd_opt(2025, 5, 21).unwrap());
    assert_eq!(trip.schedule.start_at.hour(), 10);
    assert_eq!(trip.schedule.end_at.hour(), 16);

    let times = trip.schedule.visits.iter().map(|v| v.visit_at).collect::<Vec<_>>();
    assert!(!times.is_empty());
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(times.iter().all(|t| t.minute() % 10 == 0));
}

#[test]
fn oversized_duration_is_rejected_instead_of_scheduled() {
    let agent = agent_for(sample_catalog());
    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();

    for hours in [MAX_DURATION_HOURS + 0.5, 1.0e10, f64::MAX] {
        let request = PlanningRequest::new(None, &["museum"], 9, hours);
        let err = agent.plan_trip(&request, today, Some(1)).unwrap_err();
        assert!(err.is_invalid_argument(), "{hours} hours: {err}");
    }

    let full_day = PlanningRequest::new(None, &["museum", "park"], 0, MAX_DURATION_HOURS)
        .with_trip_name("All day");
    let trip = agent.plan_trip(&full_day, today, Some(1)).unwrap();
    assert_eq!(trip.trip_name, "All day");
    assert_eq!(
        trip.schedule.end_at,
        NaiveDate::from_ymd_opt(2025, 5, 22)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    );
}

#[test]
fn malformed_extractor_reply_is_invalid() {
    let agent = agent_for(sample_catalog());
    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    let err = agent
        .plan_trip_from_extractor("I could not understand the request.", today, None)
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn sqlite_snapshot_plans_like_json_seed() {
    let store = SqliteCatalog::connect("sqlite::memory:").await.unwrap();
    store.import_seed(&sample_catalog().to_seed()).await.unwrap();
    let from_sqlite = store.load_snapshot().await.unwrap();

    let request = PlanningRequest::new(Some("Times Square"), &["museum", "restaurant", "toys"], 9, 8.0);
    let via_sqlite = agent_for(from_sqlite).plan_with_seed(&request, 41).unwrap();
    let via_json = agent_for(sample_catalog()).plan_with_seed(&request, 41).unwrap();

    assert_eq!(via_sqlite.itinerary, via_json.itinerary);
}

#[tokio::test]
async fn agent_loads_from_json_source() {
    let source = CatalogSource::JsonFile(sample_catalog_path());
    let catalog = load_catalog(&source).await.unwrap();
    assert_eq!(catalog.zones().len(), 6);

    let agent = PlannerAgent::load(&source, PlannerConfig::default(), AppMetrics::shared())
        .await
        .unwrap();
    let zone = agent.nearest_zone(GeoPoint::new(40.7590, -73.9845), 1.5);
    assert_eq!(zone.map(|z| z.id), Some(14));
}
