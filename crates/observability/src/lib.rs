use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    plans_total: AtomicU64,
    invalid_requests_total: AtomicU64,
    empty_itineraries_total: AtomicU64,
    zone_fallback_total: AtomicU64,
    places_selected_total: AtomicU64,
    total_latency_micros: AtomicU64,
    latency_samples_total: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub plans_total: u64,
    pub invalid_requests_total: u64,
    pub empty_itineraries_total: u64,
    pub zone_fallback_total: u64,
    pub places_selected_total: u64,
    pub latency_samples_total: u64,
    pub avg_latency_micros: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_plan(&self) {
        self.plans_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_invalid_request(&self) {
        self.invalid_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_itinerary(&self) {
        self.empty_itineraries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_zone_fallback(&self) {
        self.zone_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_places_selected(&self, count: usize) {
        self.places_selected_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.latency_samples_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let samples = self.latency_samples_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            plans_total: self.plans_total.load(Ordering::Relaxed),
            invalid_requests_total: self.invalid_requests_total.load(Ordering::Relaxed),
            empty_itineraries_total: self.empty_itineraries_total.load(Ordering::Relaxed),
            zone_fallback_total: self.zone_fallback_total.load(Ordering::Relaxed),
            places_selected_total: self.places_selected_total.load(Ordering::Relaxed),
            latency_samples_total: samples,
            avg_latency_micros: if samples == 0 {
                0.0
            } else {
                latency as f64 / samples as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,dayplan_agents=info,dayplan_storage=info,dayplan_core=warn",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
