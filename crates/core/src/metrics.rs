//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Restaurant fetches (live, demo, fallback) and parse yield
//! - Picker spins
//! - The Gemini collaborator (latency, tokens)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Fetch Metrics
// =============================================================================

/// Fetches completed, by where the restaurants came from.
pub static FETCH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("foodradar_fetch_total", "Total restaurant fetches"),
        &["source"], // "live", "demo", "fallback", "error"
    )
    .unwrap()
});

/// Restaurants recovered from model text by the parser.
pub static PARSED_RESTAURANTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "foodradar_parsed_restaurants_total",
        "Total restaurant records recovered from model output",
    )
    .unwrap()
});

// =============================================================================
// Picker Metrics
// =============================================================================

/// Spins by outcome.
pub static SPINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("foodradar_spins_total", "Total picker spins"),
        &["outcome"], // "winner", "cancelled"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "foodradar_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["service", "status"],
    )
    .unwrap()
});

/// LLM tokens used.
pub static LLM_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("foodradar_llm_tokens_total", "Total LLM tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FETCH_TOTAL.clone()),
        Box::new(PARSED_RESTAURANTS.clone()),
        Box::new(SPINS_TOTAL.clone()),
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(LLM_TOKENS.clone()),
    ]
}
