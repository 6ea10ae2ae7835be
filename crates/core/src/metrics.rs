//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Card search (queries by outcome, result counts)
//! - Catalog adapters (operations by source type and outcome)
//! - MTGJSON metadata tracking (version updates, recorded imports)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Card searches total by result.
pub static CARD_SEARCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cardcatalog_card_searches_total", "Total card searches"),
        &["result"], // "hit", "empty", "error"
    )
    .unwrap()
});

/// Cards returned per search.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "cardcatalog_search_results",
            "Number of cards returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]),
    )
    .unwrap()
});

// =============================================================================
// Adapter Metrics
// =============================================================================

/// Adapter operations by source type, operation and result.
pub static ADAPTER_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cardcatalog_adapter_operations_total",
            "Catalog adapter operations",
        ),
        &["source", "operation", "result"], // result: "ok", "not_implemented", "error"
    )
    .unwrap()
});

// =============================================================================
// MTGJSON Metadata Metrics
// =============================================================================

/// Version updates written to catalogs.
pub static VERSION_UPDATES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cardcatalog_mtgjson_version_updates_total",
        "MTGJSON versions recorded on catalogs",
    )
    .unwrap()
});

/// Import statistics written to catalogs.
pub static IMPORTS_RECORDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cardcatalog_mtgjson_imports_recorded_total",
        "MTGJSON import statistics recorded on catalogs",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record the outcome of a card search.
pub fn record_search<T, E>(result: &Result<Vec<T>, E>) {
    match result {
        Ok(cards) if cards.is_empty() => {
            CARD_SEARCHES.with_label_values(&["empty"]).inc();
            SEARCH_RESULTS.observe(0.0);
        }
        Ok(cards) => {
            CARD_SEARCHES.with_label_values(&["hit"]).inc();
            SEARCH_RESULTS.observe(cards.len() as f64);
        }
        Err(_) => CARD_SEARCHES.with_label_values(&["error"]).inc(),
    }
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(CARD_SEARCHES.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Adapters
        Box::new(ADAPTER_OPERATIONS.clone()),
        // MTGJSON
        Box::new(VERSION_UPDATES.clone()),
        Box::new(IMPORTS_RECORDED.clone()),
    ]
}
