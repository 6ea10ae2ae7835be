//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the card catalog server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog, set and card counts (collected on scrape)
//!
//! Search and adapter metrics live in `cardcatalog_core::metrics` and are
//! registered here as well.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cardcatalog_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cardcatalog_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cardcatalog_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Catalogs by source type.
pub static CATALOGS_BY_SOURCE: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "cardcatalog_catalogs",
            "Number of catalogs by source type",
        ),
        &["source_type"],
    )
    .unwrap()
});

/// Stored sets.
pub static SETS_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("cardcatalog_sets", "Number of stored sets").unwrap()
});

/// Stored card printings.
pub static CARDS_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("cardcatalog_cards", "Number of stored card printings").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOGS_BY_SOURCE.clone()))
        .unwrap();
    registry.register(Box::new(SETS_TOTAL.clone())).unwrap();
    registry.register(Box::new(CARDS_TOTAL.clone())).unwrap();

    // Core metrics (search, adapters, MTGJSON metadata)
    for metric in cardcatalog_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the stores at scrape time.
pub fn collect_dynamic_metrics(state: &AppState) {
    if let Ok(catalogs) = state.catalogs().list() {
        for source_type in cardcatalog_core::SourceType::ALL {
            let count = catalogs
                .iter()
                .filter(|c| c.source_type == source_type)
                .count();
            CATALOGS_BY_SOURCE
                .with_label_values(&[source_type.as_str()])
                .set(count as i64);
        }
    }

    if let Ok(stats) = state.cards().stats() {
        SETS_TOTAL.set(stats.total_sets as i64);
        CARDS_TOTAL.set(stats.total_cards as i64);
    }
}

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});

static SET_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/sets/[^/]+").unwrap());

static CARD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/cards/[^/]+").unwrap());

static ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/entries/[^/]+").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    let result = UUID_REGEX.replace_all(path, "{id}");
    let result = SET_CODE_REGEX.replace_all(&result, "/sets/{code}");
    let result = CARD_REGEX.replace_all(&result, "/cards/{uuid}");
    let result = ENTRY_REGEX.replace_all(&result, "/entries/{identifier}");
    let result = NUMERIC_REGEX.replace_all(&result, "/{id}$1");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/api/v1/catalogs/550e8400-e29b-41d4-a716-446655440000/meta";
        assert_eq!(normalize_path(path), "/api/v1/catalogs/{id}/meta");
    }

    #[test]
    fn test_normalize_path_set_code() {
        assert_eq!(normalize_path("/api/v1/sets/MH3"), "/api/v1/sets/{code}");
        assert_eq!(
            normalize_path("/api/v1/sets/LEA/cards"),
            "/api/v1/sets/{code}/cards"
        );
    }

    #[test]
    fn test_normalize_path_numeric() {
        let path = "/api/v1/catalogs/12345/meta";
        assert_eq!(normalize_path(path), "/api/v1/catalogs/{id}/meta");
    }

    #[test]
    fn test_normalize_path_card_and_entry_identifiers() {
        assert_eq!(
            normalize_path("/api/v1/cards/test-uuid-123/image"),
            "/api/v1/cards/{uuid}/image"
        );
        assert_eq!(
            normalize_path("/api/v1/cards/550e8400-e29b-41d4-a716-446655440000"),
            "/api/v1/cards/{uuid}"
        );
        assert_eq!(
            normalize_path(
                "/api/v1/catalogs/550e8400-e29b-41d4-a716-446655440000/entries/some-card/refresh"
            ),
            "/api/v1/catalogs/{id}/entries/{identifier}/refresh"
        );
        assert_eq!(normalize_path("/api/v1/cards"), "/api/v1/cards");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/sets"), "/api/v1/sets");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_IN_FLIGHT.set(0);

        let output = encode_metrics();

        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_all_metrics() {
        // Vectors only show up once a label set has been touched.
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();
        CATALOGS_BY_SOURCE.with_label_values(&["mtgjson"]).set(1);
        SETS_TOTAL.set(0);
        CARDS_TOTAL.set(0);

        let output = encode_metrics();

        assert!(output.contains("cardcatalog_http_request_duration_seconds"));
        assert!(output.contains("cardcatalog_http_requests_total"));
        assert!(output.contains("cardcatalog_http_requests_in_flight"));
        assert!(output.contains("cardcatalog_catalogs"));
        assert!(output.contains("cardcatalog_sets"));
        assert!(output.contains("cardcatalog_cards"));
        assert!(output.contains("cardcatalog_mtgjson_version_updates_total"));
    }
}
