//! Prometheus metrics for request tracking and monitoring.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Arbitrage request latency metric name.
pub const METRIC_REQUEST_LATENCY: &str = "arbitrage_request_latency_ms";
/// Upstream odds fetch latency metric name.
pub const METRIC_ODDS_FETCH_LATENCY: &str = "odds_fetch_latency_ms";
/// Arbitrage requests counter metric name.
pub const METRIC_REQUESTS: &str = "arbitrage_requests_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";
/// Matches evaluated counter metric name.
pub const METRIC_MATCHES_EVALUATED: &str = "matches_evaluated_total";
/// Odds cache hits counter metric name.
pub const METRIC_CACHE_HITS: &str = "odds_cache_hits_total";
/// Odds cache misses counter metric name.
pub const METRIC_CACHE_MISSES: &str = "odds_cache_misses_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_REQUEST_LATENCY,
        "End-to-end arbitrage request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_ODDS_FETCH_LATENCY,
        "Upstream odds fetch latency in milliseconds"
    );

    describe_counter!(METRIC_REQUESTS, "Total number of arbitrage requests served");
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of arbitrage opportunities detected"
    );
    describe_counter!(
        METRIC_MATCHES_EVALUATED,
        "Total number of matches evaluated by the engine"
    );
    describe_counter!(METRIC_CACHE_HITS, "Odds cache hits");
    describe_counter!(METRIC_CACHE_MISSES, "Odds cache misses");

    debug!("Metrics initialized");
}

/// Record end-to-end request latency for a sport.
pub fn record_request_latency(start: Instant, sport: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_REQUEST_LATENCY, "sport" => sport.to_string()).record(latency_ms);
}

/// Record upstream odds fetch latency.
pub fn record_odds_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_ODDS_FETCH_LATENCY).record(latency_ms);
}

/// Increment the served-requests counter.
pub fn inc_requests() {
    counter!(METRIC_REQUESTS).increment(1);
}

/// Add to the opportunities detected counter.
pub fn add_opportunities_detected(count: u64) {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(count);
}

/// Add to the matches evaluated counter.
pub fn add_matches_evaluated(count: u64) {
    counter!(METRIC_MATCHES_EVALUATED).increment(count);
}

/// Increment the cache hits counter.
pub fn inc_cache_hits() {
    counter!(METRIC_CACHE_HITS).increment(1);
}

/// Increment the cache misses counter.
pub fn inc_cache_misses() {
    counter!(METRIC_CACHE_MISSES).increment(1);
}
