use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static UTILITY_CACHE_LOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "enrollment_utility_cache_loads_total",
        "Utility table loads from the object store"
    )
    .expect("register utility_cache_loads_total")
});

pub static UTILITY_LOOKUPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "enrollment_utility_lookups_total",
        "Utility lookups answered"
    )
    .expect("register utility_lookups_total")
});

pub static UTILITY_UNKNOWN_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "enrollment_utility_unknown_total",
        "Utility lookups answered with the unknown-utility sentinel"
    )
    .expect("register utility_unknown_total")
});

pub static LOG_APPENDS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "enrollment_submissions_appended_total",
        "Items appended to submission logs"
    )
    .expect("register submissions_appended_total")
});

pub static GEOCODE_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "enrollment_geocode_requests_total",
        "Address validation requests sent to the geocoder"
    )
    .expect("register geocode_requests_total")
});

pub static GEOCODE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "enrollment_geocode_failures_total",
        "Geocoder calls that failed at the transport level"
    )
    .expect("register geocode_failures_total")
});

/// Encode the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
