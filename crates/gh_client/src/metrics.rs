use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gh_client_requests_total",
        "Requests sent to GitHub per budget and status class",
        &["budget", "status"]
    )
    .expect("requests metric")
});

pub static LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "gh_client_latency_seconds",
        "GitHub request latency per budget",
        &["budget"]
    )
    .expect("latency metric")
});

pub static RATE_REMAINING: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "gh_client_rate_remaining",
        "Rate limit remaining as last reported by GitHub",
        &["budget"]
    )
    .expect("rate remaining")
});

pub static PAGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gh_client_pages_total",
        "Pages fetched while following Link headers",
        &["budget"]
    )
    .expect("pages metric")
});

pub static TRUNCATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gh_client_truncated_total",
        "Paginated listings cut short by rate-limit exhaustion",
        &["budget"]
    )
    .expect("truncated metric")
});

pub fn status_class(status: http::StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

/// Text exposition of everything registered in the default registry.
pub fn render() -> String {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
