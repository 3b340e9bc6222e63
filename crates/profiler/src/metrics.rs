use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "profiler_runs_total",
        "Inference runs grouped by kind (profile, repo, devto) and outcome",
        &["kind", "outcome"]
    )
    .expect("profiler runs total")
});

pub static RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "profiler_run_duration_seconds",
        "Duration of inference runs in seconds",
        &["kind"],
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]
    )
    .expect("profiler run duration histogram")
});

pub static TAXONOMY_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "profiler_taxonomy_entries",
        "Entries in the keyword taxonomy loaded for the most recent run"
    )
    .expect("profiler taxonomy entries gauge")
});

pub static README_MISSING_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "profiler_readme_missing_total",
        "Profile README lookups that found no README"
    )
    .expect("profiler readme missing total")
});

pub static CONTRIBUTION_WINDOWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "profiler_contribution_windows_total",
        "Yearly contributionsCollection windows queried"
    )
    .expect("profiler contribution windows total")
});

pub static INCOMPLETE_RESULTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "profiler_incomplete_results_total",
        "Result sections cut short by rate-limit exhaustion",
        &["section"]
    )
    .expect("profiler incomplete results total")
});

pub fn outcome<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}
