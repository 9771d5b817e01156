use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

use crate::error::CompletionError;
use crate::models::Artifact;

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap();

    // Completion API Metrics
    pub static ref COMPLETION_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "completion_requests_total",
        "Total number of calls to the chat-completion API",
        &["artifact", "status"]
    )
    .unwrap();

    pub static ref COMPLETION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "completion_duration_seconds",
        "Chat-completion round trip in seconds",
        &["artifact"],
        vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref GENERATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "generation_failures_total",
        "Total number of failed quiz/study plan generations",
        &["artifact", "kind"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a completion API call with metrics
pub async fn track_completion<F, T>(artifact: Artifact, future: F) -> Result<T, CompletionError>
where
    F: std::future::Future<Output = Result<T, CompletionError>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = match &result {
        Ok(_) => "success",
        Err(CompletionError::Timeout) => "timeout",
        Err(CompletionError::Status { .. }) => "http_error",
        Err(CompletionError::MalformedBody(_)) => "malformed_body",
        Err(_) => "error",
    };

    COMPLETION_REQUESTS_TOTAL
        .with_label_values(&[artifact.as_label(), status])
        .inc();

    COMPLETION_DURATION_SECONDS
        .with_label_values(&[artifact.as_label()])
        .observe(duration);

    result
}

pub fn record_generation_failure(artifact: Artifact, kind: &str) {
    GENERATION_FAILURES_TOTAL
        .with_label_values(&[artifact.as_label(), kind])
        .inc();
}
