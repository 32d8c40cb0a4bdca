use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use lazy_static::lazy_static;
use prometheus::IntCounter;

lazy_static! {
    pub static ref GITHUB_API_CALLS: IntCounter =
        IntCounter::new("github_api_calls", "GitHub API calls").unwrap();
    pub static ref LLM_API_CALLS: IntCounter =
        IntCounter::new("llm_api_calls", "LLM API calls").unwrap();
    pub static ref QUEUE_CALLS: IntCounter =
        IntCounter::new("queue_calls", "Job queue calls").unwrap();
}

pub(crate) fn build_metrics_handler() -> PrometheusMetrics {
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .unwrap();

    setup_process_metrics(&prometheus);

    prometheus
        .registry
        .register(Box::new(GITHUB_API_CALLS.clone()))
        .unwrap();
    prometheus
        .registry
        .register(Box::new(LLM_API_CALLS.clone()))
        .unwrap();
    prometheus
        .registry
        .register(Box::new(QUEUE_CALLS.clone()))
        .unwrap();
    prometheus
}

#[cfg(unix)]
fn setup_process_metrics(metrics: &PrometheusMetrics) {
    use prometheus::process_collector::ProcessCollector;

    metrics
        .registry
        .register(Box::new(ProcessCollector::for_self()))
        .unwrap();
}

#[cfg(windows)]
fn setup_process_metrics(_metrics: &PrometheusMetrics) {
    println!("Process metrics are not supported on Windows.");
}
