use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Lazily initialised process-wide metrics.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

/// Render every registered metric in the prometheus text format.
pub async fn render_metrics() -> anyhow::Result<String> {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token cache
    pub token_cache_hits: IntCounter,
    pub token_cache_stale: IntCounter,

    // Token acquisition
    pub token_acquisitions: IntCounterVec,
    pub token_acquisition_duration: Histogram,
    pub auth_gate_wait: Histogram,

    // Service clients
    pub service_requests: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("mdscloud".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Tokens served from cache").unwrap(),
            token_cache_stale: IntCounter::new("token_cache_stale_total", "Cached tokens dropped as expired").unwrap(),

            token_acquisitions: IntCounterVec::new(Opts::new("token_acquisitions_total", "Authentication calls by result"), &["result"]).unwrap(),
            token_acquisition_duration: Histogram::with_opts(HistogramOpts::new("token_acquisition_duration_seconds", "Authentication call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])).unwrap(),
            auth_gate_wait: Histogram::with_opts(HistogramOpts::new("auth_gate_wait_seconds", "Time spent waiting for the token acquisition gate").buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0])).unwrap(),

            service_requests: IntCounterVec::new(Opts::new("service_requests_total", "Service client calls by outcome"), &["service", "operation", "status"]).unwrap(),

            registry,
        });

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_stale.clone())).unwrap();
        reg.register(Box::new(metrics.token_acquisitions.clone())).unwrap();
        reg.register(Box::new(metrics.token_acquisition_duration.clone())).unwrap();
        reg.register(Box::new(metrics.auth_gate_wait.clone())).unwrap();
        reg.register(Box::new(metrics.service_requests.clone())).unwrap();

        metrics
    }
}
