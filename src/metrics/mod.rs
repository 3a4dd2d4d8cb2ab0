//! Prometheus metrics for the monitor loop and the liveness server

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycle_failures_total: IntCounter,
    pub signals_emitted_total: IntCounterVec,
    pub notifications_sent_total: IntCounter,
    pub notifications_failed_total: IntCounter,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("monitor_cycles_total", "Poll cycles started")?;
        let cycle_failures_total = IntCounter::new(
            "monitor_cycle_failures_total",
            "Poll cycles aborted by an unexpected error",
        )?;
        let signals_emitted_total = IntCounterVec::new(
            Opts::new("signals_emitted_total", "Zero-line crossing signals emitted"),
            &["rule"],
        )?;
        let notifications_sent_total =
            IntCounter::new("notifications_sent_total", "Messages delivered")?;
        let notifications_failed_total = IntCounter::new(
            "notifications_failed_total",
            "Messages that failed after all retries",
        )?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests being served")?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycle_failures_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycle_failures_total,
            signals_emitted_total,
            notifications_sent_total,
            notifications_failed_total,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
        })
    }

    /// Render every registered metric in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
