use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and register all fetch/analysis metrics.
/// The returned handle's `render()` produces the text exposition payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;

    // Pre-register counters so they appear even before the first increment.
    counter!("trade_pages_requested").absolute(0);
    counter!("trade_page_failures").absolute(0);
    counter!("trade_records_accepted").absolute(0);
    counter!("trade_records_duplicate").absolute(0);
    counter!("trade_records_malformed").absolute(0);

    gauge!("leaderboard_wallets").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("trade_page_latency_seconds").record(0.0);

    Ok(handle)
}
