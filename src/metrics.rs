use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    pub static ref CATEGORY_LOADS: IntCounterVec = register_int_counter_vec!(
        "iptv_category_loads_total",
        "Category loads by outcome (ok, not_found, failed)",
        &["outcome"]
    )
    .unwrap();
    pub static ref PLAYLIST_FETCH_FAILURES: IntCounter = register_int_counter!(
        "iptv_playlist_fetch_failures_total",
        "Playlist fetches that failed and were skipped"
    )
    .unwrap();
    pub static ref STORE_QUERY_FAILURES: IntCounterVec = register_int_counter_vec!(
        "iptv_store_query_failures_total",
        "Document store queries that failed, per collection",
        &["collection"]
    )
    .unwrap();
    pub static ref PLAYLIST_CHANNELS_PARSED: IntCounter = register_int_counter!(
        "iptv_playlist_channels_parsed_total",
        "Channels produced by the playlist parser"
    )
    .unwrap();
}

/// Prometheus text exposition of every registered metric
pub fn gather_metrics() -> Result<Vec<u8>, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_includes_registered_counters() {
        PLAYLIST_FETCH_FAILURES.inc();
        CATEGORY_LOADS.with_label_values(&["ok"]).inc();

        let text = String::from_utf8(gather_metrics().unwrap()).unwrap();
        assert!(text.contains("iptv_playlist_fetch_failures_total"));
        assert!(text.contains("iptv_category_loads_total{outcome=\"ok\"}"));
    }
}
