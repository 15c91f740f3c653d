use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static HONOR_SAVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("honor_saved_total", "Honor records created or updated")
        .expect("register honor_saved_total")
});

pub static HONOR_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("honor_deleted_total", "Honor records deleted")
        .expect("register honor_deleted_total")
});

pub static HONOR_IMPORTED_ROWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("honor_imported_rows_total", "Rows persisted by spreadsheet import")
        .expect("register honor_imported_rows_total")
});

pub static HONOR_IMPORT_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("honor_import_failures_total", "Spreadsheet imports that were rolled back")
        .expect("register honor_import_failures_total")
});

pub static HONOR_EXPORTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("honor_exports_total", "Spreadsheet exports produced")
        .expect("register honor_exports_total")
});

/// Text exposition of the default registry, or the encoder error message.
pub fn encode_metrics() -> Result<String, String> {
    // Touch the counters so they appear even before the first event.
    Lazy::force(&HONOR_SAVED_TOTAL);
    Lazy::force(&HONOR_DELETED_TOTAL);
    Lazy::force(&HONOR_IMPORTED_ROWS_TOTAL);
    Lazy::force(&HONOR_IMPORT_FAILURES_TOTAL);
    Lazy::force(&HONOR_EXPORTS_TOTAL);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("metrics encode error: {e}"))?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposition_lists_honor_counters() {
        HONOR_EXPORTS_TOTAL.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("honor_exports_total"));
        assert!(text.contains("honor_saved_total"));
    }
}
