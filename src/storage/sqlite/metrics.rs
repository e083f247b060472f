//! Storage operation metrics.

use std::time::Instant;

/// Records `storage_operations_total` and `storage_operation_duration_ms`
/// for one storage call.
///
/// `status` is `"success"` or `"error"`.
pub fn record_operation_metrics(
    backend: &'static str,
    operation: &'static str,
    start: Instant,
    status: &'static str,
) {
    metrics::counter!(
        "storage_operations_total",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "storage_operation_duration_ms",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder() {
        // No recorder is installed; the facade must be a no-op.
        record_operation_metrics("sqlite", "recent_records", Instant::now(), "success");
        record_operation_metrics("sqlite", "recent_records", Instant::now(), "error");
    }
}
