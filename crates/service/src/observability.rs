use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

// Prometheus metrics (default registry)
pub static STORAGE_OPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "abc_retail_storage_operations_total",
        "Storage gateway operations by backend, operation and outcome",
        &["backend", "op", "outcome"]
    )
    .expect("register storage_operations_total")
});

pub static NOTIFICATIONS_FAILED_TOTAL: Lazy<prometheus::IntCounter> = Lazy::new(|| {
    prometheus::register_int_counter!(
        "abc_retail_notifications_failed_total",
        "Queue notifications that could not be sent"
    )
    .expect("register notifications_failed_total")
});

pub fn record(backend: &str, op: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    STORAGE_OPS_TOTAL.with_label_values(&[backend, op, outcome]).inc();
}
