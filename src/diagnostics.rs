use chrono::{DateTime, Utc};

/// Wall-clock start marker that also works in the browser.
pub fn perf_start() -> DateTime<Utc> {
    Utc::now()
}

#[inline]
pub fn log_perf(scope: &str, started_at: DateTime<Utc>, details: &str) {
    let elapsed_ms = (Utc::now() - started_at).num_milliseconds().max(0);
    if details.trim().is_empty() {
        tracing::debug!(target: "perf", "{scope} took {elapsed_ms}ms");
    } else {
        tracing::debug!(target: "perf", "{scope} took {elapsed_ms}ms | {details}");
    }
}
