/// Evaluates `$body` and logs how long it took at debug level, under the `phase` field.
#[macro_export]
macro_rules! timer_debug {
    ($phase:literal, $body:expr) => {{
        let started_at = jiff::Timestamp::now();
        let value = $body;
        let elapsed = jiff::Timestamp::now().duration_since(started_at);

        tracing::debug!(phase = $phase, elapsed_ms = elapsed.as_millis(), "phase finished");

        value
    }};
}
