//! Metrics are plain `tracing` events carrying `counter.*`, `gauge.*` or `histogram.*`
//! fields; any subscriber layer can turn them into real series.

/// Evaluate an expression and return it together with its wall-clock duration.
#[macro_export]
macro_rules! measure_duration {
    ($e: expr) => {{
        let now = std::time::Instant::now();

        let result = $e;
        (result, now.elapsed())
    }};
}

#[macro_export]
macro_rules! metric {
    (counter [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::service::tracing::debug!(monotonic_counter.$label = $i, $($field = $value),*)
    };
    (on error $e: expr => counter [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        if let Err(ref e) = $e {
            $crate::service::tracing::debug!(counter.$label = $i, $($field = $value,)* error = e.to_string());
        }
    };
    (gauge [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::service::tracing::debug!(gauge.$label = $i, $($field = $value),*)
    };
    (histogram [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::service::tracing::debug!(histogram.$label = $i as f64, $($field = $value),*)
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[tokio::test]
    async fn measured_duration_covers_the_expression() {
        let (value, duration) = measure_duration!({
            tokio::time::sleep(Duration::from_millis(10)).await;
            42
        });

        assert_eq!(value, 42);
        assert!(duration >= Duration::from_millis(10));
    }

    #[test]
    fn metric_on_error_only_inspects_the_result() {
        let result: Result<(), String> = Err("boom".to_string());
        metric!(on error result => counter [ rpc_error ] = 1, method = "starknet_call");
        metric!(histogram [ rpc_latency ] = 12u64, method = "starknet_call");

        assert!(result.is_err());
    }
}
