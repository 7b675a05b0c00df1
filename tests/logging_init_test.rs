/// Verifies that logging initialization can be repeated without failing.

#[cfg(test)]
mod tests {
    use validated_attrs::utils::logging::{init_logging, init_logging_with, LogFormat};

    #[test]
    fn test_init_logging_is_idempotent() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_ok());
        assert!(init_logging_with(LogFormat::Json).is_ok());
    }

    #[test]
    fn test_events_after_init_do_not_panic() {
        let _ = init_logging_with(LogFormat::Text);
        tracing::info!(field = "zip", "validated");
        log::info!("bridged log record");
    }
}
