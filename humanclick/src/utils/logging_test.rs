#[cfg(test)]
mod tests {
    use super::super::logging::{DEFAULT_FILTER, init_logging};

    #[test]
    fn test_logging_initialization_is_idempotent() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_default_filter_parses() {
        let filter = tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER);
        assert!(filter.is_ok());
    }
}
