use thiserror::Error;

/// Errors surfaced by [`activate`](crate::activate), the engine's only
/// fallible entry point. Everything else fails closed by contract.
#[derive(Debug, Error)]
pub enum ActivateError {
    /// A caller-supplied custom evaluator failed. The engine does not retry;
    /// resilience around I/O-backed evaluators is the caller's concern.
    #[error("custom evaluator for condition type '{kind}' failed")]
    CustomEvaluator {
        kind: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_evaluator_message() {
        let err = ActivateError::CustomEvaluator {
            kind: "segment".into(),
            source: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "custom evaluator for condition type 'segment' failed"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
