//! Error types for the forecast engine

use thiserror::Error;

/// Errors raised while reconstructing features or running a forecast
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required lag/rolling/weather value could not be reconstructed
    /// after exhausting fallback search. Non-fatal per counter: the batch
    /// records the counter as skipped and continues.
    #[error("Missing feature for counter {counter_id}: {detail}")]
    MissingFeature { counter_id: String, detail: String },

    /// Weather or persistence collaborator unreachable after bounded
    /// retries. Non-fatal per counter.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The assembled column set does not match what the predictor expects.
    /// A deployment-configuration bug: fatal, aborts the run before any
    /// counter is processed.
    #[error("Feature schema mismatch: predictor expects [{expected}], engine produces [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    /// A whole batch produced no forecast at all.
    #[error("Batch run failed: {0}")]
    BatchFailed(String),

    /// Malformed input data or request.
    #[error("Data error: {0}")]
    Data(String),
}

/// Result type with our engine error
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<counter_data::DataError> for EngineError {
    fn from(err: counter_data::DataError) -> Self {
        EngineError::Data(err.to_string())
    }
}
