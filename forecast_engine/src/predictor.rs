//! Predictor seam
//!
//! The trained regression model is an external collaborator with an opaque
//! algorithm; the engine only depends on two things: the column schema the
//! model was trained on, and a scalar prediction for a numeric feature
//! vector. Schema validation happens once per run, before any counter is
//! processed, because a silent column mismatch would feed garbage into the
//! model without any error.

use crate::assemble::FEATURE_COLUMNS;
use crate::error::{EngineError, Result};

/// A trained model producing one scalar forecast per feature vector.
pub trait Predictor: Send + Sync {
    /// Column names, in order, the model was trained on.
    fn schema(&self) -> Vec<String>;

    /// Forecast for one numeric feature vector in schema order.
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// Check the predictor's schema against the engine's feature columns.
/// Fatal on mismatch: this is a deployment-configuration bug.
pub fn validate_schema(predictor: &dyn Predictor) -> Result<()> {
    let expected = predictor.schema();
    if expected != FEATURE_COLUMNS {
        return Err(EngineError::SchemaMismatch {
            expected: expected.join(", "),
            actual: FEATURE_COLUMNS.join(", "),
        });
    }

    Ok(())
}

/// Reference linear model over the fixed feature schema, for demos and
/// tests.
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearPredictor {
    /// Create a linear predictor with one weight per feature column.
    pub fn new(weights: Vec<f64>, intercept: f64) -> Result<Self> {
        if weights.len() != FEATURE_COLUMNS.len() {
            return Err(EngineError::Data(format!(
                "Expected {} weights, got {}",
                FEATURE_COLUMNS.len(),
                weights.len()
            )));
        }

        Ok(Self { weights, intercept })
    }

    /// A naive seasonal baseline: the average of last week's observation
    /// and the 7-day rolling mean.
    pub fn seasonal_baseline() -> Self {
        let mut weights = vec![0.0; FEATURE_COLUMNS.len()];
        weights[0] = 0.5; // rolling_7d
        weights[2] = 0.5; // lag_7d
        Self {
            weights,
            intercept: 0.0,
        }
    }
}

impl Predictor for LinearPredictor {
    fn schema(&self) -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(EngineError::SchemaMismatch {
                expected: self.weights.len().to_string(),
                actual: features.len().to_string(),
            });
        }

        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.intercept + dot)
    }
}
