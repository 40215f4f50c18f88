//! Form state as a single immutable value.
//!
//! Each transition consumes a state and returns the next one, so whoever holds the current
//! value always sees the record, loading flag, prediction and error from the same moment.

use crate::prediction::{prediction_to_string, Prediction, RiskLevel};
use crate::record::{ClinicalRecord, Field};
use crate::PredictError;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormState {
    pub record: ClinicalRecord,
    pub loading: bool,
    pub prediction: Option<Prediction>,
    pub error: Option<String>,
}

impl FormState {
    pub fn with_field(self, field: Field, value: f64) -> Self {
        Self {
            record: self.record.with(field, value),
            ..self
        }
    }

    /// Enter the loading state and drop the previous error.
    pub fn begin_submission(self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self
        }
    }

    /// Leave the loading state with the outcome of one attempt.
    ///
    /// A failure records its message and keeps whatever prediction was shown before.
    pub fn settle(self, outcome: &Result<Prediction, PredictError>) -> Self {
        match outcome {
            Ok(prediction) => Self {
                loading: false,
                prediction: Some(*prediction),
                error: None,
                ..self
            },
            Err(err) => Self {
                loading: false,
                error: Some(err.display_message()),
                ..self
            },
        }
    }

    pub fn result_text(&self) -> &'static str {
        prediction_to_string(self.prediction)
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.prediction.map(Prediction::risk_level)
    }
}
