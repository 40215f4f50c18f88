//! Prediction results and how they are presented.

use crate::constants::{HEART_DISEASE_LABEL, NO_HEART_DISEASE_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw class value returned by the service, conventionally `0` or `1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(f64);

impl Prediction {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// True only for the class value `1`.
    pub fn is_positive(self) -> bool {
        self.0 == 1.0
    }

    pub fn label(self) -> &'static str {
        if self.is_positive() {
            HEART_DISEASE_LABEL
        } else {
            NO_HEART_DISEASE_LABEL
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        if self.is_positive() {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }
}

/// Display text for an optional prediction; empty before the first result.
pub fn prediction_to_string(prediction: Option<Prediction>) -> &'static str {
    prediction.map(Prediction::label).unwrap_or("")
}

/// Coarse "High"/"Low" badge derived from the predicted class alone.
///
/// This is not a probability. A real class probability only comes from [`DebugReport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => f.write_str("High"),
            RiskLevel::Low => f.write_str("Low"),
        }
    }
}

/// Body of a successful `/predict` response.
#[derive(Clone, Debug, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

/// Body of a successful `/debug` response.
///
/// Every part except `input` is optional: the service reports `null` when the model cannot
/// supply it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugReport {
    pub input: Vec<Vec<f64>>,
    pub prediction: Option<i64>,
    pub probabilities: Option<Vec<Vec<f64>>>,
    pub classes: Option<Vec<serde_json::Value>>,
}

impl DebugReport {
    pub fn prediction(&self) -> Option<Prediction> {
        self.prediction.map(|p| Prediction::new(p as f64))
    }

    /// Probability of class `1` for the submitted row.
    ///
    /// Uses `classes` to locate the column when present, otherwise assumes the model's
    /// `[0, 1]` ordering.
    pub fn positive_probability(&self) -> Option<f64> {
        let row = self.probabilities.as_ref()?.first()?;
        let column = match &self.classes {
            Some(classes) => classes.iter().position(is_positive_class)?,
            None => 1,
        };
        row.get(column).copied()
    }
}

fn is_positive_class(class: &serde_json::Value) -> bool {
    match class {
        serde_json::Value::Number(n) => n.as_f64() == Some(1.0),
        serde_json::Value::String(s) => s == "1",
        _ => false,
    }
}
