//! # Heart Core
//!
//! Core logic for the heart disease prediction form.
//!
//! This crate contains the parts that do not depend on how the form is presented:
//! - The thirteen-field clinical record, numeric coercion and the JSON wire body
//! - Categorical label/code tables
//! - The prediction client (HTTP via `reqwest`) and its error taxonomy
//! - The form controller and its single immutable state value
//!
//! **No presentation concerns**: HTML rendering and command-line handling live in the
//! `heart-form-run` and `heart-cli` binaries.

pub mod client;
pub mod codes;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod prediction;
pub mod record;
pub mod state;

pub use client::{HttpPredictionClient, PredictionClient};
pub use codes::CodeOption;
pub use config::{client_config_from_env_value, ClientConfig};
pub use constants::*;
pub use controller::{FormController, SubmitOutcome};
pub use error::{FormError, FormResult, PredictError, PredictResult};
pub use prediction::{prediction_to_string, DebugReport, Prediction, RiskLevel};
pub use record::{coerce_number, ClinicalRecord, Field, PredictRequest};
pub use state::FormState;

/// Parse a `field=value` assignment as given on a command line.
///
/// The value is kept raw; it is coerced the same way form input is. For categorical fields a
/// label from the option table (case-insensitive) is accepted in place of the code.
pub fn parse_assignment(input: &str) -> FormResult<(Field, String)> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| FormError::InvalidAssignment(input.to_owned()))?;
    let field: Field = name.trim().parse()?;

    let value = field
        .options()
        .and_then(|options| codes::code_for(options, value))
        .map(|code| code.to_string())
        .unwrap_or_else(|| value.to_owned());

    Ok((field, value))
}
