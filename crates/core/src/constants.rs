//! Constants used throughout the heart core crate.
//!
//! Endpoint defaults, display strings and environment variable names live here so the
//! front ends and the controller agree on them.

/// Prediction endpoint used when no override is configured.
pub const DEFAULT_PREDICT_URL: &str = "https://heartdiseasepredictor-one.vercel.app/predict";

/// Path segment of the explanation route, resolved relative to the predict URL.
pub const DEBUG_PATH_SEGMENT: &str = "debug";

/// Message shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Display text for a positive prediction.
pub const HEART_DISEASE_LABEL: &str = "Heart Disease";

/// Display text for any other prediction value.
pub const NO_HEART_DISEASE_LABEL: &str = "No Heart Disease";

/// Environment variable the binaries read to override the predict URL.
pub const PREDICT_URL_ENV: &str = "HEART_PREDICT_URL";

/// Environment variable holding the web form bind address.
pub const FORM_ADDR_ENV: &str = "HEART_FORM_ADDR";

/// Bind address for the web form when `HEART_FORM_ADDR` is unset.
pub const DEFAULT_FORM_ADDR: &str = "0.0.0.0:3000";
