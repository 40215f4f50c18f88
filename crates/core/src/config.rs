//! Client runtime configuration.
//!
//! Endpoint configuration is resolved once at process startup and passed into the client. The
//! core never reads environment variables itself; the binaries do that and hand the raw value
//! to [`client_config_from_env_value`].

use crate::constants::{DEBUG_PATH_SEGMENT, DEFAULT_PREDICT_URL};
use crate::{FormError, FormResult};
use reqwest::Url;

/// Prediction service endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    predict_url: Url,
    debug_url: Url,
}

impl ClientConfig {
    /// Create a `ClientConfig` from an absolute `http`/`https` predict URL.
    ///
    /// The debug URL is the `debug` route next to it, so `https://host/predict` pairs with
    /// `https://host/debug`.
    pub fn new(predict_url: &str) -> FormResult<Self> {
        let predict_url = Url::parse(predict_url.trim())
            .map_err(|e| FormError::InvalidConfig(format!("predict url: {e}")))?;

        if !matches!(predict_url.scheme(), "http" | "https") {
            return Err(FormError::InvalidConfig(format!(
                "predict url must use http or https, got {}",
                predict_url.scheme()
            )));
        }
        if predict_url.cannot_be_a_base() {
            return Err(FormError::InvalidConfig(
                "predict url must be an absolute URL".into(),
            ));
        }

        let debug_url = predict_url
            .join(DEBUG_PATH_SEGMENT)
            .map_err(|e| FormError::InvalidConfig(format!("debug url: {e}")))?;

        Ok(Self {
            predict_url,
            debug_url,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn debug_url(&self) -> &Url {
        &self.debug_url
    }
}

/// Resolve the client configuration from an optional override.
///
/// If `value` is `None` or blank, the hosted predictor is used.
pub fn client_config_from_env_value(value: Option<String>) -> FormResult<ClientConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    ClientConfig::new(value.as_deref().unwrap_or(DEFAULT_PREDICT_URL))
}
