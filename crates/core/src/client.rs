//! Outbound calls to the prediction service.

use crate::config::ClientConfig;
use crate::prediction::{DebugReport, Prediction, PredictResponse};
use crate::record::PredictRequest;
use crate::{PredictError, PredictResult};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// The remote side of a submission.
///
/// The controller only depends on this trait so tests and alternative transports can stand
/// in for the HTTP service.
#[async_trait::async_trait]
pub trait PredictionClient: Send + Sync {
    /// Classify one record.
    async fn predict(&self, body: &PredictRequest) -> PredictResult<Prediction>;

    /// Ask the service to explain its classification of one record.
    async fn explain(&self, body: &PredictRequest) -> PredictResult<DebugReport>;
}

/// [`PredictionClient`] backed by a `reqwest` connection pool.
#[derive(Clone, Debug)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpPredictionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `body` as JSON and decode a 2xx response.
    ///
    /// Non-2xx responses become [`PredictError::Server`] carrying the body text verbatim.
    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &PredictRequest,
    ) -> PredictResult<T> {
        let res = self.http.post(url.clone()).json(body).send().await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await?;
            return Err(PredictError::Server {
                status: status.as_u16(),
                body: text,
            });
        }

        let text = res.text().await?;
        serde_json::from_str(&text).map_err(|e| PredictError::MalformedResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, body: &PredictRequest) -> PredictResult<Prediction> {
        let res: PredictResponse = self.post_json(self.config.predict_url(), body).await?;
        Ok(Prediction::new(res.prediction))
    }

    async fn explain(&self, body: &PredictRequest) -> PredictResult<DebugReport> {
        self.post_json(self.config.debug_url(), body).await
    }
}
