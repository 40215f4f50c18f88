use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};

use heart_core::{
    DEFAULT_FORM_ADDR, FORM_ADDR_ENV, FormController, FormState, HttpPredictionClient,
    PREDICT_URL_ENV, SubmitOutcome, client_config_from_env_value,
};

mod page;

/// Application state shared across handlers
///
/// Only the HTTP client is shared. Each request builds its own form controller, so one
/// visitor's record and result never reach another.
#[derive(Clone)]
struct AppState {
    client: HttpPredictionClient,
}

impl AppState {
    fn controller(&self) -> FormController<HttpPredictionClient> {
        FormController::new(self.client.clone())
    }
}

#[derive(Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

/// JSON view of one submission's form state.
#[derive(Serialize, ToSchema)]
struct StateRes {
    /// Value of each field keyed by wire name, encoded as in the request body; `null` for a
    /// non-numeric entry.
    #[schema(value_type = Object)]
    record: serde_json::Value,
    loading: bool,
    prediction: Option<f64>,
    /// "Heart Disease", "No Heart Disease", or empty when no prediction was made.
    result: String,
    /// "High" or "Low", derived from the predicted class only.
    risk_level: Option<String>,
    error: Option<String>,
}

impl From<&FormState> for StateRes {
    fn from(state: &FormState) -> Self {
        Self {
            record: serde_json::to_value(state.record).unwrap_or_default(),
            loading: state.loading,
            prediction: state.prediction.map(|p| p.value()),
            result: state.result_text().to_owned(),
            risk_level: state.risk_level().map(|r| r.to_string()),
            error: state.error.clone(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct PredictReq {
    /// Field values keyed by wire name, as numbers or raw strings. Omitted fields keep their
    /// defaults.
    #[schema(value_type = Object)]
    #[serde(default)]
    fields: HashMap<String, serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
struct SubmitRes {
    /// One of "succeeded", "failed" or "already_in_flight".
    outcome: String,
    state: StateRes,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, predict),
    components(schemas(HealthRes, StateRes, PredictReq, SubmitRes))
)]
struct ApiDoc;

/// Main entry point for the prediction form server
///
/// Serves the single-page form at `/` and a JSON prediction endpoint. Neither keeps any
/// record between requests.
///
/// # Environment Variables
/// - `HEART_FORM_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `HEART_PREDICT_URL`: Prediction endpoint (default: the hosted predictor)
///
/// # Errors
/// Returns an error if the logging configuration, the predict URL or the bind address is
/// invalid, or if the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heart_form_run=info".parse()?)
                .add_directive("heart_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var(FORM_ADDR_ENV).unwrap_or_else(|_| DEFAULT_FORM_ADDR.into());
    let config = client_config_from_env_value(std::env::var(PREDICT_URL_ENV).ok())?;

    tracing::info!("++ Starting heart prediction form on {}", addr);
    tracing::info!("++ Predictions from {}", config.predict_url());

    let app = router(AppState {
        client: HttpPredictionClient::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/", post(submit_form))
        .route("/health", get(health))
        .route("/api/predict", post(predict))
        .route("/api-docs/openapi.json", get(openapi))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// A blank form holding the default record.
async fn form_page() -> Html<String> {
    Html(page::render(&FormState::default()))
}

/// Apply every posted field to a fresh record, submit, and render the result.
///
/// Unknown keys in the posted form are ignored.
async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    let controller = state.controller();
    for (name, value) in &fields {
        if let Err(e) = controller.update_field_by_name(name, value) {
            tracing::debug!("ignoring form key: {}", e);
        }
    }
    controller.submit().await;
    Html(page::render(&controller.state()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Heart prediction form is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictReq,
    responses(
        (status = 200, description = "Submission settled", body = SubmitRes),
        (status = 400, description = "Unknown field name or non-scalar value")
    )
)]
/// Submit a record for prediction
///
/// Prediction failures are reported in the returned state rather than as an HTTP error.
async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictReq>,
) -> Result<Json<SubmitRes>, (StatusCode, String)> {
    let controller = state.controller();
    for (name, value) in &req.fields {
        let raw = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("{name}: expected a number or string, got {other}"),
                ));
            }
        };
        controller
            .update_field_by_name(name, &raw)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    }

    let outcome = match controller.submit().await {
        SubmitOutcome::Succeeded(_) => "succeeded",
        SubmitOutcome::Failed(_) => "failed",
        SubmitOutcome::AlreadyInFlight => "already_in_flight",
    };
    Ok(Json(SubmitRes {
        outcome: outcome.into(),
        state: StateRes::from(&controller.state()),
    }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
