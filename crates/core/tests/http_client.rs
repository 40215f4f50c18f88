//! Controller behaviour against an in-process HTTP stand-in for the prediction service.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use heart_core::{
    ClientConfig, Field, FormController, HttpPredictionClient, Prediction, PredictError,
    SubmitOutcome,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Last request seen by the stub: content type and raw body.
type Captured = Arc<Mutex<Option<(String, String)>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}/predict")
}

fn controller_for(url: &str) -> FormController<HttpPredictionClient> {
    let config = ClientConfig::new(url).expect("stub url");
    FormController::new(HttpPredictionClient::new(config))
}

async fn predicting(value: i64) -> String {
    let router = Router::new().route(
        "/predict",
        post(move || async move { Json(json!({ "prediction": value })) }),
    );
    serve(router).await
}

#[tokio::test]
async fn positive_prediction_renders_heart_disease_high() {
    let controller = controller_for(&predicting(1).await);

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Succeeded(Prediction::new(1.0)));
    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.result_text(), "Heart Disease");
    assert_eq!(state.risk_level().expect("risk").to_string(), "High");
}

#[tokio::test]
async fn negative_prediction_renders_no_heart_disease_low() {
    let controller = controller_for(&predicting(0).await);

    controller.submit().await;

    let state = controller.state();
    assert_eq!(state.result_text(), "No Heart Disease");
    assert_eq!(state.risk_level().expect("risk").to_string(), "Low");
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let router = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable") }),
    );
    let controller = controller_for(&serve(router).await);

    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Server error: 500 model unavailable".into())
    );
    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(
        state.error.as_deref(),
        Some("Server error: 500 model unavailable")
    );
    assert_eq!(state.prediction, None);
}

#[tokio::test]
async fn non_json_body_is_a_malformed_response() {
    let router = Router::new().route("/predict", post(|| async { "<html>oops</html>" }));
    let client = HttpPredictionClient::new(ClientConfig::new(&serve(router).await).expect("url"));

    let body = heart_core::ClinicalRecord::default()
        .to_request()
        .expect("finite");
    let err = heart_core::PredictionClient::predict(&client, &body)
        .await
        .expect_err("html is not a prediction");

    assert!(matches!(err, PredictError::MalformedResponse(_)), "{err:?}");
}

/// Stub that answers the first request with a positive prediction and every later one with
/// `second`, served as a 200.
async fn positive_then(second: &'static str) -> String {
    let calls: Arc<AtomicUsize> = Arc::default();
    let router = Router::new()
        .route(
            "/predict",
            post(move |State(calls): State<Arc<AtomicUsize>>| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    r#"{"prediction":1}"#
                } else {
                    second
                }
            }),
        )
        .with_state(calls);
    serve(router).await
}

async fn assert_malformed_keeps_prior_prediction(second: &'static str) {
    let controller = controller_for(&positive_then(second).await);
    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Succeeded(Prediction::new(1.0))
    );

    let outcome = controller.submit().await;

    let state = controller.state();
    assert!(!state.loading);
    let message = state.error.clone().expect("error recorded");
    assert!(!message.is_empty());
    assert_eq!(outcome, SubmitOutcome::Failed(message));
    assert_eq!(state.prediction, Some(Prediction::new(1.0)));
    assert_eq!(state.result_text(), "Heart Disease");
}

#[tokio::test]
async fn html_success_body_fails_and_keeps_prior_prediction() {
    assert_malformed_keeps_prior_prediction("<html>maintenance</html>").await;
}

#[tokio::test]
async fn missing_prediction_key_fails_and_keeps_prior_prediction() {
    assert_malformed_keeps_prior_prediction("{}").await;
}

#[tokio::test]
async fn default_record_is_posted_as_exact_json() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route(
            "/predict",
            post(
                |State(captured): State<Captured>, headers: HeaderMap, body: String| async move {
                    let content_type = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_owned();
                    *captured.lock().expect("lock") = Some((content_type, body));
                    Json(json!({ "prediction": 0 }))
                },
            ),
        )
        .with_state(captured.clone());
    let controller = controller_for(&serve(router).await);

    controller.submit().await;

    let (content_type, body) = captured.lock().expect("lock").clone().expect("request seen");
    assert_eq!(content_type, "application/json");
    assert_eq!(
        body,
        r#"{"age":50,"sex":1,"cp":0,"trestbps":120,"chol":200,"fbs":0,"restecg":0,"thalach":150,"exang":0,"oldpeak":1,"slope":1,"ca":0,"thal":1}"#
    );
}

#[tokio::test]
async fn edited_fields_reach_the_wire() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route(
            "/predict",
            post(|State(captured): State<Captured>, body: String| async move {
                *captured.lock().expect("lock") = Some((String::new(), body));
                Json(json!({ "prediction": 1 }))
            }),
        )
        .with_state(captured.clone());
    let controller = controller_for(&serve(router).await);

    controller.update_field(Field::Age, "63");
    controller.update_field(Field::Oldpeak, "2.3");
    controller.submit().await;

    let (_, body) = captured.lock().expect("lock").clone().expect("request seen");
    let sent: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(sent["age"], json!(63));
    assert_eq!(sent["oldpeak"], json!(2.3));
    assert_eq!(sent["thal"], json!(1));
}

#[tokio::test]
async fn unreachable_service_reports_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let controller = controller_for(&format!("http://{addr}/predict"));

    let outcome = controller.submit().await;

    let state = controller.state();
    assert!(!state.loading);
    let message = state.error.expect("error recorded");
    assert!(!message.is_empty());
    assert_eq!(outcome, SubmitOutcome::Failed(message));
    assert_eq!(state.prediction, None);
}

#[tokio::test]
async fn explain_reads_debug_route_without_touching_state() {
    let router = Router::new()
        .route(
            "/predict",
            post(|| async { Json(json!({ "prediction": 1 })) }),
        )
        .route(
            "/debug",
            post(|Json(body): Json<serde_json::Value>| async move {
                let row: Vec<serde_json::Value> = [
                    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach",
                    "exang", "oldpeak", "slope", "ca", "thal",
                ]
                .iter()
                .map(|k| body[*k].clone())
                .collect();
                Json(json!({
                    "input": [row],
                    "prediction": 1,
                    "probabilities": [[0.25, 0.75]],
                    "classes": [0, 1]
                }))
            }),
        );
    let controller = controller_for(&serve(router).await);
    let before = controller.state();

    let report = controller.explain().await.expect("debug report");

    assert_eq!(report.positive_probability(), Some(0.75));
    assert_eq!(report.input[0][0], 50.0);
    assert_eq!(controller.state(), before);
}
