//! HTTP routes: JSON prediction API, HTML form, and model metadata.

use axum::{
    body::Bytes,
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::classifier::{self, Prediction};
use crate::error::{ApiError, ErrorResponse};
use crate::model::{Model, ModelInfo};
use crate::render;

pub const LIVENESS_MESSAGE: &str = "Naive Bayes Sentiment Classifier is running!";
pub const EMPTY_FORM_MESSAGE: &str = "Please enter some text!";

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub model: Model,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Review text to classify.
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub text: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(predict, model_info),
    components(schemas(PredictRequest, Prediction, ErrorResponse, ModelInfo)),
    tags((name = "sentiment", description = "Review Sentiment API"))
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/form", get(form))
        .route("/analyze", post(analyze))
        .route("/model", get(model_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

/// Classify review text
///
/// The body is parsed by hand so that malformed JSON gets the same 400 as a
/// missing field.
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Predicted label and class probabilities", body = Prediction),
        (status = 400, description = "Body is not JSON or has no string 'text'", body = ErrorResponse)
    ),
    tag = "sentiment"
)]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Prediction>, ApiError> {
    let req: PredictRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected /predict body: {}", e);
        ApiError::MissingText
    })?;

    Ok(Json(classifier::predict(&req.text, &state.model)))
}

pub async fn form() -> Html<&'static str> {
    Html(render::FORM_PAGE)
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    form: Result<Form<AnalyzeForm>, FormRejection>,
) -> Response {
    let text = form
        .ok()
        .and_then(|Form(f)| f.text)
        .filter(|t| !t.is_empty());

    match text {
        Some(text) => {
            let prediction = classifier::predict(&text, &state.model);
            Html(render::result_page(&prediction)).into_response()
        }
        None => EMPTY_FORM_MESSAGE.into_response(),
    }
}

/// Describe the loaded model
#[utoipa::path(
    get,
    path = "/model",
    responses(
        (status = 200, description = "Classes, priors, vocabulary size and smoothing constant", body = ModelInfo)
    ),
    tag = "sentiment"
)]
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfo> {
    Json(state.model.info())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let model = Model::from_json_str(include_str!("../nb_model.json")).unwrap();
        router(Arc::new(AppState { model }))
    }

    async fn send(request: Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_predict_missing_text() {
        for body in ["{}", "not json", "[1, 2]", r#"{"text": 42}"#, ""] {
            let (status, body) = send(post_json(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let json: Value = serde_json::from_str(&body).unwrap();
            assert_eq!(json["error"], "Please provide 'text'");
        }
    }

    #[tokio::test]
    async fn test_predict_negative_review() {
        let (status, body) = send(post_json(r#"{"text": "terrible waste of time"}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).unwrap();
        let label = json["label"].as_str().unwrap();
        let probs = json["probabilities"].as_object().unwrap();
        let sum: f64 = probs.values().map(|p| p.as_f64().unwrap()).sum();
        assert!((sum - 1.0).abs() < 1e-9);

        let (best, _) = probs
            .iter()
            .max_by(|a, b| a.1.as_f64().unwrap().total_cmp(&b.1.as_f64().unwrap()))
            .unwrap();
        assert_eq!(label, best);
        assert_eq!(label, "neg");
    }

    #[tokio::test]
    async fn test_predict_empty_text_is_accepted() {
        let (status, body) = send(post_json(r#"{"text": ""}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert!(json["label"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_renders_result() {
        let (status, body) = send(post_form("text=A+great+and+wonderful+film")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Positive"));
        assert!(body.contains("Probabilities:"));
        assert!(body.contains("<b>neg</b>"));
    }

    #[tokio::test]
    async fn test_analyze_without_text() {
        for body in ["", "text=", "other=1"] {
            let (status, body) = send(post_form(body)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, EMPTY_FORM_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_static_pages() {
        let (status, body) = send(get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, LIVENESS_MESSAGE);

        let (status, body) = send(get_request("/form")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"action="/analyze""#));
    }

    #[tokio::test]
    async fn test_model_info() {
        let (status, body) = send(get_request("/model")).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["classes"], serde_json::json!(["neg", "pos"]));
        assert!(json["vocab_size"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let (status, body) = send(get_request("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/predict"));
    }
}
