//! API routes
//!
//! | method | path              | status                |
//! |--------|-------------------|-----------------------|
//! | POST   | `/api/eval`       | 200 / 400 / 404 / 500 |
//! | POST   | `/api/generate`   | 200                   |
//! | GET    | `/api/cases`      | 200                   |
//! | GET    | `/api/principles` | 200                   |
//! | GET    | `/health`         | 200                   |

use super::AppState;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dilemma_application::EvaluateError;
use dilemma_domain::{EvaluationResponse, InputError, Principle, ScenarioProposal, ThoughtCase};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, warn};

type AppStateArc = Arc<AppState>;

/// Error body: `{"error": ..., "details"?: [...]}`
struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

impl From<EvaluateError> for ApiError {
    fn from(err: EvaluateError) -> Self {
        match err {
            EvaluateError::InvalidInput(InputError::Invalid(violations)) => {
                let details: Vec<Value> = violations
                    .iter()
                    .map(|v| json!({ "field": v.field, "message": v.message }))
                    .collect();
                Self {
                    status: StatusCode::BAD_REQUEST,
                    body: json!({ "error": "Invalid input", "details": details }),
                }
            }
            EvaluateError::InvalidInput(err) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            EvaluateError::CaseNotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            EvaluateError::ResponseAssembly(_) => {
                error!("{}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Response validation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============================================================================
// API Routes
// ============================================================================

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/eval", post(evaluate))
        .route("/api/generate", post(generate))
        .route("/api/cases", get(list_cases))
        .route("/api/principles", get(list_principles))
}

async fn evaluate(
    State(state): State<AppStateArc>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected evaluation body: {}", rejection.body_text());
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let response = state.evaluate.execute_json(body).await?;
    Ok(Json(response))
}

async fn generate(State(state): State<AppStateArc>) -> Json<ScenarioProposal> {
    Json(state.generate.execute().await)
}

async fn list_cases() -> Json<&'static [ThoughtCase]> {
    Json(ThoughtCase::all())
}

async fn list_principles() -> Json<Vec<Value>> {
    Json(
        Principle::ALL
            .into_iter()
            .map(|p| json!({ "id": p.id(), "label": p.label(), "description": p.description() }))
            .collect(),
    )
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[cfg(test)]
mod tests {
    use super::super::router;
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use crate::server::BasicAuth;
    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use dilemma_application::{
        CredentialResolver, EvaluateUseCase, EvaluationConfig, GenerateScenarioUseCase,
        NoCredentials,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(mock_mode: bool) -> Router {
        let config = EvaluationConfig::default().with_mock_mode(mock_mode);
        router(AppState::new(
            EvaluateUseCase::new(config.clone(), Arc::new(NoCredentials)),
            GenerateScenarioUseCase::new(config, Arc::new(NoCredentials)),
        ))
    }

    struct PanelLogin;

    #[async_trait]
    impl CredentialResolver for PanelLogin {
        async fn resolve(&self, name: &str) -> Option<String> {
            match name {
                "BASIC_AUTH_USER" => Some("panel".to_string()),
                "BASIC_AUTH_PASSWORD" => Some("s3cret".to_string()),
                _ => None,
            }
        }
    }

    fn guarded_app(credentials: Arc<dyn CredentialResolver>) -> Router {
        let config = EvaluationConfig::default().with_mock_mode(true);
        router(
            AppState::new(
                EvaluateUseCase::new(config.clone(), Arc::new(NoCredentials)),
                GenerateScenarioUseCase::new(config, Arc::new(NoCredentials)),
            )
            .with_basic_auth(BasicAuth::new(
                "BASIC_AUTH_USER",
                "BASIC_AUTH_PASSWORD",
                credentials,
            )),
        )
    }

    fn get_with_login(uri: &str, login: Option<&str>) -> Request<Body> {
        let mut request = Request::get(uri);
        if let Some(login) = login {
            request = request.header("authorization", format!("Basic {}", STANDARD.encode(login)));
        }
        request.body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn eval_body(case_id: &str, conditions: &[&str]) -> Value {
        json!({
            "caseId": case_id,
            "principleId": "utilitarian",
            "ifConditions": conditions,
            "targetConfidence": 80,
            "scenarioText": "runaway trolley",
            "optionA": "pull",
            "optionB": "wait"
        })
    }

    #[tokio::test]
    async fn test_eval_mock_mode_ok() {
        let (status, body) = send(app(true), post_json("/api/eval", eval_body("trolley", &[]))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"]["gpt"]["decision"], "A");
        assert_eq!(body["results"]["claude"]["confidence"], 78);
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_eval_without_credentials_still_ok() {
        let (status, body) = send(app(false), post_json("/api/eval", eval_body("theseus", &[]))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errors"].as_object().unwrap().len(), 3);
        assert_eq!(body["results"]["gemini"]["confidence"], 51);
    }

    #[tokio::test]
    async fn test_eval_invalid_input_is_400() {
        let (status, body) = send(
            app(true),
            post_json("/api/eval", eval_body("trolley", &["a", "b", "c"])),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input");
        assert_eq!(body["details"][0]["field"], "ifConditions");
    }

    #[tokio::test]
    async fn test_eval_unparseable_body_is_400() {
        let request = Request::post("/api/eval")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(app(true), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_eval_unknown_case_is_404() {
        let (status, body) = send(app(true), post_json("/api/eval", eval_body("lifeboat", &[]))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("lifeboat"));
    }

    #[tokio::test]
    async fn test_generate_always_ok() {
        let request = Request::post("/api/generate").body(Body::empty()).unwrap();
        let (status, body) = send(app(false), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"].as_array().unwrap().len(), 2);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let (_, cases) = send(app(true), Request::get("/api/cases").body(Body::empty()).unwrap()).await;
        assert_eq!(cases[0]["id"], "trolley");
        assert!(cases[0]["scenarioText"].is_string());

        let (_, principles) =
            send(app(true), Request::get("/api/principles").body(Body::empty()).unwrap()).await;
        assert_eq!(principles.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(true), Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_basic_auth_unset_passes() {
        let app = guarded_app(Arc::new(NoCredentials));
        let (status, _) = send(app, get_with_login("/api/cases", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_basic_auth_wrong_credentials_rejected() {
        for login in [None, Some("panel:wrong"), Some("other:s3cret")] {
            let response = guarded_app(Arc::new(PanelLogin))
                .oneshot(get_with_login("/api/cases", login))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{:?}", login);
            assert_eq!(
                response.headers()["www-authenticate"],
                r#"Basic realm="Secure Area""#
            );
        }
    }

    #[tokio::test]
    async fn test_basic_auth_correct_credentials_pass() {
        let app = guarded_app(Arc::new(PanelLogin));
        let (status, body) = send(app, get_with_login("/health", Some("panel:s3cret"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
