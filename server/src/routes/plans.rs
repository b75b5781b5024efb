use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use super::not_found;
use crate::error::{AppError, MessageResponse};
use crate::models::{FastingPlan, PlanChanges, PlanId, PlanInput};
use crate::schema::ValidationError;
use crate::store::StoreError;
use crate::AppState;

pub const DELETED_MESSAGE: &str = "Fasting plan deleted successfully.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/plans",
            get(list_plans).post(create_plan).fallback(not_found),
        )
        .route(
            "/plans/{id}",
            put(update_plan).delete(delete_plan).fallback(not_found),
        )
}

fn internal(message: &'static str, source: impl Into<StoreError>) -> AppError {
    let source = source.into();
    error!(error = %source, "{message}");
    AppError::Internal { message, source }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Request body as a JSON value. Anything not sent as JSON, and an empty
/// JSON body, reads as `{}`.
fn json_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, ValidationError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        debug!("no JSON body, treating it as empty");
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedJson(e.to_string()))
}

async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<FastingPlan>>, AppError> {
    let plans = state
        .plans
        .list()
        .await
        .map_err(|e| internal("Error fetching fasting plans.", e))?;
    Ok(Json(plans))
}

async fn create_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<FastingPlan>), AppError> {
    const FAILED: &str = "Error creating fasting plan.";

    let input = json_body(&headers, &body)
        .and_then(PlanInput::try_from)
        .map_err(|e| internal(FAILED, e))?;
    let plan = state
        .plans
        .insert(input)
        .await
        .map_err(|e| internal(FAILED, e))?;
    info!(plan_id = %plan.id, "fasting plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// A malformed id is a store failure here (500); only delete checks the format up front.
async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FastingPlan>, AppError> {
    const FAILED: &str = "Error updating fasting plan.";

    let id: PlanId = id.parse().map_err(|e| internal(FAILED, e))?;
    let changes = json_body(&headers, &body)
        .and_then(PlanChanges::try_from)
        .map_err(|e| internal(FAILED, e))?;
    let plan = state
        .plans
        .update(id, changes)
        .await
        .map_err(|e| internal(FAILED, e))?
        .ok_or(AppError::PlanNotFound)?;
    Ok(Json(plan))
}

async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    info!(%id, "deleting fasting plan");
    let id: PlanId = id.parse().map_err(|_| {
        warn!(%id, "rejected malformed fasting plan id");
        AppError::InvalidPlanId
    })?;

    state
        .plans
        .delete(id)
        .await
        .map_err(|e| internal("Error deleting fasting plan.", e))?
        .ok_or(AppError::PlanNotFound)?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, response::Response};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::models::InvalidPlanId;
    use crate::routes;
    use crate::store::MockPlanStore;

    use super::*;

    const SOME_ID: &str = "7f1c3a4e-5b6d-4e8f-9a0b-1c2d3e4f5a6b";

    fn app(store: MockPlanStore) -> Router {
        routes::router(AppState {
            plans: Arc::new(store),
        })
    }

    fn failure() -> StoreError {
        StoreError::InvalidId(InvalidPlanId("simulated".to_string()))
    }

    async fn send(app: Router, method: &str, uri: &str, body: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn send_untyped(app: Router, method: &str, uri: &str, body: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn message(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: MessageResponse = serde_json::from_slice(&bytes).unwrap();
        body.message
    }

    #[tokio::test]
    async fn list_failure_is_a_generic_500() {
        let mut store = MockPlanStore::new();
        store.expect_list().returning(|| Err(failure()));

        let resp = send(app(store), "GET", "/fasting/plans", "").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error fetching fasting plans.");
    }

    #[tokio::test]
    async fn create_failure_is_a_generic_500() {
        let mut store = MockPlanStore::new();
        store.expect_insert().returning(|_| Err(failure()));

        let body = r#"{"name":"16:8","duration":16,"description":"d"}"#;
        let resp = send(app(store), "POST", "/fasting/plans", body).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error creating fasting plan.");
    }

    #[tokio::test]
    async fn update_failure_is_a_generic_500() {
        let mut store = MockPlanStore::new();
        store.expect_update().returning(|_, _| Err(failure()));

        let uri = format!("/fasting/plans/{SOME_ID}");
        let resp = send(app(store), "PUT", &uri, r#"{"name":"x"}"#).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error updating fasting plan.");
    }

    #[tokio::test]
    async fn delete_failure_is_a_generic_500() {
        let mut store = MockPlanStore::new();
        store.expect_delete().returning(|_| Err(failure()));

        let uri = format!("/fasting/plans/{SOME_ID}");
        let resp = send(app(store), "DELETE", &uri, "").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error deleting fasting plan.");
    }

    #[tokio::test]
    async fn malformed_delete_id_never_reaches_the_store() {
        let mut store = MockPlanStore::new();
        store.expect_delete().never();

        let resp = send(app(store), "DELETE", "/fasting/plans/not-an-id", "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message(resp).await, "Invalid fasting plan id.");
    }

    #[tokio::test]
    async fn malformed_update_id_is_a_500() {
        let mut store = MockPlanStore::new();
        store.expect_update().never();

        let resp = send(app(store), "PUT", "/fasting/plans/42", r#"{"name":"x"}"#).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error updating fasting plan.");
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));
        headers.insert(header::CONTENT_TYPE, "Application/JSON; charset=utf-8".parse().unwrap());
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        assert!(!is_json(&headers));
    }

    #[test]
    fn json_body_defaults_to_empty_object() {
        let mut headers = HeaderMap::new();
        assert_eq!(json_body(&headers, b"{\"name\":1}").unwrap(), serde_json::json!({}));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(json_body(&headers, b"  ").unwrap(), serde_json::json!({}));
        assert!(matches!(
            json_body(&headers, b"{oops"),
            Err(ValidationError::MalformedJson(_))
        ));
    }

    #[tokio::test]
    async fn array_body_never_reaches_the_store() {
        let mut store = MockPlanStore::new();
        store.expect_insert().never();

        let body = r#"["16:8", 16, "skip breakfast", false]"#;
        let resp = send(app(store), "POST", "/fasting/plans", body).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error creating fasting plan.");
    }

    #[tokio::test]
    async fn array_update_body_is_a_500() {
        let mut store = MockPlanStore::new();
        store.expect_update().never();

        let uri = format!("/fasting/plans/{SOME_ID}");
        let resp = send(app(store), "PUT", &uri, r#"[{"name":"x"}]"#).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error updating fasting plan.");
    }

    #[tokio::test]
    async fn untyped_create_body_reads_as_empty() {
        let mut store = MockPlanStore::new();
        store
            .expect_insert()
            .withf(|input| input.name.is_none() && input.duration.is_none())
            .returning(|_| Err(failure()));

        let body = r#"{"name":"16:8","duration":16,"description":"d"}"#;
        let resp = send_untyped(app(store), "POST", "/fasting/plans", body).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(resp).await, "Error creating fasting plan.");
    }

    #[tokio::test]
    async fn untyped_update_body_is_an_empty_change_set() {
        let mut store = MockPlanStore::new();
        store
            .expect_update()
            .withf(|_, changes| {
                changes.name.is_none()
                    && changes.duration.is_none()
                    && changes.description.is_none()
                    && changes.is_premium.is_none()
            })
            .returning(|_, _| Ok(None));

        let uri = format!("/fasting/plans/{SOME_ID}");
        let resp = send_untyped(app(store), "PUT", &uri, "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(message(resp).await, "Fasting plan not found.");
    }
}
