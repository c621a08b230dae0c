//! Stateful category views: navigate, search, reload

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::views::{CategoryView, NavigateOutcome, ViewSnapshot};
use crate::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Response for view creation
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewResponse {
    pub view_id: String,
}

/// Request to navigate a view
#[derive(Deserialize)]
pub struct NavigateRequest {
    pub slug: String,
}

/// Request to change the search query
#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

async fn find_view(state: &AppState, id: &str) -> Result<Arc<CategoryView>, ApiError> {
    state.views.get(id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "View not found" })),
        )
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        (
            rejection.status(),
            Json(serde_json::json!({ "error": rejection.body_text() })),
        )
    })
}

fn outcome_response(outcome: NavigateOutcome) -> Result<Json<ViewSnapshot>, ApiError> {
    match outcome {
        NavigateOutcome::Committed(snapshot) | NavigateOutcome::Unchanged(snapshot) => Ok(Json(snapshot)),
        NavigateOutcome::Superseded => Err((
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "Superseded by a newer navigation" })),
        )),
    }
}

/// POST /api/views - Create a view
pub async fn create_view(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.views.create().await;
    tracing::info!(view_id = %view.id(), "View created");

    (
        StatusCode::CREATED,
        Json(CreateViewResponse {
            view_id: view.id().to_string(),
        }),
    )
}

/// GET /api/views/:id - Current snapshot
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&state, &id).await?;
    Ok(Json(view.snapshot().await))
}

/// PUT /api/views/:id/category - Navigate to a category slug
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<NavigateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    if payload.slug.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Slug is required" })),
        ));
    }

    let view = find_view(&state, &id).await?;
    outcome_response(view.navigate(&payload.slug).await)
}

/// PUT /api/views/:id/search - Update the search query
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let view = find_view(&state, &id).await?;
    Ok(Json(view.set_query(&payload.query).await))
}

/// POST /api/views/:id/reload - Manual retry of the current slug
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = find_view(&state, &id).await?;
    match view.reload().await {
        Some(outcome) => outcome_response(outcome),
        None => Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "View has no category to reload" })),
        )),
    }
}
