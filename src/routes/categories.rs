use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::error::LoadError;
use crate::models::{CategoriesResponse, CategoryChannelsResponse, ChannelsQuery};
use crate::services::search::filter_channels;
use crate::AppState;

/// Map a load failure to the JSON error shape used by every handler
pub fn load_error_response(err: &LoadError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        LoadError::NotFound => StatusCode::NOT_FOUND,
        LoadError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

/// GET /api/categories - All categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let categories = state
        .loader
        .list_categories()
        .await
        .map_err(|e| load_error_response(&e))?;

    Ok(Json(CategoriesResponse {
        total: categories.len(),
        categories,
    }))
}

/// GET /api/categories/:slug/channels?q= - Load a category and filter its channels
pub async fn get_category_channels(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<ChannelsQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let loaded = state
        .loader
        .load(&slug)
        .await
        .map_err(|e| load_error_response(&e))?;

    let channels = filter_channels(&loaded.channels, &query.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(CategoryChannelsResponse {
        category: loaded.category,
        total: loaded.channels.len(),
        channels,
        query: query.q,
    }))
}
