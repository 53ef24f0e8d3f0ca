use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{MediaType, SavedItem},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    media_type: Option<MediaType>,
}

/// Returns the saved list, optionally filtered to one media type
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<SavedItem>>> {
    let items = match params.media_type {
        Some(media_type) => state.list.filtered(media_type).await?,
        None => state.list.items().await?,
    };
    Ok(Json(items))
}

/// Saves an item. Adding an id that is already present is a no-op and
/// answers 200 instead of 201.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<SavedItem>,
) -> AppResult<(StatusCode, Json<SavedItem>)> {
    let added = state.list.add(item.clone()).await?;
    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(item)))
}

/// Removes a saved item by id
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.list.remove(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No saved item with id {}", id)))
    }
}
