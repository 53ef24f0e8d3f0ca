use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, StatusCode},
    Extension, Json,
};

use crate::{
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

/// Caching is disabled for this endpoint: identical lists can deserve
/// different answers as the upstream catalog moves.
const NO_STORE_HEADERS: [(HeaderName, &str); 2] = [
    (header::CACHE_CONTROL, "no-store, max-age=0"),
    (header::PRAGMA, "no-cache"),
];

type RecommendReply = (
    StatusCode,
    [(HeaderName, &'static str); 2],
    Json<RecommendationResponse>,
);

/// Handler for the actor-based recommendation endpoint.
///
/// Always answers 200: malformed bodies, empty lists and upstream failures
/// all collapse into the empty recommendation set.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> RecommendReply {
    let request: RecommendationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Unparseable recommendation request, returning empty set"
            );
            return (
                StatusCode::OK,
                NO_STORE_HEADERS,
                Json(RecommendationResponse::default()),
            );
        }
    };

    tracing::info!(
        request_id = %request_id,
        selected_items = request.selected_items.len(),
        media_type = %request.media_type,
        "Processing recommendation request"
    );

    let response = state
        .recommender
        .recommend(&request.selected_items, request.media_type)
        .await;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendation request completed"
    );

    (StatusCode::OK, NO_STORE_HEADERS, Json(response))
}
