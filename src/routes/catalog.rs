//! Thin proxy over the metadata provider: trending, search, credits and the
//! provider's own per-title recommendations. List endpoints degrade upstream
//! failures to an empty page; entity endpoints degrade to `null`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{MediaType, PagedResults},
    routes::AppState,
    services::relevance,
};

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    query: Option<String>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EntityQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<String>,
}

/// Catalog list endpoints use the plural discriminator the selection UI sends
fn parse_catalog_type(kind: Option<&str>) -> AppResult<MediaType> {
    match kind {
        Some("movies") => Ok(MediaType::Movie),
        Some("tvshows") => Ok(MediaType::Tv),
        _ => Err(AppError::InvalidInput(
            "Invalid type parameter. Use \"movies\" or \"tvshows\".".to_string(),
        )),
    }
}

fn parse_media_type(kind: Option<&str>) -> AppResult<MediaType> {
    match kind {
        Some("movie") => Ok(MediaType::Movie),
        Some("tv") => Ok(MediaType::Tv),
        _ => Err(AppError::InvalidInput(
            "Invalid type parameter. Use \"movie\" or \"tv\".".to_string(),
        )),
    }
}

/// Trending works of the week
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<PagedResults>> {
    let media_type = parse_catalog_type(params.kind.as_deref())?;
    let page = params.page.unwrap_or(1);

    let results = match state.provider.trending(media_type, page).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(
                media_type = %media_type,
                error = %e,
                timeout = e.is_timeout(),
                "Trending fetch failed, serving empty page"
            );
            PagedResults::default()
        }
    };

    Ok(Json(results))
}

/// Provider search, ordered by relevance of each title to the query
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<PagedResults>> {
    let query = params
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Query parameter is required".to_string()))?;
    let media_type = parse_catalog_type(params.kind.as_deref())?;
    let page = params.page.unwrap_or(1);

    let mut results = match state.provider.search(media_type, query, page).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(
                media_type = %media_type,
                query = %query,
                error = %e,
                timeout = e.is_timeout(),
                "Search fetch failed, serving empty page"
            );
            PagedResults::default()
        }
    };

    relevance::sort_by_relevance(&mut results.results, query);

    tracing::info!(
        media_type = %media_type,
        query = %query,
        results = results.results.len(),
        "Search completed"
    );

    Ok(Json(results))
}

/// Cast credits for one work or one person's combined filmography
pub async fn credits(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EntityQuery>,
) -> AppResult<Json<Value>> {
    let id = params
        .id
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("ID parameter is required".to_string()))?;

    let Some(numeric_id) = parse_numeric_id(id) else {
        tracing::warn!(id = %id, "Non-numeric id for credits lookup");
        return Ok(Json(Value::Null));
    };

    let payload = match params.kind.as_deref() {
        Some("person") => match state.provider.person_credits(numeric_id).await {
            Ok(credits) => serde_json::to_value(credits)?,
            Err(e) => {
                tracing::warn!(
                    person_id = numeric_id,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Person credits fetch failed, serving null"
                );
                Value::Null
            }
        },
        kind => {
            let media_type = parse_credits_media_type(kind)?;
            match state.provider.credits(media_type, numeric_id).await {
                Ok(credits) => serde_json::to_value(credits)?,
                Err(e) => {
                    tracing::warn!(
                        media_type = %media_type,
                        work_id = numeric_id,
                        error = %e,
                        timeout = e.is_timeout(),
                        "Credits fetch failed, serving null"
                    );
                    Value::Null
                }
            }
        }
    };

    Ok(Json(payload))
}

fn parse_credits_media_type(kind: Option<&str>) -> AppResult<MediaType> {
    match kind {
        Some("movie") => Ok(MediaType::Movie),
        Some("tv") => Ok(MediaType::Tv),
        _ => Err(AppError::InvalidInput(
            "Invalid type parameter. Use \"movie\", \"tv\", or \"person\".".to_string(),
        )),
    }
}

/// The provider's own recommendations for one title
pub async fn title_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EntityQuery>,
) -> AppResult<Json<PagedResults>> {
    let id = params
        .id
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("ID parameter is required".to_string()))?;
    let media_type = parse_media_type(params.kind.as_deref())?;

    let Some(numeric_id) = parse_numeric_id(id) else {
        tracing::warn!(id = %id, "Non-numeric id for title recommendations");
        return Ok(Json(PagedResults::default()));
    };

    let results = match state
        .provider
        .title_recommendations(media_type, numeric_id)
        .await
    {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(
                media_type = %media_type,
                work_id = numeric_id,
                error = %e,
                timeout = e.is_timeout(),
                "Title recommendations fetch failed, serving empty page"
            );
            PagedResults::default()
        }
    };

    Ok(Json(results))
}

fn parse_numeric_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_type_uses_plural_discriminators() {
        assert_eq!(parse_catalog_type(Some("movies")).unwrap(), MediaType::Movie);
        assert_eq!(parse_catalog_type(Some("tvshows")).unwrap(), MediaType::Tv);
        assert!(parse_catalog_type(Some("movie")).is_err());
        assert!(parse_catalog_type(None).is_err());
    }

    #[test]
    fn entity_type_uses_singular_discriminators() {
        assert_eq!(parse_media_type(Some("movie")).unwrap(), MediaType::Movie);
        assert_eq!(parse_media_type(Some("tv")).unwrap(), MediaType::Tv);
        assert!(parse_media_type(Some("movies")).is_err());
    }

    #[test]
    fn numeric_ids_must_be_positive() {
        assert_eq!(parse_numeric_id("27205"), Some(27205));
        assert_eq!(parse_numeric_id("0"), None);
        assert_eq!(parse_numeric_id("abc"), None);
    }
}
