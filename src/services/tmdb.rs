/// TMDB API provider
///
/// All requests share one `reqwest` client with a bounded timeout (30 s by
/// default). Non-2xx responses map to `AppError::ExternalApi`; transport
/// failures and timeouts map to `AppError::HttpClient`. No retries.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Credits, MediaType, PagedResults, PersonCreditEntry, PersonCredits},
    services::metadata::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    /// Creates a TMDB client from the application configuration
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.clone(),
        })
    }

    #[cfg(test)]
    fn for_tests(api_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: "test_key".to_string(),
            api_url: api_url.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

/// Keeps only filmography entries complete enough to be recommended: a real
/// id, a known media type, a display title, a poster and at least one vote.
fn is_complete_credit(entry: &PersonCreditEntry) -> bool {
    entry.id != 0
        && matches!(entry.media_type.as_deref(), Some("movie") | Some("tv"))
        && entry.display_title().is_some_and(|t| !t.is_empty())
        && entry.poster_path.as_deref().is_some_and(|p| !p.is_empty())
        && entry.vote_count > 0
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn trending(&self, media_type: MediaType, page: u32) -> AppResult<PagedResults> {
        let path = format!("/trending/{}/week", media_type.as_str());
        self.get_json(&path, &[("page", page.to_string())]).await
    }

    async fn search(
        &self,
        media_type: MediaType,
        query: &str,
        page: u32,
    ) -> AppResult<PagedResults> {
        let path = format!("/search/{}", media_type.as_str());
        self.get_json(
            &path,
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn credits(&self, media_type: MediaType, id: u64) -> AppResult<Option<Credits>> {
        if id == 0 {
            tracing::warn!(media_type = %media_type, "Invalid work id for credits lookup");
            return Ok(None);
        }

        let path = format!("/{}/{}/credits", media_type.as_str(), id);
        let credits: Credits = self.get_json(&path, &[]).await?;
        Ok(Some(credits))
    }

    async fn person_credits(&self, person_id: u64) -> AppResult<Option<PersonCredits>> {
        if person_id == 0 {
            tracing::warn!("Invalid person id for combined credits lookup");
            return Ok(None);
        }

        let path = format!("/person/{}/combined_credits", person_id);
        let mut credits: PersonCredits = self.get_json(&path, &[]).await?;
        credits.cast.retain(is_complete_credit);
        Ok(Some(credits))
    }

    async fn title_recommendations(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> AppResult<PagedResults> {
        let path = format!("/{}/{}/recommendations", media_type.as_str(), id);
        self.get_json(&path, &[]).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
