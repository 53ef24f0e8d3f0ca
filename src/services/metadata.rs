/// Metadata provider abstraction
///
/// Seam between the HTTP layer and the concrete TMDB client. The trait
/// surfaces upstream failures as errors; policy lives with the callers:
/// catalog handlers degrade list endpoints to an empty page, and the
/// recommendation pipeline skips the failed item or actor and continues.
use crate::{
    error::AppResult,
    models::{Credits, MediaType, PagedResults, PersonCredits},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// This week's trending works of one media type
    async fn trending(&self, media_type: MediaType, page: u32) -> AppResult<PagedResults>;

    /// Text search over works of one media type
    async fn search(&self, media_type: MediaType, query: &str, page: u32)
        -> AppResult<PagedResults>;

    /// Cast credits for one work. `Ok(None)` means the work has no usable
    /// credits (unknown id, empty payload), which callers treat like an
    /// empty cast.
    async fn credits(&self, media_type: MediaType, id: u64) -> AppResult<Option<Credits>>;

    /// A person's combined filmography across movies and TV, filtered to
    /// entries complete enough to recommend.
    async fn person_credits(&self, person_id: u64) -> AppResult<Option<PersonCredits>>;

    /// The provider's own per-title recommendation list
    async fn title_recommendations(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> AppResult<PagedResults>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
