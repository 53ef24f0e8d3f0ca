use serde::{Deserialize, Serialize};

/// Kind of work the catalog deals in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// The TMDB path segment / `media_type` discriminator for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item the user has saved to their list.
///
/// `id` is the provider's numeric work id, stringified by the client.
/// Uniqueness within a list is enforced by `id`; ordering is not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: String,
    pub media_type: MediaType,
}

impl SavedItem {
    /// Parses the stringified work id, accepting only positive numeric ids.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse::<u64>().ok().filter(|id| *id > 0)
    }
}

/// One credited cast member of a single work, as returned by the provider.
/// Ephemeral: fetched per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
}

/// Cast credits for a single movie or TV show
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// One entry of a person's combined filmography
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCreditEntry {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
}

impl PersonCreditEntry {
    /// Display title: movies carry `title`, TV shows carry `name`.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    /// Release or first-air date, whichever the entry carries.
    pub fn release_or_air_date(&self) -> Option<&str> {
        self.release_date.as_deref().or(self.first_air_date.as_deref())
    }
}

/// A person's combined cast credits across movies and TV
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCredits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub cast: Vec<PersonCreditEntry>,
}

/// A work record as it appears in trending/search/recommendation pages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbWork {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl TmdbWork {
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// One page of provider list results. Upstream failures degrade to the
/// default value, i.e. an empty page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagedResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<TmdbWork>,
}
