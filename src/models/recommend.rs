use serde::{Deserialize, Serialize};

use super::media::{MediaType, SavedItem};

/// Body of `POST /api/v1/recommendations`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub selected_items: Vec<SavedItem>,
    pub media_type: MediaType,
}

/// A work surfaced as a possible recommendation.
///
/// Wire field names follow the provider payload (snake_case), with the
/// contributing actor's name, character and formatted salience attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateWork {
    pub id: String,
    pub title: String,
    pub poster_path: String,
    pub media_type: MediaType,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub score: f64,
    pub actor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_character: Option<String>,
    pub actor_relevance: String,
}

/// Per-actor statistics exposed for debugging the salience pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorDebug {
    pub name: String,
    /// Salience score formatted to two decimals
    pub score: String,
    pub appearances: u32,
    /// Best billing position seen, 1-based for display
    #[serde(rename = "bestBilling")]
    pub best_billing: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationDebug {
    #[serde(rename = "processedActors")]
    pub processed_actors: Vec<ActorDebug>,
}

/// Ranked recommendation payload. An empty `recommendations` list is the
/// "no recommendations" outcome, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<CandidateWork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<RecommendationDebug>,
}
