//! Actor-based recommendation pipeline.
//!
//! Three passes over the user's saved list:
//! 1. fetch cast credits per saved item and aggregate per-actor statistics
//!    into a salience score,
//! 2. expand the top-salience actors into their combined filmographies and
//!    score each eligible work,
//! 3. merge candidates first-actor-wins, rank by score and truncate.
//!
//! Upstream failures are never fatal here: a failed item or actor fetch is
//! logged and skipped, and the worst case is an empty recommendation list.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, Utc};

use crate::{
    models::{
        ActorDebug, CandidateWork, MediaType, PersonCreditEntry, RecommendationDebug,
        RecommendationResponse, SavedItem,
    },
    services::metadata::MetadataProvider,
};

// Weights of the salience sub-scores. Billing position dominates, frequency
// of appearance next, the actor's general popularity least.
const BILLING_WEIGHT: f64 = 0.5;
const FREQUENCY_WEIGHT: f64 = 0.3;
const POPULARITY_WEIGHT: f64 = 0.2;

// Weights of the candidate sub-scores.
const CANDIDATE_ACTOR_WEIGHT: f64 = 0.4;
const CANDIDATE_POPULARITY_WEIGHT: f64 = 0.2;
const CANDIDATE_VOTE_WEIGHT: f64 = 0.2;
const CANDIDATE_VOTE_COUNT_WEIGHT: f64 = 0.1;
const CANDIDATE_BILLING_WEIGHT: f64 = 0.1;
const RECENT_BONUS: f64 = 0.2;

/// Heuristic thresholds of the pipeline. These are tuning defaults, not
/// invariants; tests override them to exercise the caps.
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    /// Global cap on the response size
    pub max_recommendations: usize,
    /// How many top-salience actors to expand
    pub max_actors: usize,
    /// Candidates kept per actor before merging
    pub max_works_per_actor: usize,
    /// How many billed cast members count per saved item
    pub top_billed: usize,
    /// Minimum votes for a candidate work
    pub min_vote_count: u64,
    /// Minimum vote average for a candidate work
    pub min_vote_average: f64,
    /// Works released within this many years earn the recency bonus
    pub recent_window_years: i32,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 50,
            max_actors: 10,
            max_works_per_actor: 5,
            top_billed: 10,
            min_vote_count: 50,
            min_vote_average: 5.5,
            recent_window_years: 15,
        }
    }
}

/// Per-actor aggregate built while walking the saved items. Keyed by actor
/// id in the caller's map; discarded after the request.
#[derive(Debug, Clone)]
struct ActorAggregate {
    name: String,
    appearances: u32,
    max_popularity: f64,
    best_billing: usize,
}

/// An aggregate with its derived salience score
#[derive(Debug, Clone)]
struct ActorScore {
    id: u64,
    name: String,
    score: f64,
    appearances: u32,
    best_billing: usize,
}

/// Salience of one actor within the saved list, each sub-score clamped to
/// [0, 1] before weighting. Lower billing index and more appearances score
/// higher; frequency benefit caps at three appearances.
fn actor_salience(
    best_billing: usize,
    appearances: u32,
    max_popularity: f64,
    average_popularity: f64,
) -> f64 {
    let billing_score = (1.0 - best_billing as f64 / 10.0).max(0.0);
    let frequency_score = (f64::from(appearances) / 3.0).min(1.0);
    let popularity_score = if average_popularity > 0.0 {
        (max_popularity / average_popularity).min(1.0)
    } else {
        0.0
    };

    billing_score * BILLING_WEIGHT
        + frequency_score * FREQUENCY_WEIGHT
        + popularity_score * POPULARITY_WEIGHT
}

/// Score of one candidate work. Uses the contributing actor's overall
/// salience and best billing index, not the actor's billing in this work.
fn candidate_score(
    work: &PersonCreditEntry,
    actor_score: f64,
    actor_billing: usize,
    current_year: i32,
    recent_window_years: i32,
) -> f64 {
    let popularity_score = work.popularity.max(1.0).log10() / 2.0;
    let vote_score = work.vote_average / 10.0;
    let vote_count_weight = (work.vote_count as f64 / 500.0).min(1.0);
    let billing_weight = (1.0 - actor_billing as f64 / 10.0).max(0.1);
    let recent_bonus = match release_year(work) {
        Some(year) if current_year - year <= recent_window_years => RECENT_BONUS,
        _ => 0.0,
    };

    actor_score * CANDIDATE_ACTOR_WEIGHT
        + popularity_score * CANDIDATE_POPULARITY_WEIGHT
        + vote_score * CANDIDATE_VOTE_WEIGHT
        + vote_count_weight * CANDIDATE_VOTE_COUNT_WEIGHT
        + billing_weight * CANDIDATE_BILLING_WEIGHT
        + recent_bonus
}

fn release_year(work: &PersonCreditEntry) -> Option<i32> {
    work.release_or_air_date()
        .and_then(|date| date.get(..4))
        .and_then(|year| year.parse().ok())
}

/// Descending by score with an explicit id tie-break, so equal scores do not
/// depend on map iteration order.
fn by_score_desc(a_score: f64, a_id: u64, b_score: f64, b_id: u64) -> Ordering {
    b_score
        .partial_cmp(&a_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_id.cmp(&b_id))
}

/// Drives the recommendation pipeline against an injected metadata provider
#[derive(Clone)]
pub struct Recommender {
    provider: Arc<dyn MetadataProvider>,
    config: RecommendConfig,
}

impl Recommender {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self::with_config(provider, RecommendConfig::default())
    }

    pub fn with_config(provider: Arc<dyn MetadataProvider>, config: RecommendConfig) -> Self {
        Self { provider, config }
    }

    /// Produces ranked recommendations for one saved list.
    ///
    /// Infallible by design: invalid input and upstream failures all collapse
    /// into the "no recommendations" outcome.
    pub async fn recommend(
        &self,
        items: &[SavedItem],
        media_type: MediaType,
    ) -> RecommendationResponse {
        let valid_ids: Vec<u64> = items.iter().filter_map(SavedItem::numeric_id).collect();
        if valid_ids.is_empty() {
            tracing::debug!("No valid saved items, returning empty recommendation set");
            return RecommendationResponse::default();
        }

        let actors = self.score_actors(&valid_ids, media_type).await;
        let mut seen: HashSet<u64> = valid_ids.into_iter().collect();
        let recommendations = self.collect_candidates(&actors, media_type, &mut seen).await;

        let debug = RecommendationDebug {
            processed_actors: actors
                .iter()
                .map(|actor| ActorDebug {
                    name: actor.name.clone(),
                    score: format!("{:.2}", actor.score),
                    appearances: actor.appearances,
                    best_billing: actor.best_billing + 1,
                })
                .collect(),
        };

        RecommendationResponse {
            recommendations,
            debug: Some(debug),
        }
    }

    /// First pass: aggregate cast statistics across the saved items and rank
    /// actors by salience, keeping the top `max_actors`.
    async fn score_actors(&self, item_ids: &[u64], media_type: MediaType) -> Vec<ActorScore> {
        let mut aggregates: HashMap<u64, ActorAggregate> = HashMap::new();
        let mut total_popularity = 0.0;
        let mut slot_count: u32 = 0;

        for &item_id in item_ids {
            let credits = match self.provider.credits(media_type, item_id).await {
                Ok(Some(credits)) if !credits.cast.is_empty() => credits,
                Ok(_) => {
                    tracing::debug!(item_id, "No cast for saved item, skipping");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        item_id,
                        error = %e,
                        timeout = e.is_timeout(),
                        "Credits fetch failed, skipping saved item"
                    );
                    continue;
                }
            };

            for (index, member) in credits.cast.iter().take(self.config.top_billed).enumerate() {
                if member.id == 0 {
                    continue;
                }

                let entry = aggregates.entry(member.id).or_insert_with(|| ActorAggregate {
                    name: member.name.clone(),
                    appearances: 0,
                    max_popularity: 0.0,
                    best_billing: usize::MAX,
                });

                entry.appearances += 1;
                entry.max_popularity = entry.max_popularity.max(member.popularity);
                entry.best_billing = entry.best_billing.min(index);
                // Latest snapshot wins for display data
                entry.name = member.name.clone();

                total_popularity += member.popularity;
                slot_count += 1;
            }
        }

        let average_popularity = total_popularity / f64::from(slot_count.max(1));

        let mut actors: Vec<ActorScore> = aggregates
            .into_iter()
            .map(|(id, agg)| ActorScore {
                id,
                score: actor_salience(
                    agg.best_billing,
                    agg.appearances,
                    agg.max_popularity,
                    average_popularity,
                ),
                name: agg.name,
                appearances: agg.appearances,
                best_billing: agg.best_billing,
            })
            .collect();

        actors.sort_by(|a, b| by_score_desc(a.score, a.id, b.score, b.id));
        actors.truncate(self.config.max_actors);
        actors
    }

    /// Second pass: expand each top actor into scored candidate works and
    /// merge them first-actor-wins, then rank the merged set.
    async fn collect_candidates(
        &self,
        actors: &[ActorScore],
        media_type: MediaType,
        seen: &mut HashSet<u64>,
    ) -> Vec<CandidateWork> {
        let current_year = Utc::now().year();
        let mut recommended: HashMap<u64, CandidateWork> = HashMap::new();

        for actor in actors {
            if recommended.len() >= self.config.max_recommendations {
                break;
            }

            let filmography = match self.provider.person_credits(actor.id).await {
                Ok(Some(credits)) if !credits.cast.is_empty() => credits,
                Ok(_) => {
                    tracing::debug!(actor_id = actor.id, "No filmography for actor, skipping");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        actor_id = actor.id,
                        error = %e,
                        timeout = e.is_timeout(),
                        "Filmography fetch failed, skipping actor"
                    );
                    continue;
                }
            };

            let mut works: Vec<(f64, &PersonCreditEntry)> = filmography
                .cast
                .iter()
                .filter(|work| self.is_eligible(work, media_type, seen))
                .map(|work| {
                    let score = candidate_score(
                        work,
                        actor.score,
                        actor.best_billing,
                        current_year,
                        self.config.recent_window_years,
                    );
                    (score, work)
                })
                .collect();

            works.sort_by(|a, b| by_score_desc(a.0, a.1.id, b.0, b.1.id));
            works.truncate(self.config.max_works_per_actor);

            for (score, work) in works {
                if recommended.len() >= self.config.max_recommendations {
                    break;
                }
                if recommended.contains_key(&work.id) {
                    continue;
                }

                recommended.insert(
                    work.id,
                    CandidateWork {
                        id: work.id.to_string(),
                        title: work.display_title().unwrap_or_default().to_string(),
                        poster_path: work.poster_path.clone().unwrap_or_default(),
                        media_type,
                        popularity: work.popularity,
                        vote_average: work.vote_average,
                        vote_count: work.vote_count,
                        release_date: work.release_or_air_date().map(str::to_string),
                        score,
                        actor_name: actor.name.clone(),
                        actor_character: work.character.clone(),
                        actor_relevance: format!("{:.2}", actor.score),
                    },
                );
                seen.insert(work.id);
            }
        }

        let mut ranked: Vec<CandidateWork> = recommended.into_values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(self.config.max_recommendations);
        ranked
    }

    fn is_eligible(
        &self,
        work: &PersonCreditEntry,
        media_type: MediaType,
        seen: &HashSet<u64>,
    ) -> bool {
        work.id != 0
            && work.media_type.as_deref() == Some(media_type.as_str())
            && work.poster_path.as_deref().is_some_and(|p| !p.is_empty())
            && !seen.contains(&work.id)
            && work.vote_count >= self.config.min_vote_count
            && work.vote_average >= self.config.min_vote_average
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{CastMember, Credits, PersonCredits},
        services::metadata::MockMetadataProvider,
    };

    fn saved(id: &str) -> SavedItem {
        SavedItem {
            id: id.to_string(),
            title: String::new(),
            poster_path: String::new(),
            media_type: MediaType::Movie,
        }
    }

    fn cast_member(id: u64, name: &str, popularity: f64) -> CastMember {
        CastMember {
            id,
            name: name.to_string(),
            popularity,
            character: None,
        }
    }

    fn movie_entry(id: u64, title: &str) -> PersonCreditEntry {
        PersonCreditEntry {
            id,
            title: Some(title.to_string()),
            media_type: Some("movie".to_string()),
            poster_path: Some(format!("/{}.jpg", id)),
            popularity: 40.0,
            vote_average: 7.5,
            vote_count: 2000,
            release_date: Some("2020-06-01".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn lead_billing_across_three_items_beats_ninth_billing_once() {
        let average = 20.0;
        let lead = actor_salience(0, 3, 20.0, average);
        let background = actor_salience(8, 1, 20.0, average);
        assert!(lead > background);
    }

    #[test]
    fn salience_sub_scores_are_clamped() {
        // Billing beyond the tenth slot contributes nothing
        let deep = actor_salience(25, 1, 10.0, 20.0);
        let tenth = actor_salience(10, 1, 10.0, 20.0);
        assert_eq!(deep, tenth);

        // Frequency benefit caps at three appearances
        let three = actor_salience(0, 3, 10.0, 20.0);
        let ten = actor_salience(0, 10, 10.0, 20.0);
        assert_eq!(three, ten);

        // Popularity ratio caps at 1.0
        let at_average = actor_salience(0, 1, 20.0, 20.0);
        let above_average = actor_salience(0, 1, 200.0, 20.0);
        assert_eq!(at_average, above_average);
    }

    #[test]
    fn recent_release_earns_the_bonus() {
        let current_year = 2026;
        let mut work = movie_entry(1, "Recent");
        work.release_date = Some("2020-01-01".to_string());
        let recent = candidate_score(&work, 0.8, 0, current_year, 15);

        work.release_date = Some("1990-01-01".to_string());
        let old = candidate_score(&work, 0.8, 0, current_year, 15);

        assert!((recent - old - RECENT_BONUS).abs() < 1e-9);
    }

    #[test]
    fn missing_release_date_gets_no_bonus() {
        let mut work = movie_entry(1, "Undated");
        work.release_date = None;
        let undated = candidate_score(&work, 0.8, 0, 2026, 15);

        work.release_date = Some("2020-01-01".to_string());
        let dated = candidate_score(&work, 0.8, 0, 2026, 15);

        assert!((dated - undated - RECENT_BONUS).abs() < 1e-9);
    }

    #[test]
    fn score_ordering_breaks_ties_by_id() {
        assert_eq!(by_score_desc(0.5, 2, 0.5, 1), Ordering::Greater);
        assert_eq!(by_score_desc(0.5, 1, 0.5, 2), Ordering::Less);
        assert_eq!(by_score_desc(0.9, 7, 0.5, 1), Ordering::Less);
    }

    #[tokio::test]
    async fn empty_input_never_touches_the_provider() {
        // No expectations set: any provider call would panic the test
        let provider = Arc::new(MockMetadataProvider::new());
        let recommender = Recommender::new(provider);

        let response = recommender.recommend(&[], MediaType::Movie).await;
        assert!(response.recommendations.is_empty());
        assert!(response.debug.is_none());

        let response = recommender
            .recommend(&[saved("abc"), saved("0")], MediaType::Movie)
            .await;
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn pipeline_excludes_saved_items_and_dedupes() {
        let mut provider = MockMetadataProvider::new();

        provider.expect_credits().returning(|_, _| {
            Ok(Some(Credits {
                id: None,
                cast: vec![
                    cast_member(100, "Lead Actor", 30.0),
                    cast_member(200, "Second Actor", 20.0),
                ],
            }))
        });

        provider.expect_person_credits().returning(|person_id| {
            let cast = match person_id {
                100 => vec![
                    // Already saved by the user, must never be recommended
                    movie_entry(1, "Saved Movie"),
                    movie_entry(50, "Shared Work"),
                    movie_entry(51, "Lead Only"),
                ],
                200 => vec![
                    // Duplicate of actor 100's claim, must be dropped
                    movie_entry(50, "Shared Work"),
                    movie_entry(60, "Second Only"),
                ],
                _ => vec![],
            };
            Ok(Some(PersonCredits { id: None, cast }))
        });

        let recommender = Recommender::new(Arc::new(provider));
        let response = recommender.recommend(&[saved("1")], MediaType::Movie).await;

        let ids: Vec<&str> = response
            .recommendations
            .iter()
            .map(|w| w.id.as_str())
            .collect();

        assert!(!ids.contains(&"1"), "saved item leaked into output");
        assert_eq!(ids.iter().filter(|id| **id == "50").count(), 1);

        // First actor by salience claimed the shared work
        let shared = response
            .recommendations
            .iter()
            .find(|w| w.id == "50")
            .unwrap();
        assert_eq!(shared.actor_name, "Lead Actor");

        // Ranked descending by score
        let scores: Vec<f64> = response.recommendations.iter().map(|w| w.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(scores, sorted);
    }

    #[tokio::test]
    async fn failed_item_fetch_is_skipped_not_fatal() {
        let mut provider = MockMetadataProvider::new();

        provider.expect_credits().returning(|_, item_id| {
            if item_id == 2 {
                Err(AppError::ExternalApi("simulated timeout".to_string()))
            } else {
                Ok(Some(Credits {
                    id: None,
                    cast: vec![cast_member(100, "Lead Actor", 30.0)],
                }))
            }
        });

        provider.expect_person_credits().returning(|_| {
            Ok(Some(PersonCredits {
                id: None,
                cast: vec![movie_entry(70, "From Healthy Item")],
            }))
        });

        let recommender = Recommender::new(Arc::new(provider));
        let response = recommender
            .recommend(&[saved("1"), saved("2")], MediaType::Movie)
            .await;

        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.recommendations[0].id, "70");
    }

    #[tokio::test]
    async fn failed_actor_fetch_skips_only_that_actor() {
        let mut provider = MockMetadataProvider::new();

        provider.expect_credits().returning(|_, _| {
            Ok(Some(Credits {
                id: None,
                cast: vec![
                    cast_member(100, "Lead Actor", 30.0),
                    cast_member(200, "Second Actor", 20.0),
                ],
            }))
        });

        provider.expect_person_credits().returning(|person_id| {
            if person_id == 100 {
                Err(AppError::ExternalApi("simulated failure".to_string()))
            } else {
                Ok(Some(PersonCredits {
                    id: None,
                    cast: vec![movie_entry(80, "Second Actor Work")],
                }))
            }
        });

        let recommender = Recommender::new(Arc::new(provider));
        let response = recommender.recommend(&[saved("1")], MediaType::Movie).await;

        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.recommendations[0].actor_name, "Second Actor");
    }

    #[tokio::test]
    async fn ineligible_works_are_filtered_out() {
        let mut provider = MockMetadataProvider::new();

        provider.expect_credits().returning(|_, _| {
            Ok(Some(Credits {
                id: None,
                cast: vec![cast_member(100, "Lead Actor", 30.0)],
            }))
        });

        provider.expect_person_credits().returning(|_| {
            let mut low_votes = movie_entry(90, "Low Votes");
            low_votes.vote_count = 10;

            let mut low_average = movie_entry(91, "Low Average");
            low_average.vote_average = 4.0;

            let mut wrong_type = movie_entry(92, "TV Show");
            wrong_type.media_type = Some("tv".to_string());

            Ok(Some(PersonCredits {
                id: None,
                cast: vec![low_votes, low_average, wrong_type, movie_entry(93, "Keeper")],
            }))
        });

        let recommender = Recommender::new(Arc::new(provider));
        let response = recommender.recommend(&[saved("1")], MediaType::Movie).await;

        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.recommendations[0].id, "93");
    }

    #[tokio::test]
    async fn caps_bound_the_output_and_per_actor_contribution() {
        let mut provider = MockMetadataProvider::new();

        provider.expect_credits().returning(|_, _| {
            Ok(Some(Credits {
                id: None,
                cast: vec![
                    cast_member(100, "Lead Actor", 30.0),
                    cast_member(200, "Second Actor", 20.0),
                ],
            }))
        });

        provider.expect_person_credits().returning(|person_id| {
            let base = person_id * 10;
            let cast = (0..6).map(|i| movie_entry(base + i, "Filler")).collect();
            Ok(Some(PersonCredits { id: None, cast }))
        });

        let config = RecommendConfig {
            max_recommendations: 3,
            max_works_per_actor: 2,
            ..RecommendConfig::default()
        };
        let recommender = Recommender::with_config(Arc::new(provider), config);
        let response = recommender.recommend(&[saved("1")], MediaType::Movie).await;

        assert_eq!(response.recommendations.len(), 3);
        let from_lead = response
            .recommendations
            .iter()
            .filter(|w| w.actor_name == "Lead Actor")
            .count();
        assert_eq!(from_lead, 2);
    }

    #[tokio::test]
    async fn debug_summary_reports_one_based_billing() {
        let mut provider = MockMetadataProvider::new();

        provider.expect_credits().returning(|_, _| {
            Ok(Some(Credits {
                id: None,
                cast: vec![cast_member(100, "Lead Actor", 30.0)],
            }))
        });
        provider
            .expect_person_credits()
            .returning(|_| Ok(Some(PersonCredits::default())));

        let recommender = Recommender::new(Arc::new(provider));
        let response = recommender.recommend(&[saved("1")], MediaType::Movie).await;

        let debug = response.debug.unwrap();
        assert_eq!(debug.processed_actors.len(), 1);
        assert_eq!(debug.processed_actors[0].name, "Lead Actor");
        assert_eq!(debug.processed_actors[0].best_billing, 1);
        assert_eq!(debug.processed_actors[0].appearances, 1);
    }
}
