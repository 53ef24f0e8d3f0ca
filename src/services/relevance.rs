//! Search relevance scoring for catalog search results.
//!
//! Independent of the recommendation pipeline: a small lexical similarity
//! between a work's display title and the search query, used only to order
//! search pages. No cap is applied.

use std::cmp::Ordering;

use crate::models::TmdbWork;

/// Similarity of two strings in [0, 1].
///
/// Exact lowercase match scores 1.0 and substring containment in either
/// direction 0.8; otherwise a weighted blend of word overlap (0.6) and
/// position-wise character matches (0.4), both measured against the longer
/// of the two strings.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let s1 = a.to_lowercase();
    let s2 = b.to_lowercase();

    if s1 == s2 {
        return 1.0;
    }

    if s1.contains(&s2) || s2.contains(&s1) {
        return 0.8;
    }

    let words1: Vec<&str> = s1.split(' ').collect();
    let words2: Vec<&str> = s2.split(' ').collect();
    let common_words = words1.iter().filter(|word| words2.contains(word)).count();
    let word_score = common_words as f64 / words1.len().max(words2.len()) as f64;

    let chars1: Vec<char> = s1.chars().collect();
    let chars2: Vec<char> = s2.chars().collect();
    let char_matches = chars1
        .iter()
        .zip(chars2.iter())
        .filter(|(c1, c2)| c1 == c2)
        .count();
    let char_score = char_matches as f64 / chars1.len().max(chars2.len()) as f64;

    word_score * 0.6 + char_score * 0.4
}

/// Orders search results descending by similarity of their display title to
/// the query, ties broken by work id for a deterministic page.
pub fn sort_by_relevance(results: &mut [TmdbWork], query: &str) {
    let query = query.to_lowercase();
    results.sort_by(|a, b| {
        let score_a = calculate_similarity(a.display_title().unwrap_or_default(), &query);
        let score_b = calculate_similarity(b.display_title().unwrap_or_default(), &query);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(id: u64, title: &str) -> TmdbWork {
        TmdbWork {
            id,
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn exact_match_scores_one() {
        assert_eq!(calculate_similarity("dune", "dune"), 1.0);
        assert_eq!(calculate_similarity("Dune", "dune"), 1.0);
    }

    #[test]
    fn containment_scores_point_eight() {
        assert_eq!(calculate_similarity("dune", "dune part two"), 0.8);
        assert_eq!(calculate_similarity("dune part two", "dune"), 0.8);
    }

    #[test]
    fn disjoint_strings_score_below_containment() {
        assert!(calculate_similarity("abc", "xyz") < 0.8);
        assert_eq!(calculate_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn shared_words_beat_unrelated_titles() {
        let shared = calculate_similarity("the dark knight", "dark knight rises");
        let unrelated = calculate_similarity("the dark knight", "finding nemo");
        assert!(shared > unrelated);
    }

    #[test]
    fn results_sort_most_relevant_first() {
        let mut results = vec![
            work(3, "Finding Nemo"),
            work(1, "Dune"),
            work(2, "Dune: Part Two"),
        ];

        sort_by_relevance(&mut results, "dune");

        assert_eq!(results[0].id, 1);
        assert_eq!(results[1].id, 2);
        assert_eq!(results[2].id, 3);
    }

    #[test]
    fn equal_scores_fall_back_to_id_order() {
        let mut results = vec![work(9, "zzz"), work(4, "zzz")];
        sort_by_relevance(&mut results, "zzz");
        assert_eq!(results[0].id, 4);
    }
}
