//! Ranking policies for collected matches.

use serde::{Deserialize, Serialize};

use crate::types::MatchResult;

/// How collected matches are ordered before truncation.
///
/// Both policies sort descending with a stable sort, so records with equal
/// keys keep the order in which the scan first saw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Records with an accepted answer first, then by score, then by
    /// favorite count.
    #[default]
    AcceptedFirst,

    /// By score alone.
    ScoreOnly,
}

/// Stable-sort `results` in descending rank order under `policy`.
pub fn rank(results: &mut [MatchResult], policy: RankingPolicy) {
    match policy {
        RankingPolicy::AcceptedFirst => {
            results.sort_by(|a, b| accepted_first_key(b).cmp(&accepted_first_key(a)));
        }
        RankingPolicy::ScoreOnly => {
            results.sort_by(|a, b| b.score.cmp(&a.score));
        }
    }
}

fn accepted_first_key(result: &MatchResult) -> (bool, i64, i64) {
    (
        result.accepted_answer_id.is_some(),
        result.score,
        result.favorite_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(question: &str, score: i64, favorites: i64, accepted: Option<u64>) -> MatchResult {
        MatchResult {
            question: question.to_string(),
            answer: String::new(),
            tags: Vec::new(),
            score,
            favorite_count: favorites,
            accepted_answer_id: accepted,
        }
    }

    fn questions(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.question.as_str()).collect()
    }

    #[test]
    fn test_accepted_first_ordering() {
        let mut results = vec![
            result("high-score", 50, 0, None),
            result("accepted-low", 1, 0, Some(42)),
            result("accepted-high", 10, 0, Some(7)),
        ];

        rank(&mut results, RankingPolicy::AcceptedFirst);

        assert_eq!(
            questions(&results),
            vec!["accepted-high", "accepted-low", "high-score"],
            "any accepted record outranks any unaccepted one"
        );
    }

    #[test]
    fn test_accepted_first_breaks_ties_by_favorites() {
        let mut results = vec![
            result("few-favs", 5, 1, Some(1)),
            result("many-favs", 5, 9, Some(2)),
        ];

        rank(&mut results, RankingPolicy::AcceptedFirst);

        assert_eq!(questions(&results), vec!["many-favs", "few-favs"]);
    }

    #[test]
    fn test_score_only_ignores_acceptance() {
        let mut results = vec![
            result("accepted-low", 1, 100, Some(42)),
            result("plain-high", 50, 0, None),
        ];

        rank(&mut results, RankingPolicy::ScoreOnly);

        assert_eq!(questions(&results), vec!["plain-high", "accepted-low"]);
    }

    #[test]
    fn test_equal_keys_keep_scan_order() {
        let mut results = vec![
            result("first", 5, 2, None),
            result("second", 5, 2, None),
            result("third", 5, 2, None),
        ];

        rank(&mut results, RankingPolicy::AcceptedFirst);
        assert_eq!(questions(&results), vec!["first", "second", "third"]);

        rank(&mut results, RankingPolicy::ScoreOnly);
        assert_eq!(questions(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_negative_scores_sort_below_zero() {
        let mut results = vec![
            result("downvoted", -4, 0, None),
            result("neutral", 0, 0, None),
        ];

        rank(&mut results, RankingPolicy::ScoreOnly);
        assert_eq!(questions(&results), vec!["neutral", "downvoted"]);
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&RankingPolicy::AcceptedFirst).unwrap(),
            "\"accepted_first\""
        );
        let policy: RankingPolicy = serde_json::from_str("\"score_only\"").unwrap();
        assert_eq!(policy, RankingPolicy::ScoreOnly);
    }
}
