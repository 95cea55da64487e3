//! The record eligibility predicate.
//!
//! A pure function deciding whether a record satisfies a query. Determinism
//! matters here: the memoization layer assumes that re-running a search over
//! the same records yields the same matches.

use crate::types::{Query, Record};

/// Decide whether `record` satisfies `query`.
///
/// Matching is case-insensitive throughout:
/// - the query text must appear as a substring of the question text, the
///   answer text, or any tag;
/// - a substring hit in a text field only counts if that field is non-empty,
///   and records with both text fields empty never match;
/// - when `tags_filter` is non-empty, the record's tags must intersect it;
/// - records scoring below `min_score` are rejected.
pub fn matches(record: &Record, query: &Query) -> bool {
    let needle = query.question.to_lowercase();
    let question_lc = record.question_text.to_lowercase();
    let answer_lc = record.answer_text.to_lowercase();

    let tag_match = record
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(&needle));
    let text_match = (!question_lc.is_empty() && question_lc.contains(&needle))
        || (!answer_lc.is_empty() && answer_lc.contains(&needle));

    if !(text_match || tag_match) {
        return false;
    }

    // A record with no text at all has nothing to return as an answer
    if question_lc.is_empty() && answer_lc.is_empty() {
        return false;
    }

    if !query.tags_filter.is_empty() {
        let intersects = record.tags.iter().any(|tag| {
            query
                .tags_filter
                .iter()
                .any(|wanted| tag.eq_ignore_ascii_case(wanted))
        });
        if !intersects {
            return false;
        }
    }

    record.score >= query.min_score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, answer: &str, tags: &[&str]) -> Record {
        Record {
            question_text: question.to_string(),
            answer_text: answer.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Record::default()
        }
    }

    #[test]
    fn test_matches_question_text_case_insensitive() {
        let rec = record("How do I use Python decorators?", "Wrap the function.", &[]);
        assert!(matches(&rec, &Query::new("PYTHON")));
        assert!(matches(&rec, &Query::new("decorators")));
        assert!(!matches(&rec, &Query::new("kubernetes")));
    }

    #[test]
    fn test_matches_answer_text() {
        let rec = record("Deployment question", "Use kubectl apply.", &[]);
        assert!(matches(&rec, &Query::new("kubectl")));
    }

    #[test]
    fn test_matches_tag_substring() {
        let rec = record("Untitled", "Some answer", &["python-3.x"]);
        // The query is a substring of the tag, not an exact tag
        assert!(matches(&rec, &Query::new("python")));
    }

    #[test]
    fn test_tag_match_requires_some_text() {
        let rec = record("", "", &["python"]);
        assert!(
            !matches(&rec, &Query::new("python")),
            "a record with no text cannot answer anything"
        );
    }

    #[test]
    fn test_empty_text_field_does_not_count() {
        let rec = record("", "kubernetes rollout guide", &[]);
        assert!(matches(&rec, &Query::new("kubernetes")));
        let rec = record("kubernetes rollout guide", "", &[]);
        assert!(matches(&rec, &Query::new("kubernetes")));
    }

    #[test]
    fn test_tags_filter_requires_intersection() {
        let rec = record("Python question", "Answer", &["python", "django"]);

        let matching = Query::new("python").with_tags_filter(vec!["DJANGO".to_string()]);
        assert!(matches(&rec, &matching), "intersection is case-insensitive");

        let disjoint = Query::new("python").with_tags_filter(vec!["kubernetes".to_string()]);
        assert!(!matches(&rec, &disjoint));
    }

    #[test]
    fn test_empty_tags_filter_means_no_filtering() {
        let rec = record("Python question", "Answer", &[]);
        assert!(matches(&rec, &Query::new("python")));
    }

    #[test]
    fn test_adding_intersecting_tag_never_rejects() {
        // Monotonicity: widening the filter with a tag the record has cannot
        // turn an accepted record into a rejected one
        let rec = record("Python question", "Answer", &["python", "django"]);
        let base = Query::new("python").with_tags_filter(vec!["python".to_string()]);
        assert!(matches(&rec, &base));

        let widened = Query::new("python")
            .with_tags_filter(vec!["python".to_string(), "django".to_string()]);
        assert!(matches(&rec, &widened));
    }

    #[test]
    fn test_min_score_gate() {
        let mut rec = record("Python question", "Answer", &[]);
        rec.score = 5;

        assert!(matches(&rec, &Query::new("python").with_min_score(5)));
        assert!(!matches(&rec, &Query::new("python").with_min_score(6)));
        // Negative thresholds admit down-voted records
        rec.score = -2;
        assert!(matches(&rec, &Query::new("python").with_min_score(-5)));
    }

    #[test]
    fn test_predicate_is_deterministic() {
        let rec = record("Python question", "Answer", &["python"]);
        let query = Query::new("python");
        let first = matches(&rec, &query);
        for _ in 0..10 {
            assert_eq!(matches(&rec, &query), first);
        }
    }
}
