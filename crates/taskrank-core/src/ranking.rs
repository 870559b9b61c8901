//! Final ordering of scored results.

use std::cmp::Ordering;

use crate::scoring::ScoredResult;

/// Ordering used by [`rank`]: higher score first, then non-circular
/// before circular.
pub fn compare(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.circular.cmp(&b.circular))
}

/// Sort results in place, best first.
///
/// The sort is stable, so results equal in score and circularity keep
/// their input order.
pub fn rank(results: &mut [ScoredResult]) {
    results.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Components;
    use crate::task::{TaskKey, TaskRecord};

    fn result(id: &str, score: f64, circular: bool) -> ScoredResult {
        ScoredResult {
            id: TaskKey::ExplicitId(id.to_string()),
            title: id.to_string(),
            raw: TaskRecord::new(id).with_id(id),
            score,
            components: Components::default(),
            explanation: String::new(),
            circular,
        }
    }

    fn ids(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_descending_by_score() {
        let mut results = vec![result("low", 0.1, false), result("high", 0.9, false), result("mid", 0.5, false)];
        rank(&mut results);
        assert_eq!(ids(&results), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_non_circular_wins_ties() {
        let mut results = vec![result("loop", 0.4, true), result("plain", 0.4, false)];
        rank(&mut results);
        assert_eq!(ids(&results), vec!["plain", "loop"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let mut results = vec![
            result("first", 0.3, false),
            result("second", 0.3, false),
            result("third", 0.3, false),
        ];
        rank(&mut results);
        assert_eq!(ids(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_score_outranks_circularity() {
        let mut results = vec![result("plain", 0.2, false), result("loop", 0.3, true)];
        rank(&mut results);
        assert_eq!(ids(&results), vec!["loop", "plain"]);
    }
}
