use std::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// One ranked hit: how often the query matched inside a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "where")]
    pub location: String,
    pub count: usize,
    /// `count` divided by the location's total word count.
    pub score: f64,
}

impl SearchResult {
    pub fn new(location: String) -> Self {
        SearchResult {
            location,
            count: 0,
            score: 0.0,
        }
    }

    pub(crate) fn update(&mut self, matches: usize, total: usize) {
        self.count += matches;
        self.score = self.count as f64 / total as f64;
    }
}

// Ranking order: score descending, count descending, location ascending.
impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchResult {}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| self.location.cmp(&other.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(location: &str, count: usize, score: f64) -> SearchResult {
        SearchResult {
            location: location.to_string(),
            count,
            score,
        }
    }

    #[test]
    fn ranks_by_score_then_count_then_location() {
        let mut results = vec![
            result("b.txt", 2, 0.5),
            result("a.txt", 1, 0.5),
            result("c.txt", 1, 0.75),
            result("a.txt", 2, 0.5),
        ];
        results.sort();

        let order: Vec<_> = results.iter().map(|r| (r.location.as_str(), r.count)).collect();
        assert_eq!(order, vec![("c.txt", 1), ("a.txt", 2), ("b.txt", 2), ("a.txt", 1)]);
    }

    #[test]
    fn distinct_locations_never_compare_equal() {
        let a = result("a.txt", 3, 0.25);
        let b = result("b.txt", 3, 0.25);
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_with_where_key() {
        let json = serde_json::to_value(result("a.txt", 2, 0.5)).unwrap();
        assert_eq!(json["where"], "a.txt");
        assert_eq!(json["count"], 2);
        assert_eq!(json["score"], 0.5);
    }
}
