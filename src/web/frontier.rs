use std::collections::HashSet;
use parking_lot::Mutex;
use url::Url;

/// Outcome of offering a URL to the [`Frontier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Duplicate,
    /// The frontier already holds `limit` URLs.
    Full,
}

/// URLs admitted for crawling, shared by every crawl task.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: Mutex<HashSet<Url>>,
}

impl Frontier {
    pub fn new() -> Self {
        Frontier::default()
    }

    /// Inserts without checking any limit. Used for the seed.
    pub fn insert(&self, url: Url) -> bool {
        self.visited.lock().insert(url)
    }

    /// Size check, duplicate check and insertion as one critical section,
    /// so racing tasks can never push the frontier past `limit`.
    pub fn admit(&self, url: &Url, limit: usize) -> Admission {
        let mut visited = self.visited.lock();
        if visited.len() >= limit {
            Admission::Full
        } else if visited.contains(url) {
            Admission::Duplicate
        } else {
            visited.insert(url.clone());
            Admission::Admitted
        }
    }

    pub fn is_full(&self, limit: usize) -> bool {
        self.visited.lock().len() >= limit
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.visited.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.visited.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.lock().is_empty()
    }

    /// Admitted URLs in sorted order.
    pub fn urls(&self) -> Vec<Url> {
        let mut urls: Vec<Url> = self.visited.lock().iter().cloned().collect();
        urls.sort();
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn url(n: usize) -> Url {
        Url::parse(&format!("https://example.com/{}", n)).unwrap()
    }

    #[test]
    fn admits_until_limit() {
        let frontier = Frontier::new();
        assert_eq!(frontier.admit(&url(1), 2), Admission::Admitted);
        assert_eq!(frontier.admit(&url(1), 2), Admission::Duplicate);
        assert_eq!(frontier.admit(&url(2), 2), Admission::Admitted);
        assert_eq!(frontier.admit(&url(3), 2), Admission::Full);
        assert!(frontier.is_full(2));
    }

    #[test]
    fn seed_ignores_limit() {
        let frontier = Frontier::new();
        assert!(frontier.insert(url(0)));
        assert_eq!(frontier.admit(&url(1), 0), Admission::Full);
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn racing_producers_never_overshoot() {
        let frontier = Arc::new(Frontier::new());
        let limit = 37;
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let frontier = Arc::clone(&frontier);
                thread::spawn(move || {
                    (0..200)
                        .filter(|i| frontier.admit(&url(t * 1000 + i), limit) == Admission::Admitted)
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, limit);
        assert_eq!(frontier.len(), limit);
    }
}
