//! Pending-URL scheduler.
//!
//! Pages whose URL mentions one of the priority keywords are always popped
//! before the others. The whole pending list is re-sorted before each pop and
//! the sort only distinguishes the two buckets, using an unstable sort: the
//! order inside a bucket is whatever the sort yields, not insertion order.
//! Re-sorting costs O(n log n) per pop.

/// Frontier of discovered but not yet fetched URLs
#[derive(Debug, Clone)]
pub struct Frontier {
    pending: Vec<String>,
    keywords: Vec<String>,
}

impl Frontier {
    /// Create an empty frontier ranking URLs by the given keywords
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pending: Vec::new(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Append a URL. Duplicates are accepted; the crawler filters them on pop.
    pub fn push(&mut self, url: String) {
        self.pending.push(url);
    }

    /// Reorder by priority bucket and take the front URL
    pub fn pop(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let keywords = &self.keywords;
        self.pending
            .sort_unstable_by_key(|url| !is_priority_url(url, keywords));
        Some(self.pending.remove(0))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a URL falls into the high-priority bucket
    pub fn is_priority(&self, url: &str) -> bool {
        is_priority_url(url, &self.keywords)
    }
}

fn is_priority_url(url: &str, keywords: &[String]) -> bool {
    let lower = url.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}
