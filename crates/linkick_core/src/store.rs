use std::sync::Arc;

use url::Url;

use crate::category::Category;
use crate::message::ParsedLink;

/// One classified link. Immutable after admission except for `visited`,
/// which only ever flips false -> true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Natural key; unique within a session's store.
    pub url: String,
    /// Host name of `url`; no page metadata is ever fetched.
    pub title: String,
    pub category: Category,
    pub sender: String,
    pub description: String,
    pub visited: bool,
}

impl LinkRecord {
    pub fn from_parsed(parsed: ParsedLink, category: Category) -> Self {
        let title = host_of(&parsed.url).unwrap_or_else(|| parsed.url.clone());
        Self {
            url: parsed.url,
            title,
            category,
            sender: parsed.sender,
            description: parsed.description,
            visited: false,
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.to_string())
}

/// Aggregates recomputed from the current collection on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkStats {
    /// Count of all records, visited or not.
    pub total_links: usize,
    /// Most frequent category among active (unvisited) records.
    /// `None` when there are no active records.
    pub top_category: Option<Category>,
}

impl LinkStats {
    fn compute(links: &[LinkRecord]) -> Self {
        // Counting preserves first-encounter order over the stored
        // (newest-first) sequence, so ties keep the earliest-seen category.
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for record in links.iter().filter(|record| !record.visited) {
            match counts.iter_mut().find(|(category, _)| *category == record.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.category, 1)),
            }
        }

        let mut top_category = None;
        let mut max_count = 0;
        for (category, count) in counts {
            if count > max_count {
                max_count = count;
                top_category = Some(category);
            }
        }

        LinkStats {
            total_links: links.len(),
            top_category,
        }
    }
}

/// Deduplicated, newest-first collection of classified links.
///
/// The record list lives behind an `Arc`: every mutation builds a
/// replacement vector and swaps the pointer, so a snapshot handed out
/// earlier is never torn by later mutations. Inserts rescan the whole
/// collection; O(n) per insert is deliberate, n is bounded by what a single
/// session's chat can produce.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkStore {
    links: Arc<Vec<LinkRecord>>,
    stats: LinkStats,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record unless its URL is already present.
    ///
    /// Returns `true` when the record was admitted. A duplicate URL leaves
    /// the store byte-for-byte untouched, no field is overwritten.
    pub fn insert(&mut self, record: LinkRecord) -> bool {
        if self.links.iter().any(|existing| existing.url == record.url) {
            return false;
        }

        let mut next = Vec::with_capacity(self.links.len() + 1);
        next.push(record);
        next.extend(self.links.iter().cloned());
        self.replace(next);
        true
    }

    /// Flip `visited` on the matching record. Unknown URLs are a no-op.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        let urls = [url.to_string()];
        self.mark_visited_batch(&urls) > 0
    }

    /// Flip `visited` on every matching record, recomputing stats once.
    /// Returns how many records actually changed.
    pub fn mark_visited_batch(&mut self, urls: &[String]) -> usize {
        let changed = self
            .links
            .iter()
            .filter(|record| !record.visited && urls.iter().any(|url| *url == record.url))
            .count();
        if changed == 0 {
            return 0;
        }

        let next = self
            .links
            .iter()
            .map(|record| {
                if urls.iter().any(|url| *url == record.url) {
                    LinkRecord {
                        visited: true,
                        ..record.clone()
                    }
                } else {
                    record.clone()
                }
            })
            .collect();
        self.replace(next);
        changed
    }

    fn replace(&mut self, next: Vec<LinkRecord>) {
        self.stats = LinkStats::compute(&next);
        self.links = Arc::new(next);
    }

    /// All records, newest first.
    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    /// Cheap shared snapshot of the current record list.
    pub(crate) fn snapshot_links(&self) -> Arc<Vec<LinkRecord>> {
        Arc::clone(&self.links)
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Records not yet visited, newest first.
    pub fn active(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(|record| !record.visited)
    }

    /// Visited records, newest first.
    pub fn archived(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(|record| record.visited)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
