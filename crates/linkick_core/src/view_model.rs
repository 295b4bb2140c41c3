use std::sync::Arc;

use crate::state::{SessionPhase, SessionState};
use crate::store::{LinkRecord, LinkStats};

/// Read-only snapshot of a session, safe to hand across tasks.
///
/// `links` shares the store's copy-on-write list: later store mutations
/// swap in a new list and never touch this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Human-readable session status line.
    pub summary: String,
    /// All records, newest first.
    pub links: Arc<Vec<LinkRecord>>,
    pub stats: LinkStats,
}

impl SessionView {
    pub(crate) fn of(state: &SessionState) -> Self {
        let summary = match state.phase() {
            SessionPhase::Idle => "Not connected".to_string(),
            SessionPhase::Connecting { slug, .. } => format!("Connecting to {slug}..."),
            SessionPhase::Live { slug, .. } => format!("Listening to {slug} live chat..."),
            SessionPhase::Error { message } => message.clone(),
        };
        Self {
            summary,
            links: state.store().snapshot_links(),
            stats: state.store().stats().clone(),
        }
    }

    /// Records not yet visited, newest first.
    pub fn active(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(|record| !record.visited)
    }

    /// Visited records, newest first.
    pub fn archived(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(|record| record.visited)
    }

    /// Top-category label with the empty-collection sentinel applied.
    pub fn top_category_label(&self) -> &'static str {
        self.stats
            .top_category
            .map(|category| category.label())
            .unwrap_or("NONE")
    }
}

impl Default for SessionView {
    fn default() -> Self {
        SessionState::default().view()
    }
}
