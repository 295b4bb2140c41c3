use std::future::Future;
use std::time::Duration;

use linkick_core::LinkRecord;

/// Batches larger than this need the confirmation gate to pass.
pub const BATCH_CONFIRM_THRESHOLD: usize = 5;

/// Pause between opened links; keeps browser popup heuristics calm.
pub const BATCH_OPEN_STAGGER: Duration = Duration::from_millis(300);

/// Browser-tab capability. The engine decides when and in what rhythm;
/// what "opening" means belongs to the caller.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every link was opened and visit-marked.
    Opened(usize),
    /// The confirmation gate declined; nothing was opened or marked.
    Declined,
}

/// Open a batch of records with a fixed stagger between tabs.
///
/// Lists above [`BATCH_CONFIRM_THRESHOLD`] require `confirm(len)` to return
/// true. All opened links are then visit-marked as one batch through the
/// `visit` callback.
pub async fn open_batch<C, V, Fut>(
    records: &[LinkRecord],
    opener: &dyn LinkOpener,
    confirm: C,
    visit: V,
) -> BatchOutcome
where
    C: FnOnce(usize) -> bool,
    V: FnOnce(Vec<String>) -> Fut,
    Fut: Future<Output = ()>,
{
    if records.is_empty() {
        return BatchOutcome::Opened(0);
    }
    if records.len() > BATCH_CONFIRM_THRESHOLD && !confirm(records.len()) {
        return BatchOutcome::Declined;
    }

    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(BATCH_OPEN_STAGGER).await;
        }
        opener.open(&record.url);
    }

    visit(records.iter().map(|record| record.url.clone()).collect()).await;
    BatchOutcome::Opened(records.len())
}
