//! LinKick engine: IO collaborators and session effect execution.
mod api;
mod history;
mod opener;
mod resolver;
mod session;
mod transport;

pub use api::ApiSettings;
pub use history::{
    backfill, HistoryError, HistoryMessage, HistorySource, KickHistory, BACKFILL_WINDOW_MINUTES,
};
pub use opener::{
    open_batch, BatchOutcome, LinkOpener, BATCH_CONFIRM_THRESHOLD, BATCH_OPEN_STAGGER,
};
pub use resolver::{ChannelDirectory, ChannelResolver, KickDirectory, ResolveError};
pub use session::{EngineConfig, SessionEvent, SessionHandle};
pub use transport::{FeedError, LiveFeed, PollingFeed, Subscription};
