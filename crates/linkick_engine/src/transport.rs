use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use linkick_core::{ChatMessage, RoomId};

use crate::history::{HistorySource, BACKFILL_WINDOW_MINUTES};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("subscribe failed for room {room}: {message}")]
    Subscribe { room: RoomId, message: String },
}

/// Live chat capability.
///
/// One subscription per call; the feed pushes message events into the given
/// channel until the returned [`Subscription`] is cancelled. Implementations
/// must swallow malformed upstream events (drop the event, keep the feed).
#[async_trait]
pub trait LiveFeed: Send + Sync {
    async fn subscribe(
        &self,
        room: &RoomId,
        events: mpsc::Sender<ChatMessage>,
    ) -> Result<Subscription, FeedError>;
}

/// Handle for one live subscription.
///
/// `cancel` is idempotent and safe to call from anywhere; the feed task
/// observes the token, stops, and drops its sender. The hard no-stale-events
/// guarantee sits one level up: the session driver tags every forwarded
/// event with its session id and the state machine rejects mismatches.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Live feed that polls the recent-messages endpoint.
///
/// The hosted pub/sub transport is a capability this crate does not
/// reimplement; polling the same API the backfill uses gives a live feed
/// with nothing but the HTTP stack. Only messages newer than the last
/// forwarded timestamp go out, so the session's URL dedup is the sole
/// consumer of the overlap with backfill.
pub struct PollingFeed {
    source: Arc<dyn HistorySource>,
    interval: Duration,
}

impl PollingFeed {
    pub fn new(source: Arc<dyn HistorySource>, interval: Duration) -> Self {
        Self { source, interval }
    }
}

#[async_trait]
impl LiveFeed for PollingFeed {
    async fn subscribe(
        &self,
        room: &RoomId,
        events: mpsc::Sender<ChatMessage>,
    ) -> Result<Subscription, FeedError> {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let source = Arc::clone(&self.source);
        let room = room.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            // Anything older than the backfill window is history's business,
            // not the live feed's.
            let mut horizon = Utc::now() - chrono::Duration::minutes(BACKFILL_WINDOW_MINUTES);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                let page = match source.recent_messages(&room).await {
                    Ok(page) => page,
                    Err(err) => {
                        // One failed poll drops nothing permanently; the
                        // next tick retries.
                        log::warn!("live poll failed for room {room}: {err}");
                        continue;
                    }
                };

                let mut fresh: Vec<_> = page
                    .into_iter()
                    .filter(|message| message.created_at > horizon)
                    .collect();
                fresh.reverse();

                for message in fresh {
                    horizon = horizon.max(message.created_at);
                    let event = ChatMessage::new(message.content, message.sender);
                    if events.send(event).await.is_err() {
                        // Receiver gone: the session was torn down.
                        return;
                    }
                }
            }
        });

        Ok(Subscription::new(token))
    }
}
