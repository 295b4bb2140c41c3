use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use linkick_core::RoomId;
use linkick_engine::{HistoryError, HistoryMessage, HistorySource, LiveFeed, PollingFeed};
use tokio::sync::mpsc;
use tokio::time::timeout;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

/// Mutable "current page" the feed polls against; newest first like the API.
#[derive(Default)]
struct Board {
    page: Mutex<Vec<HistoryMessage>>,
}

impl Board {
    fn post(&self, created_at: DateTime<Utc>, content: &str) {
        let mut page = self.page.lock().unwrap();
        page.insert(
            0,
            HistoryMessage {
                created_at,
                content: content.to_string(),
                sender: Some("x".to_string()),
            },
        );
    }
}

#[async_trait]
impl HistorySource for Board {
    async fn recent_messages(&self, _room: &RoomId) -> Result<Vec<HistoryMessage>, HistoryError> {
        Ok(self.page.lock().unwrap().clone())
    }
}

#[tokio::test]
async fn polling_feed_forwards_only_unseen_messages() {
    init_logging();
    let board = Arc::new(Board::default());
    board.post(Utc::now(), "https://example.com/a");

    let feed = PollingFeed::new(board.clone(), Duration::from_millis(10));
    let (tx, mut rx) = mpsc::channel(8);
    let subscription = feed
        .subscribe(&"123".to_string(), tx)
        .await
        .expect("subscribe");

    let first = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("poll delivers")
        .expect("channel open");
    assert_eq!(first.content, "https://example.com/a");

    // Nothing new on the board: further polls stay quiet.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(rx.try_recv().is_err());

    board.post(Utc::now() + chrono::Duration::seconds(1), "https://example.com/b");
    let second = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("poll delivers")
        .expect("channel open");
    assert_eq!(second.content, "https://example.com/b");

    subscription.cancel();
}

#[tokio::test]
async fn polling_feed_skips_messages_older_than_the_window() {
    init_logging();
    let board = Arc::new(Board::default());
    board.post(Utc::now() - chrono::Duration::hours(2), "stale backlog");
    board.post(Utc::now(), "https://example.com/fresh");

    let feed = PollingFeed::new(board.clone(), Duration::from_millis(10));
    let (tx, mut rx) = mpsc::channel(8);
    let subscription = feed
        .subscribe(&"123".to_string(), tx)
        .await
        .expect("subscribe");

    let first = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("poll delivers")
        .expect("channel open");
    assert_eq!(first.content, "https://example.com/fresh");

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(rx.try_recv().is_err());

    subscription.cancel();
}

#[tokio::test]
async fn cancel_stops_delivery_and_is_idempotent() {
    init_logging();
    let board = Arc::new(Board::default());

    let feed = PollingFeed::new(board.clone(), Duration::from_millis(10));
    let (tx, mut rx) = mpsc::channel(8);
    let subscription = feed
        .subscribe(&"123".to_string(), tx)
        .await
        .expect("subscribe");

    subscription.cancel();
    subscription.cancel();

    // Give the feed task time to observe the token and exit, then post.
    tokio::time::sleep(Duration::from_millis(50)).await;
    board.post(Utc::now(), "https://example.com/late");
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(rx.try_recv().is_err());
}
