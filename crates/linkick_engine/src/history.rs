use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use thiserror::Error;

use linkick_core::{ChatMessage, RoomId};

use crate::api::ApiSettings;

/// Recency window for backfilled history, in minutes.
pub const BACKFILL_WINDOW_MINUTES: i64 = 30;

/// One historical chat message as the upstream API reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub sender: Option<String>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Request(String),
    #[error("unexpected history payload: {0}")]
    Malformed(String),
}

/// Recent-messages capability. Implementations return the upstream page
/// as-is: newest first, unfiltered.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn recent_messages(&self, room: &RoomId) -> Result<Vec<HistoryMessage>, HistoryError>;
}

/// History source backed by the upstream messages API.
#[derive(Debug, Clone)]
pub struct KickHistory {
    settings: ApiSettings,
}

impl KickHistory {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl HistorySource for KickHistory {
    async fn recent_messages(&self, room: &RoomId) -> Result<Vec<HistoryMessage>, HistoryError> {
        let client = self
            .settings
            .build_client()
            .map_err(|err| HistoryError::Request(err.to_string()))?;
        let url = format!("{}/api/v2/chatrooms/{}/messages", self.settings.base_url, room);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|err| HistoryError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::Request(format!("http status {status}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| HistoryError::Malformed(err.to_string()))?;

        parse_messages(&payload)
    }
}

/// Both shapes occur in the wild: `{"data": {"messages": [...]}}` and
/// `{"data": [...]}`.
fn parse_messages(payload: &Value) -> Result<Vec<HistoryMessage>, HistoryError> {
    let entries = payload
        .get("data")
        .map(|data| data.get("messages").unwrap_or(data))
        .and_then(Value::as_array)
        .ok_or_else(|| HistoryError::Malformed("no message list".to_string()))?;

    // An entry missing its timestamp or content is skipped; the rest of
    // the page still counts.
    Ok(entries.iter().filter_map(parse_entry).collect())
}

fn parse_entry(entry: &Value) -> Option<HistoryMessage> {
    let content = entry.get("content")?.as_str()?.to_string();
    let created_at = entry.get("created_at")?.as_str()?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .ok()?
        .with_timezone(&Utc);
    let sender = entry
        .get("sender")
        .and_then(|sender| sender.get("username"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(HistoryMessage {
        created_at,
        content,
        sender,
    })
}

/// Replay one page of recent history through `deliver`, oldest first.
///
/// Only messages inside the recency window pass; the boundary is inclusive,
/// a message created exactly at the cutoff still counts. The upstream page
/// is newest first, so it is reversed before delivery: each message is then
/// ingested as if it arrived live, which stacks prepends back up into
/// newest-first display order.
///
/// Backfill is best-effort. Any source failure degrades to an empty replay
/// and must never fail the surrounding connect.
pub async fn backfill(
    source: &dyn HistorySource,
    room: &RoomId,
    now: DateTime<Utc>,
    mut deliver: impl FnMut(ChatMessage),
) {
    let page = match source.recent_messages(room).await {
        Ok(page) => page,
        Err(err) => {
            log::warn!("history backfill unavailable for room {room}: {err}");
            return;
        }
    };

    let cutoff = now - Duration::minutes(BACKFILL_WINDOW_MINUTES);
    let mut recent: Vec<HistoryMessage> = page
        .into_iter()
        .filter(|message| message.created_at >= cutoff)
        .collect();
    recent.reverse();

    for message in recent {
        deliver(ChatMessage::new(message.content, message.sender));
    }
}
