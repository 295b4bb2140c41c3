use crate::message::ChatMessage;
use crate::state::{RoomId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to connect to a channel slug. Supersedes any running session.
    ConnectRequested { slug: String },
    /// Resolver mapped the slug to its chat room.
    ChannelResolved { session: SessionId, room: RoomId },
    /// Resolver gave up; the message is what the user gets to see.
    ResolveFailed { session: SessionId, message: String },
    /// One backfilled message, already window-filtered, delivered oldest first.
    HistoryMessage {
        session: SessionId,
        message: ChatMessage,
    },
    /// Backfill finished (or was skipped after a failure); live subscribe may begin.
    HistoryDrained { session: SessionId },
    /// The live subscription is established.
    Subscribed { session: SessionId },
    /// One live chat message.
    LiveMessage {
        session: SessionId,
        message: ChatMessage,
    },
    /// User opened a single link.
    MarkVisited { url: String },
    /// User opened a batch of links.
    MarkVisitedBatch { urls: Vec<String> },
    /// User asked to stop listening. Safe to repeat, safe when idle.
    StopRequested,
}
