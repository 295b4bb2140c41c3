use crate::state::{RoomId, SessionId};
use crate::store::LinkRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up the chat room for a slug and report back.
    ResolveChannel { session: SessionId, slug: String },
    /// Fetch and replay recent history for the room.
    FetchHistory { session: SessionId, room: RoomId },
    /// Open the live subscription for the room.
    Subscribe { session: SessionId, room: RoomId },
    /// Tear down the subscription belonging to `session`, if any.
    Unsubscribe { session: SessionId },
    /// A new record was admitted to the store; notify listeners.
    LinkAdmitted { record: LinkRecord },
}
