//! LinKick core: pure chat-message-to-link pipeline and session state machine.
mod category;
mod effect;
mod message;
mod msg;
mod state;
mod store;
mod update;
mod view_model;

pub use category::{categorize, Category};
pub use effect::Effect;
pub use message::{parse_message, ChatMessage, ParsedLink, ANONYMOUS_SENDER};
pub use msg::Msg;
pub use state::{RoomId, SessionId, SessionPhase, SessionState};
pub use store::{LinkRecord, LinkStats, LinkStore};
pub use update::update;
pub use view_model::SessionView;
