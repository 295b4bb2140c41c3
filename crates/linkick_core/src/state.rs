use crate::store::LinkStore;
use crate::view_model::SessionView;

/// Monotonically increasing tag for one connect attempt. Messages carrying
/// a stale tag are rejected by `update`, so callbacks from a superseded
/// session can never touch the current store.
pub type SessionId = u64;

/// Internal chat room handle, distinct from the human-readable slug.
pub type RoomId = String;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Resolve -> backfill -> subscribe runs while in this phase.
    /// `room` is filled in once the resolver answers.
    Connecting {
        slug: String,
        room: Option<RoomId>,
    },
    Live {
        slug: String,
        room: RoomId,
    },
    /// Terminal until the next connect request.
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    session: SessionId,
    phase: SessionPhase,
    store: LinkStore,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut LinkStore {
        &mut self.store
    }

    /// Begin a fresh connect attempt: new session tag, empty store.
    pub(crate) fn begin_connect(&mut self, slug: String) -> SessionId {
        self.session += 1;
        self.store = LinkStore::new();
        self.phase = SessionPhase::Connecting { slug, room: None };
        self.session
    }

    pub(crate) fn set_room(&mut self, room_id: RoomId) {
        if let SessionPhase::Connecting { room, .. } = &mut self.phase {
            *room = Some(room_id);
        }
    }

    pub(crate) fn resolved_room(&self) -> Option<&RoomId> {
        match &self.phase {
            SessionPhase::Connecting { room, .. } => room.as_ref(),
            SessionPhase::Live { room, .. } => Some(room),
            _ => None,
        }
    }

    pub(crate) fn go_live(&mut self) {
        if let SessionPhase::Connecting {
            slug,
            room: Some(room),
        } = &self.phase
        {
            let live = SessionPhase::Live {
                slug: slug.clone(),
                room: room.clone(),
            };
            self.phase = live;
        }
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = SessionPhase::Error { message };
    }

    /// End the session: bump the tag so in-flight callbacks die, drop the
    /// collection (records never outlive their session), return to idle.
    pub(crate) fn end_session(&mut self) {
        self.session += 1;
        self.store = LinkStore::new();
        self.phase = SessionPhase::Idle;
    }

    /// True while a subscription may exist that a new session must tear down.
    pub(crate) fn is_engaged(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Connecting { .. } | SessionPhase::Live { .. }
        )
    }

    pub fn view(&self) -> SessionView {
        SessionView::of(self)
    }
}
