use crate::category::categorize;
use crate::message::{parse_message, ChatMessage};
use crate::state::{SessionPhase, SessionState};
use crate::store::LinkRecord;
use crate::{Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages tagged with a session id other than the current one are dropped
/// without touching state; that is the whole stale-callback defence.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConnectRequested { slug } => {
            let mut effects = Vec::new();
            if state.is_engaged() {
                // At most one live subscription at any instant: the old
                // session is torn down before the new one starts.
                effects.push(Effect::Unsubscribe {
                    session: state.session(),
                });
            }
            let session = state.begin_connect(slug.clone());
            effects.push(Effect::ResolveChannel { session, slug });
            effects
        }
        Msg::ChannelResolved { session, room } => {
            if session != state.session() {
                return (state, Vec::new());
            }
            if matches!(state.phase(), SessionPhase::Connecting { .. }) {
                state.set_room(room.clone());
                vec![Effect::FetchHistory { session, room }]
            } else {
                Vec::new()
            }
        }
        Msg::ResolveFailed { session, message } => {
            if session != state.session() {
                return (state, Vec::new());
            }
            state.fail(message);
            Vec::new()
        }
        Msg::HistoryMessage { session, message } => {
            if session != state.session() {
                return (state, Vec::new());
            }
            ingest(&mut state, &message)
        }
        Msg::HistoryDrained { session } => {
            if session != state.session() {
                return (state, Vec::new());
            }
            // Backfill is fully drained before the subscription opens; this
            // is what keeps chronological history below live arrivals.
            match state.resolved_room() {
                Some(room) => vec![Effect::Subscribe {
                    session,
                    room: room.clone(),
                }],
                None => Vec::new(),
            }
        }
        Msg::Subscribed { session } => {
            if session != state.session() {
                return (state, Vec::new());
            }
            state.go_live();
            Vec::new()
        }
        Msg::LiveMessage { session, message } => {
            if session != state.session() {
                return (state, Vec::new());
            }
            ingest(&mut state, &message)
        }
        Msg::MarkVisited { url } => {
            state.store_mut().mark_visited(&url);
            Vec::new()
        }
        Msg::MarkVisitedBatch { urls } => {
            state.store_mut().mark_visited_batch(&urls);
            Vec::new()
        }
        Msg::StopRequested => {
            if state.phase() == &SessionPhase::Idle {
                return (state, Vec::new());
            }
            let effects = vec![Effect::Unsubscribe {
                session: state.session(),
            }];
            state.end_session();
            effects
        }
    };

    (state, effects)
}

/// Run one message through parse -> classify -> insert. Every admitted
/// record becomes a `LinkAdmitted` effect, in insertion order.
fn ingest(state: &mut SessionState, message: &ChatMessage) -> Vec<Effect> {
    let mut effects = Vec::new();
    for parsed in parse_message(message) {
        let category = categorize(&parsed.url);
        let record = LinkRecord::from_parsed(parsed, category);
        if state.store_mut().insert(record.clone()) {
            effects.push(Effect::LinkAdmitted { record });
        }
    }
    effects
}
