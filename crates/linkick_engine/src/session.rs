use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};

use linkick_core::{
    update, Effect, LinkRecord, Msg, SessionId, SessionPhase, SessionState, SessionView,
};

use crate::history::{backfill, HistorySource};
use crate::resolver::ChannelResolver;
use crate::transport::{LiveFeed, Subscription};

/// Depth of the driver's message queue and of the event stream handed to
/// the presentation layer. A full queue applies backpressure to producers
/// instead of dropping events.
const QUEUE_DEPTH: usize = 256;

/// Collaborators the session driver needs to execute effects.
pub struct EngineConfig {
    pub resolver: ChannelResolver,
    pub history: Arc<dyn HistorySource>,
    pub feed: Arc<dyn LiveFeed>,
}

/// Notifications pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Emitted once per newly admitted record, in insertion order.
    LinkFound(LinkRecord),
    /// The connect attempt failed; the message names the channel.
    ConnectFailed { message: String },
}

/// Handle to one running session driver.
///
/// The driver task is the single owner of the session state: commands and
/// collaborator callbacks all land on one queue and are applied in arrival
/// order. Dropping the handle (after a stop) lets the driver wind down.
pub struct SessionHandle {
    msg_tx: mpsc::Sender<Msg>,
    view_rx: watch::Receiver<SessionView>,
}

impl SessionHandle {
    /// Spawn a driver on the current tokio runtime. The returned receiver
    /// delivers [`SessionEvent`]s; the handle answers queries and commands.
    pub fn spawn(config: EngineConfig) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (msg_tx, msg_rx) = mpsc::channel(QUEUE_DEPTH);
        let (event_tx, event_rx) = mpsc::channel(QUEUE_DEPTH);
        let (view_tx, view_rx) = watch::channel(SessionView::default());

        tokio::spawn(run_driver(config, msg_tx.clone(), msg_rx, event_tx, view_tx));

        (Self { msg_tx, view_rx }, event_rx)
    }

    /// Connect to a channel slug, superseding any running session.
    pub async fn connect(&self, slug: &str) {
        self.send(Msg::ConnectRequested {
            slug: slug.to_string(),
        })
        .await;
    }

    /// Stop listening. Safe when idle, safe to repeat.
    pub async fn stop(&self) {
        self.send(Msg::StopRequested).await;
    }

    pub async fn mark_visited(&self, url: &str) {
        self.send(Msg::MarkVisited {
            url: url.to_string(),
        })
        .await;
    }

    pub async fn mark_visited_batch(&self, urls: Vec<String>) {
        self.send(Msg::MarkVisitedBatch { urls }).await;
    }

    /// Latest complete snapshot. Never torn: the driver publishes a full
    /// view after each applied message.
    pub fn view(&self) -> SessionView {
        self.view_rx.borrow().clone()
    }

    /// Watch endpoint for callers that want change notifications.
    pub fn watch(&self) -> watch::Receiver<SessionView> {
        self.view_rx.clone()
    }

    async fn send(&self, msg: Msg) {
        // Err only when the driver is gone; nothing sensible to do then.
        let _ = self.msg_tx.send(msg).await;
    }
}

async fn run_driver(
    config: EngineConfig,
    msg_tx: mpsc::Sender<Msg>,
    mut msg_rx: mpsc::Receiver<Msg>,
    event_tx: mpsc::Sender<SessionEvent>,
    view_tx: watch::Sender<SessionView>,
) {
    let mut state = SessionState::new();
    let mut live: Option<(SessionId, Subscription)> = None;

    while let Some(msg) = msg_rx.recv().await {
        // Driver-internal follow-ups (like Subscribed) bypass the queue so
        // the driver can never deadlock on its own bounded channel.
        let mut pending = VecDeque::from([msg]);

        while let Some(msg) = pending.pop_front() {
            let was_error = matches!(state.phase(), SessionPhase::Error { .. });

            let (next, effects) = update(std::mem::take(&mut state), msg);
            state = next;

            for effect in effects {
                run_effect(
                    effect,
                    &config,
                    &msg_tx,
                    &event_tx,
                    &mut live,
                    &mut pending,
                )
                .await;
            }

            if !was_error {
                if let SessionPhase::Error { message } = state.phase() {
                    let _ = event_tx
                        .send(SessionEvent::ConnectFailed {
                            message: message.clone(),
                        })
                        .await;
                }
            }

            view_tx.send_replace(state.view());
        }
    }
}

async fn run_effect(
    effect: Effect,
    config: &EngineConfig,
    msg_tx: &mpsc::Sender<Msg>,
    event_tx: &mpsc::Sender<SessionEvent>,
    live: &mut Option<(SessionId, Subscription)>,
    pending: &mut VecDeque<Msg>,
) {
    match effect {
        Effect::ResolveChannel { session, slug } => {
            let resolver = config.resolver.clone();
            let msg_tx = msg_tx.clone();
            tokio::spawn(async move {
                let msg = match resolver.resolve(&slug).await {
                    Ok(room) => Msg::ChannelResolved { session, room },
                    Err(err) => Msg::ResolveFailed {
                        session,
                        message: err.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }
        Effect::FetchHistory { session, room } => {
            let history = Arc::clone(&config.history);
            let msg_tx = msg_tx.clone();
            tokio::spawn(async move {
                let mut replay = Vec::new();
                backfill(history.as_ref(), &room, Utc::now(), |message| {
                    replay.push(message);
                })
                .await;
                for message in replay {
                    if msg_tx
                        .send(Msg::HistoryMessage { session, message })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                let _ = msg_tx.send(Msg::HistoryDrained { session }).await;
            });
        }
        Effect::Subscribe { session, room } => {
            let (live_tx, mut live_rx) = mpsc::channel(QUEUE_DEPTH);
            match config.feed.subscribe(&room, live_tx).await {
                Ok(subscription) => {
                    *live = Some((session, subscription));

                    // Pump feed events into the driver queue, tagged with
                    // the session they belong to. After a supersede the pump
                    // keeps draining but every message it forwards is stale
                    // and gets dropped by the state machine.
                    let msg_tx = msg_tx.clone();
                    tokio::spawn(async move {
                        while let Some(message) = live_rx.recv().await {
                            if msg_tx
                                .send(Msg::LiveMessage { session, message })
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                    });

                    pending.push_back(Msg::Subscribed { session });
                }
                Err(err) => {
                    log::warn!("live subscribe failed: {err}");
                    pending.push_back(Msg::ResolveFailed {
                        session,
                        message: err.to_string(),
                    });
                }
            }
        }
        Effect::Unsubscribe { session } => {
            if let Some((live_session, subscription)) = live.take() {
                if live_session == session {
                    subscription.cancel();
                } else {
                    *live = Some((live_session, subscription));
                }
            }
        }
        Effect::LinkAdmitted { record } => {
            let _ = event_tx.send(SessionEvent::LinkFound(record)).await;
        }
    }
}
