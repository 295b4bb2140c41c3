//! LinKick CLI: catch links shared in a Kick channel's live chat.
//!
//! Connects to the channel named on the command line, replays the recent
//! history, then prints every new link as it is admitted until Ctrl-C.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Local;
use log::info;

use chat_logging::LogDestination;
use linkick_core::LinkRecord;
use linkick_engine::{
    ApiSettings, ChannelResolver, EngineConfig, KickDirectory, KickHistory, PollingFeed,
    SessionEvent, SessionHandle,
};

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    chat_logging::initialize(LogDestination::File);

    let slug = match env::args().nth(1) {
        Some(slug) => slug,
        None => bail!("usage: linkick <channel-slug>"),
    };

    let settings = ApiSettings::default();
    let history = Arc::new(KickHistory::new(settings.clone()));
    let config = EngineConfig {
        resolver: ChannelResolver::new(Arc::new(KickDirectory::new(settings))),
        history: history.clone(),
        feed: Arc::new(PollingFeed::new(history, POLL_INTERVAL)),
    };

    let (handle, mut events) = SessionHandle::spawn(config);
    info!("connecting to channel {slug}");
    handle.connect(&slug).await;
    println!("Connecting to {slug}, press Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(SessionEvent::LinkFound(record)) => print_link(&record),
                Some(SessionEvent::ConnectFailed { message }) => bail!(message),
                None => break,
            },
        }
    }

    // Snapshot before stop: stopping ends the session and its collection.
    let view = handle.view();
    println!();
    println!("{}", view.summary);
    println!(
        "{} links total, top category {}",
        view.stats.total_links,
        view.top_category_label()
    );
    println!(
        "{} active, {} archived",
        view.active().count(),
        view.archived().count()
    );

    handle.stop().await;
    Ok(())
}

fn print_link(record: &LinkRecord) {
    println!(
        "{} [{}] {} (from {}) {}",
        Local::now().format("%H:%M:%S"),
        record.category,
        record.url,
        record.sender,
        record.description
    );
}
