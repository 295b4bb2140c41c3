use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use linkick_core::{categorize, LinkRecord, ParsedLink};
use linkick_engine::{open_batch, BatchOutcome, LinkOpener, BATCH_OPEN_STAGGER};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

fn record(url: &str) -> LinkRecord {
    LinkRecord::from_parsed(
        ParsedLink {
            url: url.to_string(),
            sender: "tester".to_string(),
            description: "Shared link".to_string(),
        },
        categorize(url),
    )
}

fn records(count: usize) -> Vec<LinkRecord> {
    (0..count)
        .map(|index| record(&format!("https://example.com/{index}")))
        .collect()
}

#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn small_batch_opens_without_confirmation_and_marks_visited() {
    init_logging();
    let opener = RecordingOpener::default();
    let visited: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let batch = records(5);
    let sink = visited.clone();
    let outcome = open_batch(
        &batch,
        &opener,
        |_| panic!("no gate below the threshold"),
        |urls| async move {
            sink.lock().unwrap().extend(urls);
        },
    )
    .await;

    assert_eq!(outcome, BatchOutcome::Opened(5));
    assert_eq!(opener.opened.lock().unwrap().len(), 5);
    assert_eq!(visited.lock().unwrap().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn large_batch_requires_the_gate() {
    init_logging();
    let opener = RecordingOpener::default();
    let confirmed_with = Arc::new(Mutex::new(None));

    let batch = records(6);
    let seen = confirmed_with.clone();
    let outcome = open_batch(
        &batch,
        &opener,
        move |count| {
            *seen.lock().unwrap() = Some(count);
            false
        },
        |_| async move { panic!("declined batches mark nothing") },
    )
    .await;

    assert_eq!(outcome, BatchOutcome::Declined);
    assert_eq!(*confirmed_with.lock().unwrap(), Some(6));
    assert!(opener.opened.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn confirmed_large_batch_opens_with_the_stagger() {
    init_logging();
    let opener = RecordingOpener::default();

    let batch = records(6);
    let started = tokio::time::Instant::now();
    let outcome = open_batch(&batch, &opener, |_| true, |_| async {}).await;

    assert_eq!(outcome, BatchOutcome::Opened(6));
    // Five gaps between six tabs.
    assert_eq!(started.elapsed(), BATCH_OPEN_STAGGER * 5);
    assert_eq!(
        *opener.opened.lock().unwrap(),
        (0..6)
            .map(|index| format!("https://example.com/{index}"))
            .collect::<Vec<_>>()
    );
}

#[tokio::test(start_paused = true)]
async fn empty_batch_is_a_noop() {
    init_logging();
    let opener = RecordingOpener::default();

    let outcome = open_batch(
        &[],
        &opener,
        |_| panic!("no gate for nothing"),
        |_| async move { panic!("nothing to mark") },
    )
    .await;

    assert_eq!(outcome, BatchOutcome::Opened(0));
    assert!(opener.opened.lock().unwrap().is_empty());
}
