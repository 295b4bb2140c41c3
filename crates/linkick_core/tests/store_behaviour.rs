use std::sync::Once;

use linkick_core::{categorize, Category, LinkRecord, LinkStore, ParsedLink};

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

#[test]
fn insert_is_idempotent_per_url() {
    init_logging();
    let mut store = LinkStore::new();
    assert!(store.insert(record("https://example.com/a")));

    // Same URL with different fields: the second insert must be a no-op,
    // nothing gets overwritten.
    let mut imposter = record("https://example.com/a");
    imposter.sender = "someone-else".to_string();
    imposter.description = "different text".to_string();
    assert!(!store.insert(imposter));

    assert_eq!(store.len(), 1);
    assert_eq!(store.links()[0].sender, "tester");
    assert_eq!(store.links()[0].description, "Shared link");
    assert_eq!(store.stats().total_links, 1);
}

#[test]
fn links_are_ordered_newest_first() {
    init_logging();
    let mut store = LinkStore::new();
    let urls = [
        "https://example.com/1",
        "https://example.com/2",
        "https://example.com/3",
    ];
    for url in urls {
        store.insert(record(url));
    }

    let stored: Vec<&str> = store.links().iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        stored,
        vec![
            "https://example.com/3",
            "https://example.com/2",
            "https://example.com/1",
        ]
    );
}

#[test]
fn active_and_archived_partition_the_collection() {
    init_logging();
    let mut store = LinkStore::new();
    store.insert(record("https://example.com/a"));
    store.insert(record("https://example.com/b"));
    store.insert(record("https://example.com/c"));
    store.mark_visited("https://example.com/b");

    let active: Vec<&str> = store.active().map(|r| r.url.as_str()).collect();
    let archived: Vec<&str> = store.archived().map(|r| r.url.as_str()).collect();

    assert_eq!(active, vec!["https://example.com/c", "https://example.com/a"]);
    assert_eq!(archived, vec!["https://example.com/b"]);
    assert_eq!(active.len() + archived.len(), store.len());
    assert!(active.iter().all(|url| !archived.contains(url)));
}

#[test]
fn visited_never_reverts() {
    init_logging();
    let mut store = LinkStore::new();
    store.insert(record("https://example.com/a"));
    assert!(store.mark_visited("https://example.com/a"));

    // Re-inserting the same URL and re-marking must not flip it back.
    store.insert(record("https://example.com/a"));
    store.insert(record("https://example.com/b"));
    store.mark_visited_batch(&["https://example.com/b".to_string()]);

    assert!(store
        .links()
        .iter()
        .find(|r| r.url == "https://example.com/a")
        .unwrap()
        .visited);
}

#[test]
fn marking_an_unknown_url_is_a_noop() {
    init_logging();
    let mut store = LinkStore::new();
    store.insert(record("https://example.com/a"));

    assert!(!store.mark_visited("https://example.com/nope"));
    assert_eq!(store.mark_visited_batch(&["https://example.com/nope".to_string()]), 0);
    assert_eq!(store.active().count(), 1);
}

#[test]
fn empty_store_has_no_top_category() {
    init_logging();
    let store = LinkStore::new();
    assert_eq!(store.stats().total_links, 0);
    assert_eq!(store.stats().top_category, None);
}

#[test]
fn top_category_counts_active_records_in_scan_order() {
    init_logging();
    let mut store = LinkStore::new();
    // Stored order is newest-first, so insert in reverse of the intended
    // scan order [Youtube, Dev, Youtube, Other].
    store.insert(record("https://example.com/plain"));
    store.insert(record("https://youtube.com/a"));
    store.insert(record("https://github.com/x"));
    store.insert(record("https://youtube.com/b"));

    assert_eq!(store.stats().total_links, 4);
    assert_eq!(store.stats().top_category, Some(Category::Youtube));
}

#[test]
fn top_category_tie_goes_to_first_encountered() {
    init_logging();
    let mut store = LinkStore::new();
    store.insert(record("https://github.com/x"));
    store.insert(record("https://youtube.com/a"));

    // One of each; the scan over the newest-first list meets Youtube first.
    assert_eq!(store.stats().top_category, Some(Category::Youtube));
}

#[test]
fn visiting_records_moves_the_top_category() {
    init_logging();
    let mut store = LinkStore::new();
    store.insert(record("https://github.com/x"));
    store.insert(record("https://youtube.com/a"));
    store.insert(record("https://youtube.com/b"));
    assert_eq!(store.stats().top_category, Some(Category::Youtube));

    store.mark_visited_batch(&[
        "https://youtube.com/a".to_string(),
        "https://youtube.com/b".to_string(),
    ]);

    // Stats are defined over active records only; total still counts all.
    assert_eq!(store.stats().top_category, Some(Category::Dev));
    assert_eq!(store.stats().total_links, 3);
}

#[test]
fn title_is_the_host_name() {
    init_logging();
    let rec = record("https://www.youtube.com/watch?v=abc");
    assert_eq!(rec.title, "www.youtube.com");

    // Unparseable host falls back to the raw URL.
    let rec = record("https://[oops");
    assert_eq!(rec.title, "https://[oops");
}
