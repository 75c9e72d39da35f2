//! Shared fixtures for the stream integration tests.

#![allow(dead_code)]

use redisk_io::{Redisk, RediskOptions};
use redisk_store::ListStore;
use redisk_store_memory::MemoryListStore;

pub const FIXTURE_NAME: &str = "rails.log";
pub const FIXTURE_LINES: usize = 100;

/// Builds the text of fixture line `i`.
pub fn fixture_line(i: usize) -> String {
    format!("Processing LogController#show {i} (for 127.0.0.1)")
}

pub fn fixture_lines() -> Vec<String> {
    (0..FIXTURE_LINES).map(fixture_line).collect()
}

/// The fixture as a stream sees it: lines joined by `\n`.
pub fn fixture_content() -> String {
    fixture_lines().join("\n")
}

/// What repeated `gets` calls return for the fixture.
pub fn fixture_gets() -> Vec<String> {
    let mut lines = fixture_lines();
    for line in lines.iter_mut().take(FIXTURE_LINES - 1) {
        line.push('\n');
    }
    lines
}

/// Creates a handle over a fresh memory store holding the 100-line fixture.
pub async fn setup() -> (Redisk<MemoryListStore>, MemoryListStore) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let store = MemoryListStore::new();
    let redisk = Redisk::new(RediskOptions::new(store.clone()));
    let key = redisk.list_key(FIXTURE_NAME);

    for line in fixture_lines() {
        store.push_back(&key, line.into()).await.unwrap();
    }

    (redisk, store)
}
