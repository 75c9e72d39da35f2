//! Integration tests for the one-shot helpers on `Redisk`.

mod common;

use common::{FIXTURE_NAME, fixture_content, fixture_gets, fixture_line, setup};

use redisk_io::{Redisk, RediskConfig};
use redisk_store::ListStore;
use redisk_store_memory::MemoryListStore;

#[tokio::test]
async fn test_foreach_yields_each_line() {
    let (redisk, _) = setup().await;

    let mut lines = Vec::new();
    redisk
        .foreach(FIXTURE_NAME, |line| lines.push(line))
        .await
        .unwrap();

    assert_eq!(lines, fixture_gets());
}

#[tokio::test]
async fn test_open_returns_stream() {
    let (redisk, store) = setup().await;

    let mut io = redisk.open("newlog");
    assert_eq!(io.name(), "newlog");
    assert_eq!(redisk.store().len(io.key()).await.unwrap(), 0);

    io.puts(&["created"]).await.unwrap();
    assert_eq!(store.len("redisk:list:newlog").await.unwrap(), 1);
}

#[tokio::test]
async fn test_open_with_returns_callback_value() {
    let (redisk, _) = setup().await;

    let returned = redisk
        .open_with("newlog", async |io| {
            assert_eq!(io.name(), "newlog");
            "returned"
        })
        .await;

    assert_eq!(returned, "returned");
}

#[tokio::test]
async fn test_open_with_uses_stream() {
    let (redisk, _) = setup().await;

    let first = redisk
        .open_with(FIXTURE_NAME, async |io| {
            io.write("from callback").await?;
            io.gets().await
        })
        .await
        .unwrap();

    assert_eq!(first.unwrap(), fixture_gets()[0]);
    assert_eq!(
        redisk.read(FIXTURE_NAME, None, Some(100)).await.unwrap().unwrap(),
        "from callback"
    );
}

#[tokio::test]
async fn test_read_whole_stream() {
    let (redisk, _) = setup().await;

    let content = redisk.read(FIXTURE_NAME, None, None).await.unwrap();

    assert_eq!(content.unwrap(), fixture_content());
}

#[tokio::test]
async fn test_read_length() {
    let (redisk, _) = setup().await;

    let content = redisk.read(FIXTURE_NAME, Some(12), None).await.unwrap();

    assert_eq!(content.unwrap(), fixture_content()[..12]);
}

#[tokio::test]
async fn test_read_length_from_offset() {
    let (redisk, _) = setup().await;

    let length = fixture_line(2).len() + 1 + fixture_line(3).len();
    let content = redisk
        .read(FIXTURE_NAME, Some(length), Some(2))
        .await
        .unwrap();

    assert_eq!(
        content.unwrap(),
        format!("{}\n{}", fixture_line(2), fixture_line(3))
    );
}

#[tokio::test]
async fn test_read_missing_stream() {
    let (redisk, _) = setup().await;

    assert_eq!(redisk.read("missing", None, None).await.unwrap().unwrap(), "");
    assert_eq!(redisk.read("missing", Some(5), None).await.unwrap(), None);
}

#[tokio::test]
async fn test_readlines() {
    let (redisk, _) = setup().await;

    assert_eq!(redisk.readlines(FIXTURE_NAME).await.unwrap(), fixture_gets());
}

#[tokio::test]
async fn test_configured_namespace() {
    let store = MemoryListStore::new();
    let config: RediskConfig = serde_json::from_str(r#"{"namespace": "app"}"#).unwrap();
    let redisk = Redisk::new(config.into_options(store.clone()));

    let mut io = redisk.open("production.log");
    io.puts(&["booted"]).await.unwrap();

    assert_eq!(store.len("app:list:production.log").await.unwrap(), 1);
    assert_eq!(store.len("redisk:list:production.log").await.unwrap(), 0);
}
