use jiff::{SignedDuration, Timestamp};
use stubby_core::{NewLink, ShortCode};
use stubby_storage::{LinkStore, ReadLinkStore, SqliteLinkStore};

async fn store() -> SqliteLinkStore {
    SqliteLinkStore::in_memory().await.expect("open sqlite")
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

fn ts(micros: i64) -> Timestamp {
    Timestamp::from_microsecond(micros).unwrap()
}

fn link(url: &str, c: &str, valid_until: Option<Timestamp>) -> NewLink {
    NewLink {
        original_url: url.to_string(),
        short_code: code(c),
        created_at: ts(1_700_000_000_000_000),
        valid_until,
    }
}

#[tokio::test]
async fn insert_and_get_round_trips_fields() {
    let store = store().await;
    let until = ts(1_800_000_000_123_456);

    let id = store
        .insert_link(link("https://example.com", "abc", Some(until)))
        .await
        .unwrap();

    let got = store.get_link_by_id(id).await.unwrap().unwrap();
    assert_eq!(got.id, id);
    assert_eq!(got.original_url, "https://example.com");
    assert_eq!(got.short_code, code("abc"));
    assert_eq!(got.created_at, ts(1_700_000_000_000_000));
    assert_eq!(got.valid_until, Some(until));
}

#[tokio::test]
async fn missing_id_returns_none() {
    let store = store().await;
    assert!(store.get_link_by_id(7).await.unwrap().is_none());
}

#[tokio::test]
async fn migrate_is_idempotent() {
    let store = store().await;
    store.insert_link(link("https://example.com", "abc", None)).await.unwrap();

    store.migrate().await.unwrap();

    assert_eq!(store.list_links().await.unwrap().len(), 1);
}

#[tokio::test]
async fn latest_lookups_prefer_highest_id() {
    let store = store().await;

    store.insert_link(link("https://example.com", "abc", None)).await.unwrap();
    let newer = store.insert_link(link("https://example.com", "def", None)).await.unwrap();
    let same_code = store.insert_link(link("https://other.example", "abc", None)).await.unwrap();

    let by_url = store
        .find_latest_by_original_url("https://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.id, newer);
    assert_eq!(by_url.short_code, code("def"));

    let by_code = store.find_latest_by_code(&code("abc")).await.unwrap().unwrap();
    assert_eq!(by_code.id, same_code);

    assert!(store.find_latest_by_code(&code("zzz")).await.unwrap().is_none());
}

#[tokio::test]
async fn latest_valid_filters_on_expiry() {
    let store = store().await;
    let now = ts(1_750_000_000_000_000);

    store
        .insert_link(link("https://expired.example", "abc", Some(now - SignedDuration::from_secs(5))))
        .await
        .unwrap();
    assert!(store
        .find_latest_valid_by_code(&code("abc"), now)
        .await
        .unwrap()
        .is_none());

    let open = store.insert_link(link("https://open.example", "abc", None)).await.unwrap();
    let found = store
        .find_latest_valid_by_code(&code("abc"), now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, open);

    let edge = store.insert_link(link("https://edge.example", "edge", Some(now))).await.unwrap();
    let found = store
        .find_latest_valid_by_code(&code("edge"), now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, edge);
    assert!(store
        .find_latest_valid_by_code(&code("edge"), now + SignedDuration::from_micros(1))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn update_overwrites_row() {
    let store = store().await;
    let id = store.insert_link(link("https://example.com", "abc", None)).await.unwrap();

    let mut record = store.get_link_by_id(id).await.unwrap().unwrap();
    record.original_url = "https://changed.example".to_string();
    record.valid_until = Some(ts(1_900_000_000_000_000));
    assert!(store.update_link(&record).await.unwrap());

    assert_eq!(store.get_link_by_id(id).await.unwrap().unwrap(), record);

    record.id = id + 100;
    assert!(!store.update_link(&record).await.unwrap());
}

#[tokio::test]
async fn delete_removes_row_and_ids_are_not_reused() {
    let store = store().await;
    let first = store.insert_link(link("https://a.example", "aaa", None)).await.unwrap();
    let second = store.insert_link(link("https://b.example", "bbb", None)).await.unwrap();

    assert!(store.delete_link(second).await.unwrap());
    assert!(!store.delete_link(second).await.unwrap());
    assert!(store.get_link_by_id(second).await.unwrap().is_none());

    let third = store.insert_link(link("https://c.example", "ccc", None)).await.unwrap();
    assert!(third > second);

    let ids: Vec<i64> = store
        .list_links()
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![first, third]);
}

#[tokio::test]
async fn connect_creates_database_file() {
    let dir = std::env::temp_dir().join(format!(
        "stubby-sqlite-{}-{}",
        std::process::id(),
        Timestamp::now().as_nanosecond()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("links.db");
    let url = format!("sqlite://{}", path.display());

    {
        let store = SqliteLinkStore::connect(&url).await.unwrap();
        store.insert_link(link("https://example.com", "abc", None)).await.unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteLinkStore::connect(&url).await.unwrap();
    let links = reopened.list_links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].original_url, "https://example.com");
    reopened.pool().close().await;

    std::fs::remove_dir_all(&dir).ok();
}
