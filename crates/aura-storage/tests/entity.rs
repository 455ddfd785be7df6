mod common;

use std::sync::Arc;

use aura_storage::entity::{SeedOutcome, StoreLimits};
use aura_storage::error::StorageError;

use common::{RECORDS, Record, UNSEEDED, memory_store, memory_store_with};

#[tokio::test]
async fn seed_populates_index_and_records() {
    let (_mem, store) = memory_store(&RECORDS);

    let outcome = store.ensure_seed().await.unwrap();
    assert_eq!(outcome, SeedOutcome::Seeded(3));

    let ids = store.index().list().await.unwrap();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
    for id in &ids {
        assert!(store.exists(id).await.unwrap());
    }
}

#[tokio::test]
async fn second_seed_performs_no_writes() {
    let (mem, store) = memory_store(&RECORDS);
    store.ensure_seed().await.unwrap();
    let writes = mem.write_count().await;

    assert_eq!(store.ensure_seed().await.unwrap(), SeedOutcome::AlreadySeeded);
    assert_eq!(mem.write_count().await, writes);
}

#[tokio::test]
async fn seed_skips_when_another_process_already_seeded() {
    let (mem, store) = memory_store(&RECORDS);
    store.ensure_seed().await.unwrap();

    // A fresh handle has no process-local memory of the seed.
    let other = aura_storage::entity::EntityStore::new(
        aura_storage::storage::Storage::memory(mem.clone()),
        &RECORDS,
        StoreLimits::default(),
    );
    let writes = mem.write_count().await;
    assert_eq!(other.ensure_seed().await.unwrap(), SeedOutcome::AlreadySeeded);
    assert_eq!(mem.write_count().await, writes);
}

#[tokio::test]
async fn seed_with_wider_fanout_keeps_seed_order() {
    let limits = StoreLimits {
        seed_concurrency: 8,
        ..StoreLimits::default()
    };
    let (_mem, store) = memory_store_with(&RECORDS, limits);

    store.ensure_seed().await.unwrap();
    assert_eq!(store.index().list().await.unwrap(), vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn empty_seed_data_is_reported() {
    let (_mem, store) = memory_store(&UNSEEDED);
    assert_eq!(store.ensure_seed().await.unwrap(), SeedOutcome::NoSeedData);
    assert!(store.index().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let (_mem, store) = memory_store(&RECORDS);
    assert!(!store.exists("nope").await.unwrap());
    assert!(!store.exists("a/b").await.unwrap());
    assert!(matches!(
        store.get_state("nope").await,
        Err(StorageError::NotFound { .. })
    ));
    assert!(matches!(
        store.update("nope", |r| r).await,
        Err(StorageError::NotFound { .. })
    ));
}

#[tokio::test]
async fn paginates_by_cursor() {
    let (_mem, store) = memory_store(&RECORDS);
    store.ensure_seed().await.unwrap();

    let first = store.list(None, Some(2)).await.unwrap();
    let ids: Vec<_> = first.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(first.next_cursor.as_deref(), Some("p2"));

    let second = store.list(first.next_cursor.as_deref(), Some(2)).await.unwrap();
    let ids: Vec<_> = second.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p3"]);
    assert_eq!(second.next_cursor, None);
}

#[tokio::test]
async fn pages_are_disjoint_and_complete() {
    let (_mem, store) = memory_store(&UNSEEDED);
    for i in 0..7 {
        let id = format!("r{i}");
        store
            .create(&id, &Record { id: id.clone(), count: i })
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = store.list(cursor.as_deref(), Some(3)).await.unwrap();
        assert!(page.items.len() <= 3);
        seen.extend(page.items.into_iter().map(|r| r.id));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let expected: Vec<String> = (0..7).map(|i| format!("r{i}")).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn page_size_is_capped() {
    let limits = StoreLimits {
        max_page_size: 2,
        ..StoreLimits::default()
    };
    let (_mem, store) = memory_store_with(&RECORDS, limits);
    store.ensure_seed().await.unwrap();

    let page = store.list(None, Some(500)).await.unwrap();
    assert_eq!(page.items.len(), 2);

    let page = store.list(None, Some(0)).await.unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn unknown_cursor_is_rejected() {
    let (_mem, store) = memory_store(&RECORDS);
    store.ensure_seed().await.unwrap();
    assert!(matches!(
        store.list(Some("zzz"), None).await,
        Err(StorageError::InvalidCursor(_))
    ));
}

#[tokio::test]
async fn mutate_creates_from_initial_state_and_indexes() {
    let (_mem, store) = memory_store(&UNSEEDED);

    let value = store
        .mutate("fresh", |mut r| {
            r.id = "fresh".to_string();
            r.count += 1;
            r
        })
        .await
        .unwrap();

    assert_eq!(value.count, 1);
    assert_eq!(store.index().list().await.unwrap(), vec!["fresh"]);
    assert_eq!(store.get_state("fresh").await.unwrap(), value);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mutations_do_not_lose_updates() {
    let (_mem, store) = memory_store(&UNSEEDED);
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .mutate("counter", |mut r| {
                    r.count += 1;
                    r
                })
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.get_state("counter").await.unwrap().count, 10);
    assert_eq!(store.index().list().await.unwrap(), vec!["counter"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_concurrent_increments_yield_two() {
    let (_mem, store) = memory_store(&UNSEEDED);
    let bump = |mut r: Record| {
        r.count += 1;
        r
    };

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.mutate("c", bump).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.get_state("c").await.unwrap().count, 2);
}

#[tokio::test]
async fn mutate_relists_a_record_missing_from_the_index() {
    let (_mem, store) = memory_store(&UNSEEDED);
    let orphan = Record { id: "orphan".to_string(), count: 0 };
    store.save("orphan", &orphan).await.unwrap();
    assert!(store.index().list().await.unwrap().is_empty());

    let updated = store
        .mutate("orphan", |mut r| {
            r.count += 1;
            r
        })
        .await
        .unwrap();

    assert_eq!(updated.count, 1);
    assert_eq!(store.index().list().await.unwrap(), vec!["orphan"]);
}

#[tokio::test]
async fn create_is_at_most_once() {
    let (_mem, store) = memory_store(&UNSEEDED);
    let first = Record { id: "x".to_string(), count: 1 };
    let second = Record { id: "x".to_string(), count: 2 };

    assert!(store.create("x", &first).await.unwrap());
    assert!(!store.create("x", &second).await.unwrap());
    assert_eq!(store.get_state("x").await.unwrap(), first);
    assert_eq!(store.index().list().await.unwrap(), vec!["x"]);
}

#[tokio::test]
async fn delete_removes_record_blobs_and_index_entry() {
    let (_mem, store) = memory_store(&RECORDS);
    store.ensure_seed().await.unwrap();
    store.blobs("p2").unwrap().put_blob("scan", b"bytes").await.unwrap();

    assert!(store.delete("p2").await.unwrap());

    assert!(!store.exists("p2").await.unwrap());
    assert_eq!(store.blobs("p2").unwrap().get_blob("scan").await.unwrap(), None);
    assert_eq!(store.index().list().await.unwrap(), vec!["p1", "p3"]);
    assert!(!store.delete("p2").await.unwrap());
}

#[tokio::test]
async fn collect_walks_every_page() {
    let limits = StoreLimits {
        max_page_size: 2,
        ..StoreLimits::default()
    };
    let (_mem, store) = memory_store_with(&RECORDS, limits);
    store.ensure_seed().await.unwrap();

    assert_eq!(store.collect(100).await.unwrap().len(), 3);
    assert_eq!(store.collect(2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn unbounded_page_size_with_cursor_does_not_overflow() {
    let limits = StoreLimits {
        max_page_size: usize::MAX,
        ..StoreLimits::default()
    };
    let (_mem, store) = memory_store_with(&RECORDS, limits);
    store.ensure_seed().await.unwrap();

    let page = store.list(Some("p1"), None).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p3"]);
    assert!(page.next_cursor.is_none());
}
