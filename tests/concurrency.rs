//! Concurrent writers against one file-backed database. Counter deltas are
//! applied inside serialized transactions, so no increment or decrement is
//! ever lost.

mod common;

use futures_util::future::join_all;
use pretty_assertions::assert_eq;
use socialfeed::backend::comments::CreateOutcome;

use common::{actor, Feed};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_replies_both_count() {
    let feed = Feed::new().await;
    let parent = feed.comment(&feed.owner, None, "parent").await;
    let before = feed.post_count().await;

    let first = {
        let service = feed.service.clone();
        let request = feed.request(Some(parent.id), "reply one");
        let author = actor("one@example.com");
        tokio::spawn(async move { service.create(&author, request).await })
    };
    let second = {
        let service = feed.service.clone();
        let request = feed.request(Some(parent.id), "reply two");
        let author = actor("two@example.com");
        tokio::spawn(async move { service.create(&author, request).await })
    };

    for handle in [first, second] {
        let outcome = handle.await.unwrap().unwrap();
        assert!(matches!(outcome, CreateOutcome::Created(_)));
    }

    assert_eq!(feed.replies(parent.id).await, 2);
    assert_eq!(feed.post_count().await, before + 2);
    feed.assert_counters_consistent().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_creates() {
    let feed = Feed::new().await;
    let parent = feed.comment(&feed.owner, None, "busy thread").await;

    let tasks = (0..24).map(|i| {
        let service = feed.service.clone();
        let parent_id = if i % 2 == 0 { Some(parent.id) } else { None };
        let request = feed.request(parent_id, &format!("comment {}", i));
        let author = actor(&format!("user{}@example.com", i));
        tokio::spawn(async move { service.create(&author, request).await })
    });

    for result in join_all(tasks).await {
        assert!(matches!(result.unwrap().unwrap(), CreateOutcome::Created(_)));
    }

    assert_eq!(feed.post_count().await, 25);
    assert_eq!(feed.replies(parent.id).await, 12);
    feed.assert_counters_consistent().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_deletes_never_double_count() {
    let feed = Feed::new().await;
    let root = feed.comment(&feed.owner, None, "root").await;
    let middle = feed.comment(&feed.owner, Some(root.id), "middle").await;
    for i in 0..5 {
        feed.comment(&feed.owner, Some(middle.id), &format!("leaf {}", i)).await;
    }
    assert_eq!(feed.post_count().await, 7);

    let outer = {
        let service = feed.service.clone();
        let owner = feed.owner.clone();
        tokio::spawn(async move { service.delete(&owner, root.id).await })
    };
    let inner = {
        let service = feed.service.clone();
        let owner = feed.owner.clone();
        tokio::spawn(async move { service.delete(&owner, middle.id).await })
    };

    let affected_outer = outer.await.unwrap().unwrap().affected;
    let affected_inner = inner.await.unwrap().unwrap().affected;

    // Whichever ran first took the shared nodes; the total is exact.
    assert_eq!(affected_outer + affected_inner, 7);
    assert_eq!(feed.post_count().await, 0);
    feed.assert_counters_consistent().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_creates_racing_a_delete_stay_consistent() {
    let feed = Feed::new().await;
    let parent = feed.comment(&feed.owner, None, "contested").await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = feed.service.clone();
        let request = feed.request(Some(parent.id), &format!("racer {}", i));
        let author = actor(&format!("racer{}@example.com", i));
        handles.push(tokio::spawn(async move {
            service.create(&author, request).await.map(|_| ())
        }));
    }
    let deleter = {
        let service = feed.service.clone();
        let owner = feed.owner.clone();
        tokio::spawn(async move { service.delete(&owner, parent.id).await.map(|_| ()) })
    };
    handles.push(deleter);

    // Replies that lost the race fail cleanly with NotFound; none are orphaned.
    for handle in handles {
        let _ = handle.await.unwrap();
    }

    assert_eq!(feed.post_count().await, 0);
    assert_eq!(feed.live_rows().await, 0);
    feed.assert_counters_consistent().await;
}
