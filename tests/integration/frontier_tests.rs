//! Redis frontier tests
//!
//! These exercise the production frontier against a live Redis instance and
//! are ignored by default. Run them with a local server:
//!
//! ```text
//! docker run -d -p 6379:6379 redis:8-alpine
//! cargo test --test frontier_tests -- --ignored
//! ```
//!
//! `REDIS_HOST` / `REDIS_PORT` select a non-default endpoint. Each test uses
//! its own key pair so concurrently running tests cannot interfere.

use monzo_crawler::config::RedisConfig;
use monzo_crawler::frontier::{FrontierQueue, RedisFrontier};
use std::sync::Arc;
use std::time::Duration;

fn frontier_for(test: &str) -> RedisFrontier {
    let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("REDIS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(6379);

    let mut config = RedisConfig::new(host, port);
    config.queue_key = format!("test:{}:{}:queue", std::process::id(), test);
    config.visited_set_key = format!("test:{}:{}:visited", std::process::id(), test);
    RedisFrontier::connect(&config).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_push_deduplicates() {
    let queue = frontier_for("dedup");
    queue.clear_all().await.unwrap();

    let url = "https://www.example.com";
    assert!(queue.push(url).await.unwrap(), "first push should admit");
    assert_eq!(queue.size().await.unwrap(), 1);
    assert!(!queue.push(url).await.unwrap(), "second push should reject");
    assert_eq!(queue.size().await.unwrap(), 1);
    assert!(queue.has_seen(url).await.unwrap());
    assert_eq!(queue.visited_count().await.unwrap(), 1);

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_push_then_pop_round_trip() {
    let queue = frontier_for("roundtrip");
    queue.clear_all().await.unwrap();

    let url = "https://www.example.com/page";
    queue.push(url).await.unwrap();
    assert_eq!(queue.pop().await.unwrap(), Some(url.to_string()));
    assert_eq!(queue.size().await.unwrap(), 0);
    assert_eq!(queue.pop().await.unwrap(), None);

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_pop_preserves_visited_status() {
    let queue = frontier_for("pop_visited");
    queue.clear_all().await.unwrap();

    let url = "https://www.example.com";
    queue.push(url).await.unwrap();
    let popped = queue.pop().await.unwrap();
    assert_eq!(popped, Some(url.to_string()));
    assert!(queue.has_seen(url).await.unwrap());
    assert!(
        !queue.push(url).await.unwrap(),
        "a popped URL must stay seen forever"
    );

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_clear_empties_queue_but_keeps_visited() {
    let queue = frontier_for("clear");
    queue.clear_all().await.unwrap();

    let url = "https://www.example.com";
    queue.push(url).await.unwrap();
    queue.clear().await.unwrap();
    assert_eq!(queue.size().await.unwrap(), 0);
    assert!(queue.has_seen(url).await.unwrap());
    assert!(!queue.push(url).await.unwrap());

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_clear_all_resets_both_sets() {
    let queue = frontier_for("clear_all");
    queue.clear_all().await.unwrap();

    let url = "https://www.example.com";
    queue.push(url).await.unwrap();
    queue.clear_all().await.unwrap();
    assert_eq!(queue.size().await.unwrap(), 0);
    assert!(!queue.has_seen(url).await.unwrap());
    assert_eq!(queue.visited_count().await.unwrap(), 0);
    assert!(queue.push(url).await.unwrap(), "push admits again after clear_all");

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_visited_count_tracks_unique_urls() {
    let queue = frontier_for("visited_count");
    queue.clear_all().await.unwrap();

    queue.push("https://www.example.com/1").await.unwrap();
    queue.push("https://www.example.com/2").await.unwrap();
    queue.push("https://www.example.com/3").await.unwrap();
    assert_eq!(queue.visited_count().await.unwrap(), 3);

    queue.push("https://www.example.com/1").await.unwrap();
    assert_eq!(queue.visited_count().await.unwrap(), 3);

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_empty_push_touches_nothing() {
    let queue = frontier_for("empty_push");
    queue.clear_all().await.unwrap();

    assert!(!queue.push("").await.unwrap());
    assert_eq!(queue.size().await.unwrap(), 0);
    assert_eq!(queue.visited_count().await.unwrap(), 0);
    assert!(!queue.has_seen("").await.unwrap());

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_pop_blocking_times_out_on_empty_queue() {
    let queue = frontier_for("brpop_timeout");
    queue.clear_all().await.unwrap();

    let popped = queue.pop_blocking(Duration::from_millis(200)).await.unwrap();
    assert_eq!(popped, None);

    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_pop_blocking_returns_pushed_url() {
    let queue = Arc::new(frontier_for("brpop_push"));
    queue.clear_all().await.unwrap();

    let url = "https://www.example.com/late";
    let waiter = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.pop_blocking(Duration::from_secs(5)).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    queue.push(url).await.unwrap();

    let popped = waiter.await.unwrap().unwrap();
    assert_eq!(popped, Some(url.to_string()));

    queue.clear_all().await.unwrap();
    queue.close();
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn test_concurrent_pushes_admit_exactly_once() {
    let queue = Arc::new(frontier_for("concurrent"));
    queue.clear_all().await.unwrap();

    let url = "https://x/";
    let (a, b) = tokio::join!(
        tokio::spawn({
            let queue = queue.clone();
            async move { queue.push(url).await.unwrap() }
        }),
        tokio::spawn({
            let queue = queue.clone();
            async move { queue.push(url).await.unwrap() }
        }),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(a ^ b, "exactly one push must win, got {} and {}", a, b);
    assert_eq!(queue.visited_count().await.unwrap(), 1);
    assert_eq!(queue.size().await.unwrap(), 1);

    queue.clear_all().await.unwrap();
    queue.close();
}
