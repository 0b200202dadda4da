//! Integration tests for idle session eviction.
//!
//! Abandoned conversations are removed by `SessionSweeper`; the next message
//! for an evicted key starts over as a new decision.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use decision_desk::adapters::ai::{MockAIProvider, MockResponse};
use decision_desk::adapters::search::DisabledSearch;
use decision_desk::adapters::storage::InMemorySessionStore;
use decision_desk::application::{
    QuestionGenerator, SessionLocks, SessionSweeper, SessionSweeperConfig, SubmitMessageHandler,
    VerdictEvaluator,
};
use decision_desk::domain::foundation::SessionKey;
use decision_desk::ports::SessionStore;

fn model() -> MockAIProvider {
    MockAIProvider::new().with_responder(|_| MockResponse::Success {
        content: "1. One?\n2. Two?\n3. Three?\n4. Four?\n5. Five?\n6. Six?".to_string(),
    })
}

fn wire(
    store: &InMemorySessionStore,
    ttl: Duration,
) -> (SubmitMessageHandler, SessionSweeper, Arc<SessionLocks>) {
    let ai = Arc::new(model());
    let locks = Arc::new(SessionLocks::new());
    let handler = SubmitMessageHandler::new(
        Arc::new(store.clone()),
        QuestionGenerator::new(ai.clone()),
        VerdictEvaluator::new(ai, Arc::new(DisabledSearch)),
    )
    .with_locks(Arc::clone(&locks));
    let sweeper = SessionSweeper::new(
        Arc::new(store.clone()),
        SessionSweeperConfig::default()
            .with_idle_ttl(ttl)
            .with_sweep_interval(Duration::from_millis(10)),
    )
    .with_locks(Arc::clone(&locks));
    (handler, sweeper, locks)
}

#[tokio::test]
async fn idle_session_is_evicted_and_restarts_fresh() {
    let store = InMemorySessionStore::new();
    let (handler, sweeper, locks) = wire(&store, Duration::from_millis(20));
    let key = SessionKey::new("idle").unwrap();

    handler.respond(key.clone(), "Should I repaint?").await;
    handler.respond(key.clone(), "green").await;
    assert_eq!(store.count().await.unwrap(), 1);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let evicted = sweeper.sweep_once().await.unwrap();

    assert_eq!(evicted, vec![key.clone()]);
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(locks.is_empty());

    let reply = handler.respond(key.clone(), "Should I move instead?").await;
    assert_eq!(reply, "One?");
    let session = store.get(&key).await.unwrap().unwrap();
    assert_eq!(session.statement(), "Should I move instead?");
    assert_eq!(session.cursor(), 0);
}

#[tokio::test]
async fn active_session_survives_sweeps() {
    let store = InMemorySessionStore::new();
    let (handler, sweeper, _locks) = wire(&store, Duration::from_secs(60));
    let key = SessionKey::new("active").unwrap();

    handler.respond(key.clone(), "Should I adopt a cat?").await;
    for _ in 0..3 {
        assert!(sweeper.sweep_once().await.unwrap().is_empty());
    }

    assert_eq!(handler.respond(key, "yes").await, "Two?");
}

#[tokio::test]
async fn background_sweeper_evicts_until_shutdown() {
    let store = InMemorySessionStore::new();
    let (handler, sweeper, _locks) = wire(&store, Duration::from_millis(20));
    for name in ["a", "b", "c"] {
        handler
            .respond(SessionKey::new(name).unwrap(), "Should I?")
            .await;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.count().await.unwrap(), 0);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
}
