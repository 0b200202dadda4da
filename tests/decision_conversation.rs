//! Integration tests for the decision conversation.
//!
//! Drives `SubmitMessageHandler` end to end with the mock model, mock search
//! and the in-memory store:
//! 1. Statement -> six questions, one per turn
//! 2. Sixth answer -> scored verdict, session gone
//! 3. Isolation, serialization and failure atomicity around that flow

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use decision_desk::adapters::ai::{MockAIProvider, MockError, MockResponse, ResilientProvider};
use decision_desk::adapters::search::MockContextSearch;
use decision_desk::adapters::storage::InMemorySessionStore;
use decision_desk::application::{
    QuestionGenerator, SubmitMessageCommand, SubmitMessageHandler, TurnReply, VerdictEvaluator,
};
use decision_desk::domain::decision::{
    DecisionSession, VerdictOutcome, APOLOGY_MESSAGE, REPROMPT_MESSAGE,
};
use decision_desk::domain::foundation::SessionKey;
use decision_desk::ports::{
    CompletionRequest, RequestPurpose, SearchError, SessionStore, SessionStoreError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const SCENARIO: &str = "Should I quit my job to start a business with $5,000 savings?";

static SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(10|[0-9])/10\b").unwrap());

/// The statement quoted inside the question prompt.
fn quoted_statement(request: &CompletionRequest) -> String {
    let prompt = request.prompt_text();
    prompt.split('"').nth(1).unwrap_or_default().to_string()
}

/// The numbered answers block of the scoring prompt.
fn answers_block(request: &CompletionRequest) -> String {
    let prompt = request.prompt_text();
    prompt
        .split("User Answers:\n")
        .nth(1)
        .and_then(|rest| rest.split("\n\n").next())
        .unwrap_or_default()
        .to_string()
}

fn questions_for(statement: &str) -> String {
    (1..=6)
        .map(|i| format!("{}. [{}] question {}?", i, statement, i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn verdict_echoing(answers: &str) -> String {
    format!(
        "Scores:\n\
         Financial Feasibility: 3/10\n\
         Risk Level: 8/10\n\
         Practicality: 6/10\n\
         Backup Strength: 4/10\n\
         Timeline Realism: 5/10\n\
         \n\
         Decision Verdict: Not Good\n\
         \n\
         Reasoning:\n{}\n\
         \n\
         Risks:\nRunway is short.\n\
         \n\
         Expert Suggestions:\nKeep the job while validating demand.",
        answers
    )
}

/// Model that derives questions from the statement and echoes answers in the verdict.
fn echo_model() -> MockAIProvider {
    MockAIProvider::new().with_responder(|req| MockResponse::Success {
        content: match req.metadata.purpose {
            RequestPurpose::Questions => questions_for(&quoted_statement(req)),
            RequestPurpose::Verdict => verdict_echoing(&answers_block(req)),
        },
    })
}

struct Harness {
    handler: Arc<SubmitMessageHandler>,
    store: InMemorySessionStore,
    model: MockAIProvider,
    search: MockContextSearch,
}

impl Harness {
    fn new(model: MockAIProvider) -> Self {
        let store = InMemorySessionStore::new();
        let search = MockContextSearch::new();
        let ai = Arc::new(model.clone());
        let handler = SubmitMessageHandler::new(
            Arc::new(store.clone()),
            QuestionGenerator::new(ai.clone()),
            VerdictEvaluator::new(ai, Arc::new(search.clone())),
        );
        Self {
            handler: Arc::new(handler),
            store,
            model,
            search,
        }
    }

    async fn send(&self, key: &str, message: &str) -> TurnReply {
        self.handler
            .handle(SubmitMessageCommand::new(key_of(key), message))
            .await
            .expect("turn should succeed")
    }

    async fn session(&self, key: &str) -> Option<DecisionSession> {
        self.store.get(&key_of(key)).await.unwrap()
    }
}

fn key_of(key: &str) -> SessionKey {
    SessionKey::new(key).unwrap()
}

fn question(number: usize, statement: &str) -> TurnReply {
    TurnReply::Question {
        number,
        text: format!("[{}] question {}?", statement, number),
    }
}

// =============================================================================
// Sequencing
// =============================================================================

#[tokio::test]
async fn six_answers_yield_questions_then_verdict() {
    let h = Harness::new(echo_model());

    assert_eq!(h.send("s1", "Should I learn Rust?").await, question(1, "Should I learn Rust?"));
    for n in 1..=5 {
        let reply = h.send("s1", &format!("answer {}", n)).await;
        assert_eq!(reply, question(n + 1, "Should I learn Rust?"));
    }

    let verdict = h.send("s1", "answer 6").await;

    assert!(verdict.is_verdict());
    assert!(verdict.text().contains("1. answer 1"));
    assert!(verdict.text().contains("6. answer 6"));
    assert!(h.session("s1").await.is_none());
    assert_eq!(h.model.call_count(), 2);
}

#[tokio::test]
async fn message_after_verdict_starts_a_new_session() {
    let h = Harness::new(echo_model());
    h.send("s1", "First decision?").await;
    for n in 1..=6 {
        h.send("s1", &format!("a{}", n)).await;
    }

    let reply = h.send("s1", "Second decision?").await;

    assert_eq!(reply, question(1, "Second decision?"));
    assert_eq!(h.session("s1").await.unwrap().statement(), "Second decision?");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_six_answers_follow_the_question_order(
        answers in proptest::collection::vec("[a-zA-Z0-9][a-zA-Z0-9 ,.]{0,30}", 6)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let h = Harness::new(echo_model());
            h.send("p", "Should I go?").await;

            for (n, answer) in answers.iter().take(5).enumerate() {
                let reply = h.send("p", answer).await;
                assert_eq!(reply, question(n + 2, "Should I go?"));
            }
            let verdict = h.send("p", &answers[5]).await;

            assert!(verdict.is_verdict());
            assert!(h.session("p").await.is_none());
        });
    }
}

// =============================================================================
// Empty input
// =============================================================================

#[tokio::test]
async fn blank_input_never_moves_the_cursor() {
    let h = Harness::new(echo_model());

    assert_eq!(h.send("s1", "").await, TurnReply::Reprompt);
    assert!(h.session("s1").await.is_none());

    h.send("s1", "Should I paint the house?").await;
    h.send("s1", "blue").await;
    for blank in ["", " ", "\n\t "] {
        let reply = h.send("s1", blank).await;
        assert_eq!(reply.text(), REPROMPT_MESSAGE);
        assert_eq!(h.session("s1").await.unwrap().cursor(), 1);
    }

    assert_eq!(h.send("s1", "weekend").await, question(3, "Should I paint the house?"));
}

// =============================================================================
// Isolation and serialization
// =============================================================================

#[tokio::test]
async fn interleaved_sessions_never_share_state() {
    let h = Harness::new(echo_model());
    h.send("alice", "Should I buy a boat?").await;
    h.send("bob", "Should I sell my car?").await;

    for n in 1..=5 {
        let a = h.send("alice", &format!("alice-{}", n)).await;
        let b = h.send("bob", &format!("bob-{}", n)).await;
        assert_eq!(a, question(n + 1, "Should I buy a boat?"));
        assert_eq!(b, question(n + 1, "Should I sell my car?"));
    }

    let alice = h.session("alice").await.unwrap();
    assert!(alice.answers().iter().all(|a| a.starts_with("alice-")));

    let verdict = h.send("alice", "alice-6").await;
    assert!(!verdict.text().contains("bob-"));
    assert_eq!(h.session("bob").await.unwrap().cursor(), 5);
}

#[tokio::test]
async fn concurrent_answers_for_one_session_are_serialized() {
    let h = Harness::new(echo_model());
    h.send("s1", "Should I move to Lisbon?").await;

    let tasks: Vec<_> = (1..=5)
        .map(|n| {
            let handler = Arc::clone(&h.handler);
            tokio::spawn(async move {
                handler
                    .handle(SubmitMessageCommand::new(key_of("s1"), format!("answer {}", n)))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut numbers = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            TurnReply::Question { number, .. } => numbers.push(number),
            other => panic!("unexpected reply {:?}", other),
        }
    }
    numbers.sort_unstable();

    assert_eq!(numbers, vec![2, 3, 4, 5, 6]);
    assert_eq!(h.session("s1").await.unwrap().cursor(), 5);
}

#[tokio::test]
async fn concurrent_first_messages_create_one_session() {
    let h = Harness::new(echo_model().with_delay(Duration::from_millis(20)));

    let first = {
        let handler = Arc::clone(&h.handler);
        tokio::spawn(async move {
            handler
                .handle(SubmitMessageCommand::new(key_of("s1"), "Should I run a marathon?"))
                .await
        })
    };
    let second = {
        let handler = Arc::clone(&h.handler);
        tokio::spawn(async move {
            handler
                .handle(SubmitMessageCommand::new(key_of("s1"), "four months"))
                .await
        })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let session = h.session("s1").await.unwrap();
    assert_eq!(h.model.call_count(), 1);
    assert_eq!(session.cursor(), 1);
}

// =============================================================================
// Failure atomicity
// =============================================================================

#[tokio::test]
async fn failed_verdict_can_be_retried_with_the_same_answer() {
    let h = Harness::new(MockAIProvider::new().with_response(questions_for("Go?")));
    h.send("s1", "Go?").await;
    for n in 1..=5 {
        h.send("s1", &format!("a{}", n)).await;
    }
    let before = h.session("s1").await.unwrap();

    let _ = h.model.clone().with_error(MockError::AuthenticationFailed);
    let text = h.handler.respond(key_of("s1"), "a6").await;

    assert_eq!(text, APOLOGY_MESSAGE);
    assert_eq!(h.session("s1").await.unwrap(), before);

    let _ = h.model.clone().with_response(verdict_echoing("fine"));
    let retry = h.send("s1", "a6").await;
    assert!(retry.is_verdict());
    assert!(h.session("s1").await.is_none());
}

#[tokio::test]
async fn failed_question_generation_leaves_no_session() {
    let h = Harness::new(MockAIProvider::new().with_error(MockError::Unavailable {
        message: "overloaded".into(),
    }));

    let err = h
        .handler
        .handle(SubmitMessageCommand::new(key_of("s1"), "Should I?"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), APOLOGY_MESSAGE);
    assert!(h.session("s1").await.is_none());
}

/// Store whose next update fails once when armed.
struct FlakyStore {
    inner: InMemorySessionStore,
    fail_next_update: AtomicBool,
}

#[async_trait]
impl SessionStore for FlakyStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<DecisionSession>, SessionStoreError> {
        self.inner.get(key).await
    }

    async fn create(&self, session: DecisionSession) -> Result<(), SessionStoreError> {
        self.inner.create(session).await
    }

    async fn update(&self, session: DecisionSession) -> Result<(), SessionStoreError> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(SessionStoreError::Backend("disk on fire".into()));
        }
        self.inner.update(session).await
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, SessionStoreError> {
        self.inner.delete(key).await
    }

    async fn evict_idle(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<SessionKey>, SessionStoreError> {
        self.inner.evict_idle(cutoff).await
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        self.inner.count().await
    }
}

#[tokio::test]
async fn failed_store_write_keeps_previous_answers() {
    let inner = InMemorySessionStore::new();
    let store = Arc::new(FlakyStore {
        inner: inner.clone(),
        fail_next_update: AtomicBool::new(false),
    });
    let ai = Arc::new(echo_model());
    let handler = SubmitMessageHandler::new(
        store.clone(),
        QuestionGenerator::new(ai.clone()),
        VerdictEvaluator::new(ai, Arc::new(MockContextSearch::new())),
    );
    handler.respond(key_of("s1"), "Should I?").await;

    store.fail_next_update.store(true, Ordering::SeqCst);
    let text = handler.respond(key_of("s1"), "first answer").await;
    assert_eq!(text, APOLOGY_MESSAGE);
    assert_eq!(inner.get(&key_of("s1")).await.unwrap().unwrap().cursor(), 0);

    let text = handler.respond(key_of("s1"), "first answer").await;
    assert_eq!(text, "[Should I?] question 2?");
}

#[tokio::test]
async fn transient_model_failure_is_retried_once() {
    let model = MockAIProvider::new()
        .with_error(MockError::Timeout { timeout_secs: 60 })
        .with_response(questions_for("Retry?"));
    let store = InMemorySessionStore::new();
    let ai = Arc::new(ResilientProvider::new(model.clone()).with_backoff(Duration::ZERO));
    let handler = SubmitMessageHandler::new(
        Arc::new(store.clone()),
        QuestionGenerator::new(ai.clone()),
        VerdictEvaluator::new(ai, Arc::new(MockContextSearch::new())),
    );

    let text = handler.respond(key_of("s1"), "Retry?").await;

    assert_eq!(text, "[Retry?] question 1?");
    assert_eq!(model.call_count(), 2);
}

// =============================================================================
// Context search
// =============================================================================

#[tokio::test]
async fn search_failure_does_not_block_the_verdict() {
    let h = Harness::new(echo_model());
    let _ = h.search.clone().with_error(SearchError::NotConfigured);
    h.send("s1", "Should I?").await;
    for n in 1..=5 {
        h.send("s1", &format!("a{}", n)).await;
    }

    let verdict = h.send("s1", "a6").await;

    assert!(verdict.is_verdict());
    assert_eq!(h.search.queries(), vec!["Should I?"]);
    let prompt = h.model.get_calls()[1].prompt_text();
    assert!(prompt.contains("No external data available (search is not configured)"));
}

// =============================================================================
// Scenario
// =============================================================================

#[tokio::test]
async fn quitting_a_job_with_thin_savings_gets_a_scored_verdict() {
    let h = Harness::new(echo_model());
    let answers = [
        "About $5,000 saved, no other income.",
        "I have built two side projects.",
        "Rent and a car loan.",
        "I could freelance part time.",
        "I want revenue within 6 months.",
        "I could go back to my old field.",
    ];

    let first = h.send("founder", SCENARIO).await;
    assert!(first.text().contains(SCENARIO));
    for answer in &answers[..5] {
        assert!(!h.send("founder", answer).await.is_verdict());
    }
    let reply = h.send("founder", answers[5]).await;

    let TurnReply::Verdict { outcome, text } = reply else {
        panic!("expected a verdict");
    };
    assert!(text.contains("Decision Verdict"));
    assert_eq!(outcome, Some(VerdictOutcome::NotGood));
    assert!(["Good", "Not Good", "Conditionally Good"]
        .iter()
        .any(|label| text.contains(&format!("Decision Verdict: {}", label))));
    assert_eq!(SCORE.find_iter(&text).count(), 5);
    assert!(h.session("founder").await.is_none());
}
