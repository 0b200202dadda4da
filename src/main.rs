//! decision-desk console driver.
//!
//! Reads configuration from `DECISION_DESK__*` env vars (see `config`), then
//! runs one decision conversation at a time over stdin/stdout. A new session
//! starts after each verdict. `exit` or EOF quits.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use decision_desk::adapters::ai::{GeminiConfig, GeminiProvider, ResilientProvider};
use decision_desk::adapters::search::{DisabledSearch, TavilyConfig, TavilySearch};
use decision_desk::adapters::storage::InMemorySessionStore;
use decision_desk::application::{
    ModelSettings, QuestionGenerator, SessionLocks, SessionSweeper, SessionSweeperConfig,
    SubmitMessageCommand, SubmitMessageHandler, TurnReply, VerdictEvaluator,
};
use decision_desk::config::{AppConfig, LogFormat};
use decision_desk::domain::foundation::SessionKey;
use decision_desk::ports::{AIProvider, ContextSearch, SessionStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter()?)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    config.validate()?;

    let ai_key = config.ai.api_key.clone().unwrap_or_default();
    let gemini = GeminiProvider::new(
        GeminiConfig::new(ai_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?;
    let ai: Arc<dyn AIProvider> = Arc::new(
        ResilientProvider::new(gemini)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    );

    let search: Arc<dyn ContextSearch> = match config.search.api_key() {
        Some(key) => Arc::new(TavilySearch::new(
            TavilyConfig::new(key)
                .with_base_url(&config.search.base_url)
                .with_max_results(config.search.max_results)
                .with_timeout(config.search.timeout()),
        )?),
        None => {
            tracing::warn!("No search API key configured, verdicts will run without context");
            Arc::new(DisabledSearch)
        }
    };

    let settings = ModelSettings {
        temperature: config.ai.temperature,
        max_output_tokens: config.ai.max_output_tokens,
    };
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let locks = Arc::new(SessionLocks::new());

    let handler = SubmitMessageHandler::new(
        Arc::clone(&store),
        QuestionGenerator::new(Arc::clone(&ai)).with_settings(settings),
        VerdictEvaluator::new(ai, search)
            .with_settings(settings)
            .with_search_timeout(config.search.timeout())
            .with_rubric_enforcement(config.session.enforce_rubric),
    )
    .with_locks(Arc::clone(&locks));

    let sweeper = SessionSweeper::new(
        store,
        SessionSweeperConfig::default()
            .with_idle_ttl(config.session.idle_ttl())
            .with_sweep_interval(config.session.sweep_interval()),
    )
    .with_locks(locks);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    tracing::info!(model = %config.ai.model, "decision-desk ready");
    let result = console_loop(&handler).await;

    let _ = shutdown_tx.send(true);
    let _ = sweeper_task.await;
    result
}

async fn console_loop(handler: &SubmitMessageHandler) -> Result<(), BoxError> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = SessionKey::generate();

    stdout
        .write_all(b"What decision are you weighing? (type `exit` to quit)\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = match handler
            .handle(SubmitMessageCommand::new(session.clone(), line))
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(session = %session, error = %err, "Turn failed");
                stdout.write_all(err.user_message().as_bytes()).await?;
                stdout.write_all(b"\n> ").await?;
                stdout.flush().await?;
                continue;
            }
        };

        let text = match &reply {
            TurnReply::Question { number, text } => format!("[{}/6] {}", number, text),
            other => other.text().to_string(),
        };
        stdout.write_all(text.as_bytes()).await?;

        if reply.is_verdict() {
            session = SessionKey::generate();
            stdout
                .write_all(b"\n\nWhat other decision are you weighing?")
                .await?;
        }
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
