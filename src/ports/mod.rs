//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the decision domain and the outside world. Adapters implement them.
//!
//! - `AIProvider` - Language-model gateway
//! - `ContextSearch` - Best-effort real-world context lookup
//! - `SessionStore` - Live session state keyed by session identifier

mod ai_provider;
mod context_search;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use context_search::{ContextSearch, SearchContext, SearchError};
pub use session_store::{SessionStore, SessionStoreError};

use std::time::Duration;

/// Whole seconds for a timeout message, rounded up and never zero.
pub(crate) fn timeout_secs(limit: Duration) -> u32 {
    let secs = limit.as_secs() + u64::from(limit.subsec_nanos() > 0);
    u32::try_from(secs.max(1)).unwrap_or(u32::MAX)
}
