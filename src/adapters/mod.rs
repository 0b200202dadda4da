//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language model providers (Gemini, resilience wrapper, mock)
//! - `search` - Context search backends (Tavily, disabled, mock)
//! - `storage` - Session stores (in-memory)

pub mod ai;
pub mod search;
pub mod storage;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider, ResilientProvider};
pub use search::{DisabledSearch, MockContextSearch, TavilyConfig, TavilySearch};
pub use storage::InMemorySessionStore;
