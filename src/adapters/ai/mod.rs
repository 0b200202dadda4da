//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models over the REST API
//! - `ResilientProvider` - Wrapper adding a per-attempt timeout and a bounded retry
//! - `MockAIProvider` - Configurable mock for testing

mod gemini_provider;
mod mock_provider;
mod resilient_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use resilient_provider::ResilientProvider;
