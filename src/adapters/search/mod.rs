//! Context Search Adapters.
//!
//! - `TavilySearch` - Tavily web search API
//! - `DisabledSearch` - Stand-in when no search key is configured
//! - `MockContextSearch` - Scripted results for testing

mod disabled_search;
mod mock_search;
mod tavily_search;

pub use disabled_search::DisabledSearch;
pub use mock_search::MockContextSearch;
pub use tavily_search::{TavilyConfig, TavilySearch};
