//! Foundation module - Shared domain primitives.
//!
//! Identifiers, validation errors and the state machine contract
//! used across the decision domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::SessionKey;
pub use state_machine::StateMachine;
