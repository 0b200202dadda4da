//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, errors, state machines)
//! - `decision` - The question / answer / verdict conversation

pub mod decision;
pub mod foundation;
