//! Decision Desk - conversational decision evaluator.
//!
//! A user states a decision, answers six generated clarifying questions, and
//! receives a verdict scored on five dimensions by a language model, with the
//! scoring rubric enforced locally.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
