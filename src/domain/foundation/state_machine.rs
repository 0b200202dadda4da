//! State machine trait for phase enums.
//!
//! Gives lifecycle enums a single way to declare their legal moves and
//! to perform checked transitions.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// Implementors list their legal successor states; checked transitions
/// and terminal detection come for free.
///
/// # Example
///
/// ```ignore
/// let next = ConversationPhase::AwaitingProblem
///     .transition_to(ConversationPhase::AwaitingAnswer(1))?;
/// assert!(ConversationPhase::Completed.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
