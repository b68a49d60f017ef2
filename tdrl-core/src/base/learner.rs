//! Learner.
use super::Transition;
use crate::{record::Record, TdrlError};

/// Represents an online temporal-difference learner.
pub trait Learner<S, A> {
    /// Performs one learning step from a transition.
    ///
    /// The returned [`Record`] holds diagnostics of the step, e.g., the TD error.
    fn learn(&mut self, transition: &Transition<S, A>) -> Result<Record, TdrlError>;

    /// Returns the current estimate of the value of `action` in `state`.
    fn value(&self, state: &S, action: &A) -> Result<f32, TdrlError>;

    /// Signals the start of an episode.
    fn begin_episode(&mut self);
}
