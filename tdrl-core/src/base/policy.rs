//! Policy.
use crate::TdrlError;

/// Selects an action given a way to evaluate actions.
///
/// A policy never sees the learner itself. It gets a value query, usually
/// `|a| learner.value(&state, a)`, and picks one of `actions`.
pub trait Policy<A: Clone> {
    /// Selects one of `actions`.
    ///
    /// Returns [`TdrlError::EmptyActionSet`] when `actions` is empty and
    /// propagates errors of the value query.
    fn select_action(
        &mut self,
        actions: &[A],
        value: &mut dyn FnMut(&A) -> Result<f32, TdrlError>,
    ) -> Result<A, TdrlError>;
}
