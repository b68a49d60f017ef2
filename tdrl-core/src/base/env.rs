//! Environment.
use super::Step;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// The library does not drive environments itself. This trait describes what
/// an episode driver needs in order to produce transitions for a learner.
pub trait Env {
    /// State of the environment.
    type State: Clone;

    /// Action of the environment.
    type Action: Clone;

    /// Resets the environment and returns the initial state.
    fn reset(&mut self) -> Result<Self::State>;

    /// Performes an environment step.
    fn step(&mut self, a: &Self::Action) -> Result<Step<Self::State>>;

    /// Returns the actions available in the environment.
    fn actions(&self) -> Vec<Self::Action>;
}
