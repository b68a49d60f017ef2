//! TD learners over tile codes.
//!
//! All learners update the weights of a [`SharedTileCode`] by gradient descent
//! with accumulating eligibility traces:
//!
//! * [`Sarsa`] bootstraps from the action actually taken next.
//! * [`QLearning`] bootstraps from the best action and cuts traces after
//!   exploratory actions.
//! * [`DynaQ`] adds planning with learned [`StateActionTransition`](crate::model::StateActionTransition)
//!   models to Q-learning.
mod base;
mod config;
mod dyna_q;
mod q_learning;
mod sarsa;
mod trace;
pub use base::{shared, GradientDescentET, SharedTileCode};
pub use config::{DynaQConfig, GradientDescentConfig};
pub use dyna_q::{DynaQ, Key};
pub use q_learning::QLearning;
pub use sarsa::Sarsa;
pub use trace::EligibilityTrace;
