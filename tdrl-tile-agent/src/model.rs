//! Models of the environment learned from experience.
//!
//! Dyna-Q keeps one [`StateActionTransition`] per visited state-action pair
//! and replays transitions drawn from it between real steps.
mod transition;
pub use transition::StateActionTransition;
