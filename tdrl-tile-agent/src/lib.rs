#![warn(missing_docs)]
//! Tile coding and temporal-difference learners with eligibility traces.
//!
//! * [`coding`] maps continuous parameter vectors to sparse sets of active
//!   tiles and keeps the weights of a linear value function.
//! * [`model`] learns, for a state-action pair, which next states tend to
//!   follow and with which reward.
//! * [`algorithm`] implements Sarsa(λ), Watkins Q(λ) and Dyna-Q on top of a
//!   shared tile code.
//! * [`explorer`] provides epsilon-greedy and softmax action selection.
pub mod algorithm;
pub mod coding;
pub mod explorer;
pub mod model;
