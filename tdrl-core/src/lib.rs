#![warn(missing_docs)]
//! Core vocabulary shared by tile-coding learners.
//!
//! This crate defines the interfaces of the collaborators around a
//! temporal-difference learner, i.e., environments ([`Env`]), action
//! selection ([`Policy`]) and the learner itself ([`Learner`]), together with
//! the error type and the [`record::Record`] returned by every learning step.
pub mod error;
pub mod record;

mod base;
pub use base::{Env, Learner, Policy, Step, Transition};
pub use error::TdrlError;
