//! Core interfaces.
mod env;
mod learner;
mod policy;
mod step;
pub use env::Env;
pub use learner::Learner;
pub use policy::Policy;
pub use step::{Step, Transition};
