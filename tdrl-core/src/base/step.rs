//! Environment steps and transitions.
use serde::{Deserialize, Serialize};

/// Outcome of an environment step, `(s_t+1, r_t, is_terminal)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<S> {
    /// State after the step.
    pub next_state: S,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode terminated at `next_state`.
    pub is_terminal: bool,
}

impl<S> Step<S> {
    /// Constructs a [`Step`] object.
    pub fn new(next_state: S, reward: f32, is_terminal: bool) -> Self {
        Self {
            next_state,
            reward,
            is_terminal,
        }
    }
}

/// A transition `(s_t, a_t, r_t, s_t+1, a_t+1)` fed to a [`Learner`](crate::Learner).
///
/// `next_action` is the action the behavior policy takes at `next_state`.
/// On-policy learners bootstrap from it, off-policy learners use it only to
/// decide whether the trajectory stayed greedy. It is ignored when
/// `is_terminal` is `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S, A> {
    /// State `s_t`.
    pub state: S,

    /// Action `a_t`.
    pub action: A,

    /// Reward `r_t`.
    pub reward: f32,

    /// State `s_t+1`.
    pub next_state: S,

    /// Action `a_t+1`.
    pub next_action: A,

    /// Flag denoting if `next_state` is terminal.
    pub is_terminal: bool,
}

impl<S, A> Transition<S, A> {
    /// Constructs a non-terminal transition.
    pub fn new(state: S, action: A, reward: f32, next_state: S, next_action: A) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            next_action,
            is_terminal: false,
        }
    }

    /// Marks the transition as terminal or not.
    pub fn terminal(mut self, is_terminal: bool) -> Self {
        self.is_terminal = is_terminal;
        self
    }
}
