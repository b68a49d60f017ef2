//! Watkins Q(λ).
use super::{GradientDescentConfig, GradientDescentET, SharedTileCode};
use crate::coding::Indexing;
use log::trace;
use tdrl_core::{record::Record, Learner, TdrlError, Transition};

/// Off-policy Q-learning with Watkins eligibility traces.
///
/// The target of `(s, a)` is `r + γ max_b Q(s', b)` over the action set.
/// When the behavior policy takes a non-greedy `a'` at `s'`, the trace is
/// cleared after the update since later rewards no longer follow the greedy
/// policy.
#[derive(Debug)]
pub struct QLearning<I> {
    base: GradientDescentET<I>,
}

impl<I: Indexing> QLearning<I> {
    /// Constructs Q-learning. `actions` must not be empty.
    pub fn build(
        tile_code: SharedTileCode<I>,
        config: GradientDescentConfig,
        state_dim: usize,
        actions: Vec<Vec<f32>>,
    ) -> Result<Self, TdrlError> {
        if actions.is_empty() {
            return Err(TdrlError::EmptyActionSet);
        }
        Ok(Self {
            base: GradientDescentET::build(tile_code, config, state_dim, actions)?,
        })
    }

    /// Returns the greedy action in `state`.
    pub fn greedy_action(&self, state: &[f32]) -> Result<Vec<f32>, TdrlError> {
        self.base.greedy_action(state)
    }

    /// Returns the shared machinery.
    pub fn base(&self) -> &GradientDescentET<I> {
        &self.base
    }

    /// Returns the shared tile code.
    pub fn tile_code(&self) -> SharedTileCode<I> {
        self.base.tile_code()
    }
}

impl<I: Indexing> Learner<Vec<f32>, Vec<f32>> for QLearning<I> {
    fn learn(&mut self, t: &Transition<Vec<f32>, Vec<f32>>) -> Result<Record, TdrlError> {
        let (next_value, exploratory) = if t.is_terminal {
            (0.0, false)
        } else {
            let (_, max) = self.base.max_value(&t.next_state)?;
            let taken = self.base.value(&t.next_state, &t.next_action)?;
            (max, taken < max)
        };

        let backup = self.base.backup(&t.state, &t.action, t.reward, next_value)?;
        if exploratory {
            trace!("Exploratory next action, clearing trace");
            self.base.clear_trace();
        }
        Ok(self.base.record(backup))
    }

    fn value(&self, state: &Vec<f32>, action: &Vec<f32>) -> Result<f32, TdrlError> {
        self.base.value(state, action)
    }

    fn begin_episode(&mut self) {
        self.base.begin_episode();
    }
}
