//! Sarsa(λ).
use super::{GradientDescentConfig, GradientDescentET, SharedTileCode};
use crate::coding::Indexing;
use tdrl_core::{record::Record, Learner, TdrlError, Transition};

/// On-policy Sarsa(λ) with accumulating traces.
///
/// The target of `(s, a)` is `r + γ Q(s', a')` where `a'` is the action the
/// behavior policy actually takes, or `r` on terminal transitions.
#[derive(Debug)]
pub struct Sarsa<I> {
    base: GradientDescentET<I>,
}

impl<I: Indexing> Sarsa<I> {
    /// Constructs Sarsa over the first `state_dim` dimensions of `tile_code`
    /// as the state and the remaining ones as the action.
    pub fn build(
        tile_code: SharedTileCode<I>,
        config: GradientDescentConfig,
        state_dim: usize,
    ) -> Result<Self, TdrlError> {
        Ok(Self {
            base: GradientDescentET::build(tile_code, config, state_dim, vec![])?,
        })
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

impl<I: Indexing> Learner<Vec<f32>, Vec<f32>> for Sarsa<I> {
    fn learn(&mut self, t: &Transition<Vec<f32>, Vec<f32>>) -> Result<Record, TdrlError> {
        let next_value = if t.is_terminal {
            0.0
        } else {
            self.base.value(&t.next_state, &t.next_action)?
        };
        let backup = self.base.backup(&t.state, &t.action, t.reward, next_value)?;
        Ok(self.base.record(backup))
    }

    fn value(&self, state: &Vec<f32>, action: &Vec<f32>) -> Result<f32, TdrlError> {
        self.base.value(state, action)
    }

    fn begin_episode(&mut self) {
        self.base.begin_episode();
    }
}
