//! Gradient-descent TD(λ) over a shared tile code.
use super::{EligibilityTrace, GradientDescentConfig};
use crate::coding::{Indexing, TileCode};
use log::{info, trace};
use std::{cell::RefCell, mem, rc::Rc};
use tdrl_core::{
    record::{Record, RecordValue},
    TdrlError,
};

/// Handle to a tile code shared by a learner and its users.
///
/// Weight updates of the learner are visible immediately through every clone
/// of the handle.
pub type SharedTileCode<I> = Rc<RefCell<TileCode<I>>>;

/// Wraps a tile code into a [`SharedTileCode`].
pub fn shared<I>(tile_code: TileCode<I>) -> SharedTileCode<I> {
    Rc::new(RefCell::new(tile_code))
}

/// Outcome of one backup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Backup {
    pub td_error: f32,
    pub value: f32,
}

/// Machinery shared by [`Sarsa`](super::Sarsa), [`QLearning`](super::QLearning)
/// and [`DynaQ`](super::DynaQ).
///
/// States and actions are flat vectors. The parameter vector of the tile code
/// is the state followed by the action, so the first `state_dim` dimensions
/// of the tile code describe states and the rest describe actions.
#[derive(Debug)]
pub struct GradientDescentET<I> {
    tile_code: SharedTileCode<I>,
    trace: EligibilityTrace,
    config: GradientDescentConfig,
    state_dim: usize,
    actions: Vec<Vec<f32>>,
}

impl<I: Indexing> GradientDescentET<I> {
    /// Constructs the learner.
    ///
    /// `actions` is the action set searched by [`GradientDescentET::greedy_action`]
    /// and may be empty for on-policy learning.
    pub fn build(
        tile_code: SharedTileCode<I>,
        config: GradientDescentConfig,
        state_dim: usize,
        actions: Vec<Vec<f32>>,
    ) -> Result<Self, TdrlError> {
        config.validate()?;

        let (dimension, size) = {
            let tc = tile_code.borrow();
            (tc.dimension(), tc.size())
        };
        if state_dim > dimension {
            return Err(TdrlError::DimensionMismatch {
                expected: dimension,
                actual: state_dim,
            });
        }
        let action_dim = dimension - state_dim;
        if let Some(a) = actions.iter().find(|a| a.len() != action_dim) {
            return Err(TdrlError::DimensionMismatch {
                expected: action_dim,
                actual: a.len(),
            });
        }

        info!(
            "Built TD learner: {} state and {} action dimensions, {} actions, {:?}",
            state_dim,
            action_dim,
            actions.len(),
            config
        );

        Ok(Self {
            tile_code,
            trace: EligibilityTrace::new(size, config.trace_threshold),
            config,
            state_dim,
            actions,
        })
    }

    /// Returns the parameter vector of `(state, action)`.
    pub fn params(&self, state: &[f32], action: &[f32]) -> Result<Vec<f32>, TdrlError> {
        if state.len() != self.state_dim {
            return Err(TdrlError::DimensionMismatch {
                expected: self.state_dim,
                actual: state.len(),
            });
        }
        let mut params = Vec::with_capacity(state.len() + action.len());
        params.extend_from_slice(state);
        params.extend_from_slice(action);
        Ok(params)
    }

    /// Returns the value of `action` in `state`.
    pub fn value(&self, state: &[f32], action: &[f32]) -> Result<f32, TdrlError> {
        let params = self.params(state, action)?;
        self.tile_code.borrow().value(&params)
    }

    /// Returns the index of the best action in `state` and its value.
    ///
    /// Ties go to the action listed first.
    pub fn max_value(&self, state: &[f32]) -> Result<(usize, f32), TdrlError> {
        let mut best: Option<(usize, f32)> = None;
        for (i, a) in self.actions.iter().enumerate() {
            let v = self.value(state, a)?;
            match best {
                Some((_, v_best)) if v <= v_best => {}
                _ => best = Some((i, v)),
            }
        }
        best.ok_or(TdrlError::EmptyActionSet)
    }

    /// Returns the greedy action in `state`.
    pub fn greedy_action(&self, state: &[f32]) -> Result<Vec<f32>, TdrlError> {
        let (i, _) = self.max_value(state)?;
        Ok(self.actions[i].clone())
    }

    /// Updates the value of `(state, action)` towards `reward + γ next_value`
    /// with the learner's own eligibility trace.
    pub(super) fn backup(
        &mut self,
        state: &[f32],
        action: &[f32],
        reward: f32,
        next_value: f32,
    ) -> Result<Backup, TdrlError> {
        let mut trace = mem::take(&mut self.trace);
        let result = self.backup_with(&mut trace, state, action, reward, next_value);
        self.trace = trace;
        result
    }

    /// Same as [`GradientDescentET::backup`] with an external trace.
    pub(super) fn backup_with(
        &self,
        trace: &mut EligibilityTrace,
        state: &[f32],
        action: &[f32],
        reward: f32,
        next_value: f32,
    ) -> Result<Backup, TdrlError> {
        let params = self.params(state, action)?;
        let mut tc = self.tile_code.borrow_mut();
        let active = tc.feature_vector(&params)?;
        let value = tc.value_from_feature_vector(&active)?;
        let td_error = reward + self.config.discount_rate * next_value - value;

        trace.decay(self.config.discount_rate * self.config.lambda);
        trace.accumulate(&active);

        let delta = self.config.step_size * td_error;
        for (i, e) in trace.iter() {
            *tc.at_mut(i)? += delta * e;
        }

        trace!(
            "TD update: value {}, next value {}, reward {}, td error {}",
            value,
            next_value,
            reward,
            td_error
        );

        Ok(Backup { td_error, value })
    }

    /// Returns the diagnostics of a backup of the real experience.
    pub(super) fn record(&self, backup: Backup) -> Record {
        Record::from_slice(&[
            ("td_error", RecordValue::Scalar(backup.td_error)),
            ("value", RecordValue::Scalar(backup.value)),
            (
                "active_traces",
                RecordValue::Scalar(self.trace.num_active() as f32),
            ),
        ])
    }

    /// Clears the eligibility trace if configured to.
    pub fn begin_episode(&mut self) {
        if self.config.reset_trace_on_episode {
            self.trace.clear();
        }
    }

    /// Clears the eligibility trace.
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Returns the eligibility trace of real experience.
    pub fn trace(&self) -> &EligibilityTrace {
        &self.trace
    }

    /// Returns the shared tile code.
    pub fn tile_code(&self) -> SharedTileCode<I> {
        self.tile_code.clone()
    }

    /// Returns the action set.
    pub fn actions(&self) -> &[Vec<f32>] {
        &self.actions
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GradientDescentConfig {
        &self.config
    }

    /// Returns the number of state dimensions.
    pub fn state_dim(&self) -> usize {
        self.state_dim
    }
}
