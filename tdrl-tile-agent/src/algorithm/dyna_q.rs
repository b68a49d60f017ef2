//! Dyna-Q with eligibility traces.
use super::{DynaQConfig, EligibilityTrace, GradientDescentET, SharedTileCode};
use crate::{coding::Indexing, model::StateActionTransition};
use log::{debug, info, trace};
use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use tdrl_core::{
    record::{Record, RecordValue},
    Learner, TdrlError, Transition,
};

/// Totally ordered form of a state or an action, used as model key.
pub type Key = Vec<OrderedFloat<f32>>;

fn to_key(v: &[f32]) -> Key {
    v.iter().copied().map(OrderedFloat).collect()
}

fn from_key(k: &[OrderedFloat<f32>]) -> Vec<f32> {
    k.iter().map(|x| x.into_inner()).collect()
}

#[derive(Debug)]
struct PairModel {
    state: Vec<f32>,
    action: Vec<f32>,
    model: StateActionTransition<Key>,

    // Next states whose latest transition from this pair ended the episode.
    terminal_states: HashSet<Key>,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Dyna-Q, Q(λ) on real experience plus planning with learned models.
///
/// Every real transition goes through the following steps:
///
/// 1. A Watkins Q(λ) update of `(s, a)` with the learner's trace.
/// 2. The model of `(s, a)` records `s'` and the reward. Whether reaching
///    `s'` from `(s, a)` ended the episode is remembered per pair, following
///    the latest observation.
/// 3. `simulation_iteration_count` times, a visited pair is drawn uniformly,
///    its model samples `(s'', r'')`, and a one-step Q-learning update of the
///    pair is done with a separate planning trace that is cleared before each
///    simulated update. Bootstrapping from a next state that ended the
///    episode when reached from that pair uses value 0.
///
/// ```mermaid
/// graph LR
///     T[Transition] -->|learn| D[DynaQ]
///     D -->|Q update| W[(TileCode weights)]
///     D -->|update| M[StateActionTransition per pair]
///     M -->|sample s'', r''| P[planning]
///     P -->|Q update, planning trace| W
/// ```
///
/// The real-experience trace is never touched by planning.
#[derive(Debug)]
pub struct DynaQ<I> {
    base: GradientDescentET<I>,
    config: DynaQConfig,
    models: Vec<PairModel>,
    index: HashMap<(Key, Key), usize>,
    planning_trace: EligibilityTrace,
    rng: StdRng,
}

impl<I: Indexing> DynaQ<I> {
    /// Constructs Dyna-Q. `actions` must not be empty.
    pub fn build(
        tile_code: SharedTileCode<I>,
        config: DynaQConfig,
        state_dim: usize,
        actions: Vec<Vec<f32>>,
    ) -> Result<Self, TdrlError> {
        if actions.is_empty() {
            return Err(TdrlError::EmptyActionSet);
        }
        // Surfaces invalid model parameters before the first update.
        StateActionTransition::<Key>::new(
            config.state_transition_greediness,
            config.state_transition_step_size,
        )?;

        let base = GradientDescentET::build(tile_code, config.learner.clone(), state_dim, actions)?;
        let planning_trace = EligibilityTrace::new(base.trace().len(), 0.0);
        info!(
            "Built Dyna-Q with {} simulated updates per step",
            config.simulation_iteration_count
        );

        Ok(Self {
            base,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            models: vec![],
            index: HashMap::new(),
            planning_trace,
        })
    }

    /// Returns the greedy action in `state`.
    pub fn greedy_action(&self, state: &[f32]) -> Result<Vec<f32>, TdrlError> {
        self.base.greedy_action(state)
    }

    /// Returns the model of `(state, action)`, `None` if the pair was never visited.
    pub fn model(&self, state: &[f32], action: &[f32]) -> Option<&StateActionTransition<Key>> {
        self.index
            .get(&(to_key(state), to_key(action)))
            .map(|&i| &self.models[i].model)
    }

    /// Returns the number of visited state-action pairs.
    pub fn num_models(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the latest transition from `(state, action)` to
    /// `next_state` ended the episode.
    pub fn is_terminal(&self, state: &[f32], action: &[f32], next_state: &[f32]) -> bool {
        self.index
            .get(&(to_key(state), to_key(action)))
            .map_or(false, |&i| {
                self.models[i].terminal_states.contains(&to_key(next_state))
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

    fn update_model(&mut self, t: &Transition<Vec<f32>, Vec<f32>>) -> Result<(), TdrlError> {
        let pair = (to_key(&t.state), to_key(&t.action));
        let ix = match self.index.get(&pair) {
            Some(&ix) => ix,
            None => {
                let ix = self.models.len();
                let model = StateActionTransition::new(
                    self.config.state_transition_greediness,
                    self.config.state_transition_step_size,
                )?
                .seed(self.config.seed.wrapping_add(ix as u64 + 1));
                self.models.push(PairModel {
                    state: t.state.clone(),
                    action: t.action.clone(),
                    model,
                    terminal_states: HashSet::new(),
                });
                self.index.insert(pair, ix);
                ix
            }
        };

        let next_state = to_key(&t.next_state);
        let pair = &mut self.models[ix];
        if t.is_terminal {
            pair.terminal_states.insert(next_state.clone());
        } else {
            pair.terminal_states.remove(&next_state);
        }
        pair.model.update(next_state, t.reward);
        Ok(())
    }

    // Returns the TD errors of the simulated updates.
    fn plan(&mut self) -> Result<Vec<f32>, TdrlError> {
        let mut td_errors = Vec::with_capacity(self.config.simulation_iteration_count);
        if self.models.is_empty() {
            return Ok(td_errors);
        }

        for _ in 0..self.config.simulation_iteration_count {
            let ix = self.rng.gen_range(0..self.models.len());
            let pair = &self.models[ix];
            let next_state = pair.model.sample_next_state(&mut self.rng)?;
            let reward = pair.model.reward(&next_state)?;

            let next_value = if pair.terminal_states.contains(&next_state) {
                0.0
            } else {
                self.base.max_value(&from_key(&next_state))?.1
            };

            self.planning_trace.clear();
            let backup = self.base.backup_with(
                &mut self.planning_trace,
                &pair.state,
                &pair.action,
                reward,
                next_value,
            )?;
            trace!(
                "Simulated update of {:?}, {:?}: td error {}",
                pair.state,
                pair.action,
                backup.td_error
            );
            td_errors.push(backup.td_error);
        }

        debug!(
            "Planned {} updates over {} models",
            td_errors.len(),
            self.models.len()
        );
        Ok(td_errors)
    }
}

impl<I: Indexing> Learner<Vec<f32>, Vec<f32>> for DynaQ<I> {
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
            self.base.clear_trace();
        }
        let mut record = self.base.record(backup);

        self.update_model(t)?;
        let td_errors = self.plan()?;

        let mean = if td_errors.is_empty() {
            0.0
        } else {
            td_errors.iter().sum::<f32>() / td_errors.len() as f32
        };
        record.insert("planning_steps", RecordValue::Scalar(td_errors.len() as f32));
        record.insert("mean_planning_td_error", RecordValue::Scalar(mean));
        Ok(record)
    }

    fn value(&self, state: &Vec<f32>, action: &Vec<f32>) -> Result<f32, TdrlError> {
        self.base.value(state, action)
    }

    fn begin_episode(&mut self) {
        self.base.begin_episode();
    }
}
