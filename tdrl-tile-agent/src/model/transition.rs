//! Next-state and reward model of one state-action pair.
use log::{error, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{collections::BTreeMap, fmt::Debug};
use tdrl_core::TdrlError;

/// Learns which next states follow a fixed state-action pair.
///
/// Each observed next state carries a frequency and the most recent reward.
/// On [`StateActionTransition::update`] the frequency of the observed state
/// moves towards 1 and the frequencies of all other states decay towards 0,
/// both by `step_size`. The frequencies are therefore independent smoothed
/// estimates and need not sum to one.
///
/// Next states are sampled greedily with probability `greedy`, i.e.,
/// proportional to their frequencies, and uniformly at random otherwise.
/// States are scanned in ascending order of their keys, so sampling is
/// deterministic for a fixed random draw.
#[derive(Debug, Clone, PartialEq)]
pub struct StateActionTransition<S: Ord> {
    frequency: BTreeMap<S, f32>,
    reward: BTreeMap<S, f32>,
    greedy: f32,
    step_size: f32,
    seed: u64,
    n_updates: u64,
}

fn check_greedy(greedy: f32) -> Result<(), TdrlError> {
    if !(0.0..=1.0).contains(&greedy) {
        return Err(TdrlError::InvalidConfig(format!(
            "greediness must be in [0, 1]: {}",
            greedy
        )));
    }
    Ok(())
}

fn check_step_size(step_size: f32) -> Result<(), TdrlError> {
    if !(step_size > 0.0 && step_size <= 1.0) {
        return Err(TdrlError::InvalidConfig(format!(
            "step size of transition model must be in (0, 1]: {}",
            step_size
        )));
    }
    Ok(())
}

impl<S: Ord + Clone + Debug> StateActionTransition<S> {
    /// Constructs an empty model.
    pub fn new(greedy: f32, step_size: f32) -> Result<Self, TdrlError> {
        check_greedy(greedy)?;
        check_step_size(step_size)?;
        Ok(Self {
            frequency: BTreeMap::new(),
            reward: BTreeMap::new(),
            greedy,
            step_size,
            seed: 42,
            n_updates: 0,
        })
    }

    /// Sets the seed used by [`StateActionTransition::next_state`].
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Records that `next_state` followed with `reward`.
    pub fn update(&mut self, next_state: S, reward: f32) {
        if !self.frequency.contains_key(&next_state) {
            self.frequency.insert(next_state.clone(), 0.0);
            self.reward.insert(next_state.clone(), 0.0);
        }

        let step_size = self.step_size;
        for (s, f) in self.frequency.iter_mut() {
            let target = if *s == next_state { 1.0 } else { 0.0 };
            *f += step_size * (target - *f);
        }

        // The reward tracks the most recent observation.
        if let Some(r) = self.reward.get_mut(&next_state) {
            *r += 1.0 * (reward - *r);
        }

        self.n_updates += 1;
        trace!("Updated transition model with {:?}, reward {}", next_state, reward);
    }

    /// Returns the reward of the transition to `state`.
    pub fn reward(&self, state: &S) -> Result<f32, TdrlError> {
        self.reward
            .get(state)
            .copied()
            .ok_or_else(|| TdrlError::UnmodeledState(format!("{:?}", state)))
    }

    /// Samples a next state.
    ///
    /// The draw depends only on the seed and the number of updates so far,
    /// so repeated calls between two updates return the same state.
    pub fn next_state(&self) -> Result<S, TdrlError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.n_updates));
        self.sample_next_state(&mut rng)
    }

    /// Samples a next state with the given random generator.
    pub fn sample_next_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<S, TdrlError> {
        if self.frequency.is_empty() {
            return Err(TdrlError::EmptyModel);
        }

        let r: f32 = rng.gen();
        if r > self.greedy {
            let ix = rng.gen_range(0..self.frequency.len());
            return self
                .frequency
                .keys()
                .nth(ix)
                .cloned()
                .ok_or_else(|| TdrlError::InconsistentModel(format!("no state at {}", ix)));
        }

        let total = self.frequency.values().fold(0.0, |sum, f| sum + f);
        if !(total > 0.0) {
            error!("Frequencies of transition model sum to {}", total);
            return Err(TdrlError::InconsistentModel(format!(
                "frequencies sum to {}",
                total
            )));
        }

        let w = rng.gen_range(0.0..total);
        let mut sum = 0.0;
        for (s, f) in self.frequency.iter() {
            sum += f;
            if sum > w {
                return Ok(s.clone());
            }
        }

        error!(
            "Weighted scan exhausted: draw {}, total {}, states {:?}",
            w,
            total,
            self.frequency.keys().collect::<Vec<_>>()
        );
        Err(TdrlError::InconsistentModel(format!(
            "no state reached cumulative frequency {} of {}",
            w, total
        )))
    }

    /// Returns the frequency of `state`, `None` if it was never observed.
    pub fn frequency(&self, state: &S) -> Option<f32> {
        self.frequency.get(state).copied()
    }

    /// Returns the observed next states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.frequency.keys()
    }

    /// Returns the number of observed next states.
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Returns `true` if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Returns the probability of sampling proportionally to frequency.
    pub fn greedy(&self) -> f32 {
        self.greedy
    }

    /// Sets the greediness, which must be in `[0, 1]`.
    pub fn set_greedy(&mut self, greedy: f32) -> Result<(), TdrlError> {
        check_greedy(greedy)?;
        self.greedy = greedy;
        Ok(())
    }

    /// Returns the step size of frequency updates.
    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    /// Sets the step size, which must be in `(0, 1]`.
    pub fn set_step_size(&mut self, step_size: f32) -> Result<(), TdrlError> {
        check_step_size(step_size)?;
        self.step_size = step_size;
        Ok(())
    }
}
