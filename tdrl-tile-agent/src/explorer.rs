//! Exploration strategies.
use serde::{Deserialize, Serialize};
use std::fmt;
use tdrl_core::{Policy, TdrlError};

fn argmax<A>(
    actions: &[A],
    value: &mut dyn FnMut(&A) -> Result<f32, TdrlError>,
) -> Result<usize, TdrlError> {
    let mut best: Option<(usize, f32)> = None;
    for (i, a) in actions.iter().enumerate() {
        let v = value(a)?;
        match best {
            Some((_, v_best)) if v <= v_best => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i).ok_or(TdrlError::EmptyActionSet)
}

/// Epsilon-greedy action selection.
///
/// Epsilon decays linearly from `eps_start` to `eps_final` over `final_step`
/// selections and stays at `eps_final` afterwards. Greedy choices break ties
/// towards the action listed first.
#[derive(Deserialize, Serialize)]
pub struct EpsilonGreedy {
    /// Number of selections so far.
    pub n_opts: usize,

    /// Epsilon at the first selection.
    pub eps_start: f32,

    /// Epsilon after `final_step` selections.
    pub eps_final: f32,

    /// Number of selections over which epsilon decays.
    pub final_step: usize,

    #[serde(skip, default = "fastrand::Rng::new")]
    rng: fastrand::Rng,
}

impl fmt::Debug for EpsilonGreedy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpsilonGreedy")
            .field("n_opts", &self.n_opts)
            .field("eps_start", &self.eps_start)
            .field("eps_final", &self.eps_final)
            .field("final_step", &self.final_step)
            .finish()
    }
}

#[allow(clippy::new_without_default)]
impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new() -> Self {
        Self {
            n_opts: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 100_000,
            rng: fastrand::Rng::new(),
        }
    }

    /// Constructs an explorer with a fixed epsilon.
    pub fn constant(eps: f32, seed: u64) -> Self {
        Self::new().eps_start(eps).eps_final(eps).seed(seed)
    }

    /// Constructs an explorer decaying over `final_step` selections.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            final_step,
            ..Self::new()
        }
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(mut self, v: f32) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f32) -> Self {
        self.eps_start = v;
        self
    }

    /// Reseeds the random generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Returns the current epsilon.
    pub fn eps(&self) -> f32 {
        let d = (self.eps_start - self.eps_final) / (self.final_step.max(1) as f32);
        (self.eps_start - d * self.n_opts as f32).max(self.eps_final)
    }
}

impl<A: Clone> Policy<A> for EpsilonGreedy {
    fn select_action(
        &mut self,
        actions: &[A],
        value: &mut dyn FnMut(&A) -> Result<f32, TdrlError>,
    ) -> Result<A, TdrlError> {
        if actions.is_empty() {
            return Err(TdrlError::EmptyActionSet);
        }
        let eps = self.eps();
        self.n_opts += 1;

        let ix = if self.rng.f32() < eps {
            self.rng.usize(..actions.len())
        } else {
            argmax(actions, value)?
        };
        Ok(actions[ix].clone())
    }
}

/// Softmax (Boltzmann) action selection.
///
/// Action `a` is taken with probability proportional to `exp(Q(a) / temperature)`.
#[derive(Deserialize, Serialize)]
pub struct Softmax {
    temperature: f32,
    #[serde(skip, default = "fastrand::Rng::new")]
    rng: fastrand::Rng,
}

impl fmt::Debug for Softmax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Softmax")
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Softmax {
    /// Constructs softmax explorer. `temperature` must be positive.
    pub fn new(temperature: f32) -> Result<Self, TdrlError> {
        if !(temperature > 0.0 && temperature.is_finite()) {
            return Err(TdrlError::InvalidConfig(format!(
                "temperature must be positive: {}",
                temperature
            )));
        }
        Ok(Self {
            temperature,
            rng: fastrand::Rng::new(),
        })
    }

    /// Reseeds the random generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Returns the temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl<A: Clone> Policy<A> for Softmax {
    fn select_action(
        &mut self,
        actions: &[A],
        value: &mut dyn FnMut(&A) -> Result<f32, TdrlError>,
    ) -> Result<A, TdrlError> {
        if actions.is_empty() {
            return Err(TdrlError::EmptyActionSet);
        }
        let values = actions
            .iter()
            .map(|a| value(a))
            .collect::<Result<Vec<_>, _>>()?;
        let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let weights: Vec<f32> = values
            .iter()
            .map(|v| ((v - max) / self.temperature).exp())
            .collect();
        let total: f32 = weights.iter().sum();

        let w = self.rng.f32() * total;
        let mut sum = 0.0;
        for (i, p) in weights.iter().enumerate() {
            sum += p;
            if sum > w {
                return Ok(actions[i].clone());
            }
        }
        // Rounding left `w` at the end of the range.
        Ok(actions[actions.len() - 1].clone())
    }
}
