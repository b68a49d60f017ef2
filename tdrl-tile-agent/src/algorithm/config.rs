//! Configuration of TD learners.
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tdrl_core::TdrlError;

/// Constructs [`Sarsa`](super::Sarsa) and [`QLearning`](super::QLearning).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GradientDescentConfig {
    pub(super) step_size: f32,
    pub(super) discount_rate: f32,
    pub(super) lambda: f32,
    #[serde(default)]
    pub(super) reset_trace_on_episode: bool,
    #[serde(default)]
    pub(super) trace_threshold: f32,
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            discount_rate: 0.99,
            lambda: 0.9,
            reset_trace_on_episode: true,
            trace_threshold: 1e-4,
        }
    }
}

impl GradientDescentConfig {
    /// Sets the step size of weight updates.
    ///
    /// The step size applies to each active tile. With `T` tilings a single
    /// update moves the value by up to `T * step_size * td_error`.
    pub fn step_size(mut self, v: f32) -> Self {
        self.step_size = v;
        self
    }

    /// Sets the discount rate.
    pub fn discount_rate(mut self, v: f32) -> Self {
        self.discount_rate = v;
        self
    }

    /// Sets the decay rate of eligibility traces.
    pub fn lambda(mut self, v: f32) -> Self {
        self.lambda = v;
        self
    }

    /// Clears eligibility traces at the start of each episode if `true`.
    pub fn reset_trace_on_episode(mut self, v: bool) -> Self {
        self.reset_trace_on_episode = v;
        self
    }

    /// Sets the magnitude below which trace entries are dropped.
    pub fn trace_threshold(mut self, v: f32) -> Self {
        self.trace_threshold = v;
        self
    }

    /// Checks the ranges of the parameters.
    pub fn validate(&self) -> Result<(), TdrlError> {
        if !(self.step_size > 0.0 && self.step_size.is_finite()) {
            return Err(TdrlError::InvalidConfig(format!(
                "step size must be positive: {}",
                self.step_size
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(TdrlError::InvalidConfig(format!(
                "discount rate must be in [0, 1]: {}",
                self.discount_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(TdrlError::InvalidConfig(format!(
                "lambda must be in [0, 1]: {}",
                self.lambda
            )));
        }
        if !(self.trace_threshold >= 0.0) {
            return Err(TdrlError::InvalidConfig(format!(
                "trace threshold must be non-negative: {}",
                self.trace_threshold
            )));
        }
        Ok(())
    }

    /// Loads [`GradientDescentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of TD learner from {}", path_.display());
        Ok(b)
    }

    /// Saves [`GradientDescentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of TD learner into {}", path_.display());
        Ok(())
    }
}

/// Constructs [`DynaQ`](super::DynaQ).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DynaQConfig {
    pub(super) learner: GradientDescentConfig,
    pub(super) simulation_iteration_count: usize,
    pub(super) state_transition_greediness: f32,
    pub(super) state_transition_step_size: f32,
    #[serde(default)]
    pub(super) seed: u64,
}

impl Default for DynaQConfig {
    fn default() -> Self {
        Self {
            learner: GradientDescentConfig::default(),
            simulation_iteration_count: 50,
            state_transition_greediness: 1.0,
            state_transition_step_size: 1.0,
            seed: 42,
        }
    }
}

impl DynaQConfig {
    /// Sets the configuration of the underlying Q-learning updates.
    pub fn learner(mut self, v: GradientDescentConfig) -> Self {
        self.learner = v;
        self
    }

    /// Sets the number of simulated updates after each real one.
    pub fn simulation_iteration_count(mut self, v: usize) -> Self {
        self.simulation_iteration_count = v;
        self
    }

    /// Sets the greediness of the transition models.
    pub fn state_transition_greediness(mut self, v: f32) -> Self {
        self.state_transition_greediness = v;
        self
    }

    /// Sets the step size of the transition models.
    pub fn state_transition_step_size(mut self, v: f32) -> Self {
        self.state_transition_step_size = v;
        self
    }

    /// Sets the seed of planning.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Loads [`DynaQConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of Dyna-Q from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DynaQConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of Dyna-Q into {}", path_.display());
        Ok(())
    }
}
