//! Configuration of [`Trainer`](super::Trainer).
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

use crate::error::{DqnError, Result};
use crate::exploration::ExplorationSchedule;
use crate::loss::LossFunction;

/// Hyperparameters of a DQN training run.
///
/// The defaults are the CartPole settings: a 512-unit hidden layer, 400k learning steps
/// after a 2000-step warm-up, epsilon decaying from 1.0 to 0.1 over the first 10% of training.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnConfig {
    /// Seed for action sampling, replay sampling and weight initialization.
    pub seed: Option<u64>,

    /// Width of the Q-network's single hidden layer.
    pub hidden_size: usize,

    /// Discount factor applied to bootstrapped values.
    pub discount: f32,

    /// Environment steps to run after the warm-up period.
    pub steps: usize,

    /// Adam learning rate.
    pub learning_rate: f32,

    /// Epsilon schedule, indexed by learning step.
    pub exploration: ExplorationSchedule,

    /// Transitions collected with random actions before learning starts.
    pub replay_min: usize,

    /// Replay buffer capacity.
    pub replay_max: usize,

    /// Minibatch size of each learning step.
    pub replay_batch: usize,

    /// Learning steps between target network refreshes.
    pub target_update_freq: usize,

    /// Regression loss between predictions and TD targets.
    pub loss: LossFunction,
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            seed: Some(77),
            hidden_size: 512,
            discount: 0.99,
            steps: 400_000,
            learning_rate: 1e-3,
            exploration: ExplorationSchedule::default(),
            replay_min: 2000,
            replay_max: 50_000,
            replay_batch: 32,
            target_update_freq: 500,
            loss: LossFunction::L2,
        }
    }
}

impl DqnConfig {
    /// Sets the random seed; `None` seeds from entropy.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the hidden layer width.
    pub fn hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    /// Sets the discount factor.
    pub fn discount(mut self, discount: f32) -> Self {
        self.discount = discount;
        self
    }

    /// Sets the number of post-warm-up steps.
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the exploration schedule.
    pub fn exploration(mut self, exploration: ExplorationSchedule) -> Self {
        self.exploration = exploration;
        self
    }

    /// Sets the warm-up size, buffer capacity and minibatch size.
    pub fn replay(mut self, replay_min: usize, replay_max: usize, replay_batch: usize) -> Self {
        self.replay_min = replay_min;
        self.replay_max = replay_max;
        self.replay_batch = replay_batch;
        self
    }

    /// Sets the target refresh interval in learning steps.
    pub fn target_update_freq(mut self, target_update_freq: usize) -> Self {
        self.target_update_freq = target_update_freq;
        self
    }

    /// Sets the loss function.
    pub fn loss(mut self, loss: LossFunction) -> Self {
        self.loss = loss;
        self
    }

    /// Total environment steps of a run: warm-up plus learning.
    pub fn total_steps(&self) -> usize {
        self.steps + self.replay_min
    }

    /// Checks every setup-time invariant.
    pub fn validate(&self) -> Result<()> {
        if self.hidden_size == 0 {
            return Err(DqnError::configuration("hidden_size", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(DqnError::configuration(
                "discount".to_string(),
                format!("must be in [0, 1], got {}", self.discount),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(DqnError::configuration(
                "learning_rate".to_string(),
                format!("must be positive, got {}", self.learning_rate),
            ));
        }
        self.exploration.validate()?;
        if self.replay_batch == 0 {
            return Err(DqnError::configuration("replay_batch", "must be at least 1"));
        }
        if self.replay_min < self.replay_batch {
            return Err(DqnError::configuration(
                "replay_min".to_string(),
                format!(
                    "warm-up of {} transitions cannot fill a minibatch of {}",
                    self.replay_min, self.replay_batch
                ),
            ));
        }
        if self.replay_max < self.replay_min {
            return Err(DqnError::configuration(
                "replay_max".to_string(),
                format!(
                    "capacity {} is smaller than the warm-up size {}",
                    self.replay_max, self.replay_min
                ),
            ));
        }
        if self.target_update_freq == 0 {
            return Err(DqnError::configuration("target_update_freq", "must be at least 1"));
        }
        if let LossFunction::Huber { delta } = self.loss {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(DqnError::configuration("loss.delta", "must be positive"));
            }
        }
        Ok(())
    }

    /// Constructs [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`DqnConfig`] as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
