//! Environment boundary.
use ndarray::Array1;
use rand::Rng;

use crate::error::Result;

mod cartpole;
pub use cartpole::CartPole;

/// Outcome of one environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

impl Step {
    pub fn new(next_state: Array1<f32>, reward: f32, done: bool) -> Self {
        Step { next_state, reward, done }
    }
}

/// An episodic environment with a discrete action set.
///
/// Implementations must support any number of `reset`/`step` cycles. Errors they return are
/// propagated by the training and evaluation loops unchanged; nothing is retried.
pub trait Environment {
    /// Dimensionality of the observation vectors
    fn observation_size(&self) -> usize;

    /// Number of discrete actions; actions are `0..num_actions()`
    fn num_actions(&self) -> usize;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Applies `action` to the current episode.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Draws an action uniformly from the action space.
    fn sample_action<R: Rng + ?Sized>(&self, rng: &mut R) -> usize
    where
        Self: Sized,
    {
        rng.gen_range(0..self.num_actions())
    }

    /// Short name used in reports and logs.
    fn name(&self) -> &str {
        "environment"
    }
}
