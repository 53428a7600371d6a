use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Environment, Step};
use crate::error::{DqnError, Result};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const HALF_POLE_LENGTH: f32 = 0.5;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;
const X_THRESHOLD: f32 = 2.4;
// 12 degrees
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;

/// Cart-pole balancing task with the classic episode limits.
///
/// Observations are `[x, x_dot, theta, theta_dot]`. Action 0 pushes the cart left and action 1
/// pushes it right. Every step, including the terminating one, yields a reward of 1. An
/// episode ends when the pole tilts past 12°, the cart leaves ±2.4, or `max_steps` is reached.
#[derive(Debug, Clone)]
pub struct CartPole {
    state: [f32; 4],
    steps: usize,
    max_steps: usize,
    done: bool,
    rng: StdRng,
}

impl CartPole {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        CartPole {
            state: [0.0; 4],
            steps: 0,
            max_steps: 200,
            // Stepping before the first reset is an error.
            done: true,
            rng,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    fn observation(&self) -> Array1<f32> {
        array![self.state[0], self.state[1], self.state[2], self.state[3]]
    }
}

impl Environment for CartPole {
    fn observation_size(&self) -> usize {
        4
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        for value in self.state.iter_mut() {
            *value = self.rng.gen_range(-0.05..0.05);
        }
        self.steps = 0;
        self.done = false;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= 2 {
            return Err(DqnError::InvalidAction { action, num_actions: 2 });
        }
        if self.done {
            return Err(DqnError::Environment(
                "step() called on a finished episode; call reset() first".to_string(),
            ));
        }

        let [x, x_dot, theta, theta_dot] = self.state;
        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let cos_theta = theta.cos();
        let sin_theta = theta.sin();
        let total_mass = MASS_CART + MASS_POLE;
        let pole_mass_length = MASS_POLE * HALF_POLE_LENGTH;

        let temp = (force + pole_mass_length * theta_dot * theta_dot * sin_theta) / total_mass;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (HALF_POLE_LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.steps += 1;

        self.done = self.state[0].abs() > X_THRESHOLD
            || self.state[2].abs() > THETA_THRESHOLD
            || self.steps >= self.max_steps;

        Ok(Step::new(self.observation(), 1.0, self.done))
    }

    fn name(&self) -> &str {
        "CartPole-v0"
    }
}
