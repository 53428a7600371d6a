// Stubs shared by the unit tests
use ndarray::{array, Array1, Array2, ArrayView2};

use crate::env::{Environment, Step};
use crate::error::{DqnError, Result};
use crate::loss::LossFunction;
use crate::agent::QFunction;

/// Returns the same action-value row for every state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantQ {
    pub state_size: usize,
    pub values: Array1<f32>,
    pub fits: usize,
}

impl ConstantQ {
    pub fn new(state_size: usize, values: Array1<f32>) -> Self {
        ConstantQ { state_size, values, fits: 0 }
    }
}

impl QFunction for ConstantQ {
    fn state_size(&self) -> usize {
        self.state_size
    }

    fn num_actions(&self) -> usize {
        self.values.len()
    }

    fn q_values(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut out = Array2::zeros((states.nrows(), self.values.len()));
        for mut row in out.rows_mut() {
            row.assign(&self.values);
        }
        Ok(out)
    }

    fn fit(&mut self, _states: ArrayView2<f32>, _targets: ArrayView2<f32>, _loss: &LossFunction) -> Result<f32> {
        self.fits += 1;
        self.values += 1.0;
        Ok(0.5)
    }
}

/// One-dimensional environment whose episodes last `episode_len` steps and pay `reward` per step.
#[derive(Debug, Clone)]
pub struct ScriptedEnv {
    pub episode_len: usize,
    pub reward: f32,
    pub steps: usize,
    pub calls: usize,
    pub resets: usize,
    pub fail_at: Option<usize>,
}

impl ScriptedEnv {
    pub fn new(episode_len: usize, reward: f32) -> Self {
        ScriptedEnv {
            episode_len,
            reward,
            steps: 0,
            calls: 0,
            resets: 0,
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }
}

impl Environment for ScriptedEnv {
    fn observation_size(&self) -> usize {
        1
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.steps = 0;
        self.resets += 1;
        Ok(array![0.0])
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= 2 {
            return Err(DqnError::InvalidAction { action, num_actions: 2 });
        }
        if self.fail_at == Some(self.calls) {
            return Err(DqnError::Environment("scripted failure".to_string()));
        }
        self.calls += 1;
        self.steps += 1;
        let done = self.steps >= self.episode_len;
        Ok(Step::new(array![self.steps as f32 / 10.0], self.reward, done))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
