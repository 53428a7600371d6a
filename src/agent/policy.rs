use ndarray::ArrayView1;
use rand::Rng;

use super::traits::QFunction;
use crate::error::{DqnError, Result};

/// Index of the largest value; ties go to the lowest index and NaN entries never win.
pub fn argmax(values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or_else(|| DqnError::Numerical("No valid action-values".to_string()))
}

/// The action with the highest estimated value in `state`.
pub fn greedy_action<Q: QFunction>(network: &Q, state: ArrayView1<f32>) -> Result<usize> {
    let q_values = network.q_values_one(state)?;
    argmax(q_values.view())
}

/// With probability `epsilon` a uniformly random action, otherwise the greedy one.
pub fn epsilon_greedy<Q: QFunction, R: Rng + ?Sized>(
    network: &Q,
    state: ArrayView1<f32>,
    epsilon: f32,
    rng: &mut R,
) -> Result<usize> {
    if rng.gen::<f32>() < epsilon {
        Ok(rng.gen_range(0..network.num_actions()))
    } else {
        greedy_action(network, state)
    }
}
