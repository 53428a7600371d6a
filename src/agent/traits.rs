use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{DqnError, Result};
use crate::loss::LossFunction;

/// The action-value function approximator driven by the training engine.
///
/// `Clone` must produce a value copy: after `let b = a.clone()`, no update to `a` may be
/// observable through `b` and vice versa. The target network relies on this guarantee.
pub trait QFunction: Clone {
    /// Length of the state vectors the function accepts
    fn state_size(&self) -> usize;

    /// Number of discrete actions (length of each action-value row)
    fn num_actions(&self) -> usize;

    /// Evaluate a batch of states (one per row) into a batch of action-value rows.
    ///
    /// Must not change the function: repeated calls on the same input give identical output.
    fn q_values(&self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// One supervised update toward `targets`: forward pass, loss, backward pass, optimizer step.
    ///
    /// Returns the loss measured before the update.
    fn fit(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>, loss: &LossFunction) -> Result<f32>;

    /// Action-values for a single state.
    fn q_values_one(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        let batch = self.q_values(state.insert_axis(Axis(0)))?;
        batch
            .outer_iter()
            .next()
            .map(|row| row.to_owned())
            .ok_or_else(|| DqnError::Numerical("empty action-value batch".to_string()))
    }
}
