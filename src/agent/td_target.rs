use ndarray::{Array1, Array2, Axis, Zip};

use super::target::TargetNetwork;
use super::traits::QFunction;
use crate::error::{DqnError, Result};
use crate::replay_buffer::Transition;

/// A sampled batch of transitions stacked into arrays, one transition per row.
#[derive(Debug, Clone)]
pub struct Minibatch {
    pub states: Array2<f32>,
    pub actions: Vec<usize>,
    pub next_states: Array2<f32>,
    pub rewards: Array1<f32>,
    /// 1.0 for non-terminal transitions, 0.0 for terminal ones
    pub not_done: Array1<f32>,
}

impl Minibatch {
    pub fn from_transitions(transitions: &[&Transition]) -> Result<Self> {
        let first = transitions.first().ok_or(DqnError::InsufficientData {
            requested: 1,
            available: 0,
        })?;
        let batch_size = transitions.len();
        let state_size = first.state.len();

        let mut states = Array2::zeros((batch_size, state_size));
        let mut next_states = Array2::zeros((batch_size, state_size));
        let mut actions = Vec::with_capacity(batch_size);
        let mut rewards = Array1::zeros(batch_size);
        let mut not_done = Array1::zeros(batch_size);

        for (i, transition) in transitions.iter().enumerate() {
            if transition.state.len() != state_size || transition.next_state.len() != state_size {
                return Err(DqnError::dimension_mismatch(
                    format!("state of length {}", state_size),
                    format!(
                        "states of length {} and {}",
                        transition.state.len(),
                        transition.next_state.len()
                    ),
                ));
            }
            states.row_mut(i).assign(&transition.state);
            next_states.row_mut(i).assign(&transition.next_state);
            actions.push(transition.action);
            rewards[i] = transition.reward;
            not_done[i] = if transition.done { 0.0 } else { 1.0 };
        }

        Ok(Minibatch { states, actions, next_states, rewards, not_done })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Regression targets for one DQN update.
///
/// Every row starts as the online network's own prediction for the state, so untaken actions
/// contribute no error. The taken action's entry becomes
/// `reward + discount * max_a target(next_state)[a] * not_done`; the mask multiplies only the
/// bootstrap term, so a terminal transition's target is exactly its reward.
pub fn build_td_targets<Q: QFunction>(
    online: &Q,
    target: &TargetNetwork<Q>,
    batch: &Minibatch,
    discount: f32,
) -> Result<Array2<f32>> {
    let num_actions = online.num_actions();
    let mut targets = online.q_values(batch.states.view())?;
    let next_values = target.q_values(batch.next_states.view())?;

    if targets.dim() != (batch.len(), num_actions) || next_values.dim() != (batch.len(), num_actions) {
        return Err(DqnError::dimension_mismatch(
            format!("({}, {})", batch.len(), num_actions),
            format!("{:?} and {:?}", targets.dim(), next_values.dim()),
        ));
    }

    let max_next = next_values.map_axis(Axis(1), |row| {
        row.iter().fold(f32::NEG_INFINITY, |max, &v| max.max(v))
    });
    // A zero mask drops the bootstrap term outright, so `inf * 0` never leaks a NaN into a terminal target.
    let bootstrapped = Zip::from(&batch.rewards)
        .and(&max_next)
        .and(&batch.not_done)
        .map_collect(|&reward, &max, &mask| {
            if mask == 0.0 {
                reward
            } else {
                reward + discount * max * mask
            }
        });

    for (i, &action) in batch.actions.iter().enumerate() {
        if action >= num_actions {
            return Err(DqnError::InvalidAction { action, num_actions });
        }
        targets[[i, action]] = bootstrapped[i];
    }

    Ok(targets)
}
