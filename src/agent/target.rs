use ndarray::{Array2, ArrayView2};

use super::traits::QFunction;
use crate::error::{DqnError, Result};

/// Frozen value copy of the online network used to compute bootstrap values.
///
/// The copy is taken with [`Clone`], which [`QFunction`] requires to be a deep value copy,
/// so updates to the online network never leak into the target. The only way to change the
/// target is [`sync`](Self::sync), which replaces it wholesale.
#[derive(Debug, Clone)]
pub struct TargetNetwork<Q> {
    network: Q,
    syncs: usize,
}

impl<Q: QFunction> TargetNetwork<Q> {
    /// Snapshot `online` before any gradient update has been applied to it.
    pub fn new(online: &Q) -> Self {
        TargetNetwork {
            network: online.clone(),
            syncs: 0,
        }
    }

    /// Replace the snapshot with a fresh copy of `online`.
    pub fn sync(&mut self, online: &Q) {
        self.network = online.clone();
        self.syncs += 1;
    }

    pub fn q_values(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.network.q_values(states)
    }

    pub fn network(&self) -> &Q {
        &self.network
    }

    /// Number of refreshes since construction
    pub fn sync_count(&self) -> usize {
        self.syncs
    }
}

/// Counts completed learning steps and fires once every `every` of them.
///
/// The counter restarts from zero after each firing, so the cadence never depends on
/// modulo arithmetic over a global step index.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSchedule {
    every: usize,
    since_last: usize,
}

impl SyncSchedule {
    pub fn new(every: usize) -> Result<Self> {
        if every == 0 {
            return Err(DqnError::configuration("target_update_freq", "must be at least 1"));
        }
        Ok(SyncSchedule { every, since_last: 0 })
    }

    /// Record one completed learning step; true when the target is due for a refresh.
    pub fn tick(&mut self) -> bool {
        self.since_last += 1;
        if self.since_last == self.every {
            self.since_last = 0;
            true
        } else {
            false
        }
    }

    pub fn every(&self) -> usize {
        self.every
    }

    /// Learning steps completed since the last refresh
    pub fn since_last(&self) -> usize {
        self.since_last
    }
}
