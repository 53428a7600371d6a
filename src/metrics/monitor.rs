use log::info;
use serde::{Deserialize, Serialize};

use super::statistics::RewardWindow;
use crate::evaluator::SolveCriterion;
use crate::trainer::TrainingStats;

/// One training episode as it appears in a [`TrainingReport`](super::TrainingReport).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub episode: usize,
    pub step: usize,
    pub epsilon: f32,
    pub mean_loss: f32,
    pub reward: f32,
    /// Mean reward over the last `window_size` learning-phase episodes
    pub running_average: f32,
    /// The running average beat every earlier one
    pub new_best: bool,
}

/// Tracks progress across the episodes a [`Trainer`](crate::trainer::Trainer) yields.
pub struct TrainingMonitor {
    window: RewardWindow,
    best_average: f32,
    total_steps: usize,
    print_freq: usize,
    records: Vec<TrainingRecord>,
}

impl TrainingMonitor {
    pub fn new(criterion: SolveCriterion, total_steps: usize, print_freq: usize) -> Self {
        TrainingMonitor {
            window: RewardWindow::new(criterion.window_size),
            best_average: f32::NEG_INFINITY,
            total_steps: total_steps.max(1),
            print_freq,
            records: Vec::new(),
        }
    }

    /// Records an episode. Logs a progress line when the running average sets a new best, or
    /// every `print_freq` episodes (never, if `print_freq` is 0).
    pub fn observe(&mut self, stats: &TrainingStats) -> TrainingRecord {
        let running_average = self.window.push(stats.reward);
        let new_best = running_average > self.best_average;
        if new_best {
            self.best_average = running_average;
        }

        let record = TrainingRecord {
            episode: stats.episode,
            step: stats.step,
            epsilon: stats.epsilon,
            mean_loss: stats.mean_loss,
            reward: stats.reward,
            running_average,
            new_best,
        };

        let periodic = self.print_freq > 0 && stats.episode % self.print_freq == 0;
        if new_best || periodic {
            info!(
                "[TRAINING ({:.2}%)] e:{} | t:{} | eps:{:.3} | l:{:.3} | r:{:.3} | avg:{:.3}{}",
                100.0 * (stats.step + 1) as f64 / self.total_steps as f64,
                stats.episode,
                stats.step,
                stats.epsilon,
                stats.mean_loss,
                stats.reward,
                running_average,
                if new_best { " | *R*" } else { "" }
            );
        }

        self.records.push(record);
        record
    }

    /// Highest running average seen so far
    pub fn best_average(&self) -> Option<f32> {
        if self.records.is_empty() {
            None
        } else {
            Some(self.best_average)
        }
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TrainingRecord> {
        self.records
    }
}
