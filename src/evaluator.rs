//! Greedy evaluation of a trained Q-network.
use log::info;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::agent::{greedy_action, QFunction};
use crate::env::Environment;
use crate::error::{DqnError, Result};
use crate::metrics::{EvaluationReport, RewardWindow, RunOutcome, Statistics};

/// When an agent counts as having solved a task: an average reward of at least
/// `reward_threshold` over `window_size` consecutive episodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveCriterion {
    pub reward_threshold: f32,
    pub window_size: usize,
}

impl SolveCriterion {
    pub fn new(reward_threshold: f32, window_size: usize) -> Result<Self> {
        let criterion = SolveCriterion { reward_threshold, window_size };
        criterion.validate()?;
        Ok(criterion)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(DqnError::configuration("window_size", "must be at least 1"));
        }
        if self.reward_threshold.is_nan() {
            return Err(DqnError::configuration("reward_threshold", "must be a number"));
        }
        Ok(())
    }
}

/// One evaluation episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    pub episode: usize,
    pub reward: f32,
    /// Mean reward over the episodes currently in the window
    pub running_average: f32,
    /// Window full and running average at or above the threshold
    pub solved: bool,
}

/// Runs `window_size` greedy episodes and yields one [`EvaluationStats`] per episode.
///
/// The evaluator only reads the network; it never updates parameters or stores transitions.
/// The environment must end every episode eventually.
pub struct Evaluator<'a, E, Q> {
    env: &'a mut E,
    network: &'a Q,
    criterion: SolveCriterion,
    window: RewardWindow,
    episode: usize,
    failed: bool,
}

impl<'a, E: Environment, Q: QFunction> Evaluator<'a, E, Q> {
    pub fn new(env: &'a mut E, network: &'a Q, criterion: SolveCriterion) -> Result<Self> {
        criterion.validate()?;
        if network.state_size() != env.observation_size() || network.num_actions() != env.num_actions() {
            return Err(DqnError::configuration(
                "network".to_string(),
                format!(
                    "shape ({} -> {}) does not fit environment ({} -> {})",
                    network.state_size(),
                    network.num_actions(),
                    env.observation_size(),
                    env.num_actions()
                ),
            ));
        }
        Ok(Evaluator {
            env,
            network,
            criterion,
            window: RewardWindow::new(criterion.window_size),
            episode: 0,
            failed: false,
        })
    }

    fn run_episode(&mut self) -> Result<f32> {
        let mut state = self.env.reset()?;
        let mut reward = 0.0;
        loop {
            let action = greedy_action(self.network, state.view())?;
            let step = self.env.step(action)?;
            reward += step.reward;
            if step.done {
                return Ok(reward);
            }
            state = step.next_state;
        }
    }
}

impl<'a, E: Environment, Q: QFunction> Iterator for Evaluator<'a, E, Q> {
    type Item = Result<EvaluationStats>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.episode >= self.criterion.window_size {
            return None;
        }

        let reward = match self.run_episode() {
            Ok(reward) => reward,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };

        let running_average = self.window.push(reward);
        let solved = self.window.is_full() && running_average >= self.criterion.reward_threshold;

        let stats = EvaluationStats {
            episode: self.episode,
            reward,
            running_average,
            solved,
        };
        self.episode += 1;
        Some(Ok(stats))
    }
}

impl<'a, E: Environment, Q: QFunction> FusedIterator for Evaluator<'a, E, Q> {}

/// Evaluate `network` `runs` times and aggregate the per-run verdicts.
///
/// Each run's outcome is its final running average and solve flag. The overall score is the
/// mean of the run averages, and counts as solved when it reaches the threshold.
pub fn evaluate_runs<E: Environment, Q: QFunction>(
    env: &mut E,
    network: &Q,
    criterion: SolveCriterion,
    runs: usize,
) -> Result<EvaluationReport> {
    if runs == 0 {
        return Err(DqnError::configuration("runs", "must be at least 1"));
    }

    let mut outcomes = Vec::with_capacity(runs);
    for run in 0..runs {
        let mut last = None;
        for stats in Evaluator::new(&mut *env, network, criterion)? {
            last = Some(stats?);
        }
        let last = last.ok_or_else(|| DqnError::Numerical("evaluation produced no episodes".to_string()))?;
        info!(
            "run: {} | avg: {:.3} | solved: {}",
            run, last.running_average, last.solved
        );
        outcomes.push(RunOutcome {
            average_reward: last.running_average,
            solved: last.solved,
        });
    }

    let averages: Vec<f32> = outcomes.iter().map(|o| o.average_reward).collect();
    let summary = Statistics::from_slice(&averages);
    let score = RunOutcome {
        average_reward: summary.mean,
        solved: summary.mean >= criterion.reward_threshold,
    };
    info!("total avg reward: {:.3} | solved: {}", score.average_reward, score.solved);

    Ok(EvaluationReport {
        solve_criterion: criterion,
        runs: outcomes,
        score,
        summary,
    })
}
