use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use super::monitor::TrainingRecord;
use super::statistics::Statistics;
use crate::error::Result;
use crate::evaluator::SolveCriterion;
use crate::trainer::DqnConfig;

/// Everything recorded about a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub environment: String,
    pub config: DqnConfig,
    pub solve_criterion: SolveCriterion,
    pub episodes: Vec<TrainingRecord>,
}

impl TrainingReport {
    pub fn new(environment: impl Into<String>, config: DqnConfig, solve_criterion: SolveCriterion) -> Self {
        TrainingReport {
            environment: environment.into(),
            config,
            solve_criterion,
            episodes: Vec::new(),
        }
    }

    /// Best running average over the run, if any episode was recorded.
    pub fn best_average(&self) -> Option<f32> {
        self.episodes
            .iter()
            .map(|e| e.running_average)
            .fold(None, |best, avg| match best {
                Some(b) if b >= avg => Some(b),
                _ => Some(avg),
            })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_json(self, path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path)
    }
}

/// Final running average and verdict of one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub average_reward: f32,
    pub solved: bool,
}

/// Result of [`evaluate_runs`](crate::evaluator::evaluate_runs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub solve_criterion: SolveCriterion,
    pub runs: Vec<RunOutcome>,
    /// Mean of the run averages, solved iff it reaches the threshold
    pub score: RunOutcome,
    /// Spread of the run averages
    pub summary: Statistics,
}

impl EvaluationReport {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_json(self, path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path)
    }
}

/// Evaluation reports keyed by model name.
pub type EvaluationSummary = BTreeMap<String, EvaluationReport>;

pub fn save_summary<P: AsRef<Path>>(summary: &EvaluationSummary, path: P) -> Result<()> {
    save_json(summary, path)
}

pub fn load_summary<P: AsRef<Path>>(path: P) -> Result<EvaluationSummary> {
    load_json(path)
}

fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
