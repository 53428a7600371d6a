//! Training progress, evaluation summaries and their JSON reports.
pub mod monitor;
pub mod report;
pub mod statistics;

pub use monitor::{TrainingMonitor, TrainingRecord};
pub use report::{load_summary, save_summary, EvaluationReport, EvaluationSummary, RunOutcome, TrainingReport};
pub use statistics::{RewardWindow, Statistics};
