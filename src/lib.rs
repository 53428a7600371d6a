//! # deepq - Deep Q-Network Training and Evaluation
//!
//! deepq trains a neural action-value function on an episodic, discrete-action environment
//! with the DQN recipe: epsilon-greedy exploration, experience replay and a periodically
//! synchronized target network. A trained network can then be evaluated greedily against a
//! solve criterion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepq::env::CartPole;
//! use deepq::evaluator::{evaluate_runs, SolveCriterion};
//! use deepq::trainer::{DqnConfig, Trainer};
//!
//! # fn main() -> deepq::error::Result<()> {
//! let config = DqnConfig::default().steps(50_000);
//! let mut trainer = Trainer::new(config, CartPole::new(Some(77)))?;
//! for stats in &mut trainer {
//!     let stats = stats?;
//!     println!("episode {} reward {}", stats.episode, stats.reward);
//! }
//!
//! let network = trainer.into_network();
//! let criterion = SolveCriterion::new(195.0, 100)?;
//! let report = evaluate_runs(&mut CartPole::new(None), &network, criterion, 3)?;
//! println!("score {} solved {}", report.score.average_reward, report.score.solved);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions
//! - [`agent`] - Q-function boundary, target network, TD targets and action selection
//! - [`env`] - Environment trait and the cart-pole task
//! - [`error`] - Error types and result handling
//! - [`evaluator`] - Greedy evaluation against a solve criterion
//! - [`exploration`] - Linear epsilon schedule
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Regression losses
//! - [`metrics`] - Training monitor, statistics and JSON reports
//! - [`network`] - Feed-forward Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Experience replay
//! - [`trainer`] - Training configuration and loop

pub mod activations;
pub mod agent;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod exploration;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod trainer;

#[cfg(test)]
mod tests;
