//! Train a Q-network against an [`Environment`].
mod config;

use log::{debug, info};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::agent::{build_td_targets, epsilon_greedy, Minibatch, QFunction, SyncSchedule, TargetNetwork};
use crate::env::Environment;
use crate::error::{DqnError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::OptimizerWrapper;
use crate::replay_buffer::{ReplayBuffer, Transition};
pub use config::DqnConfig;

/// Summary of one finished episode during the learning phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Episode index, counting warm-up episodes
    pub episode: usize,
    /// Global step at which the episode ended
    pub step: usize,
    /// Exploration probability in force at that step
    pub epsilon: f32,
    /// Mean loss over the episode's learning steps
    pub mean_loss: f32,
    /// Undiscounted episode return
    pub reward: f32,
}

/// Which half of the run the trainer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Filling the replay buffer with uniformly random actions
    WarmUp,
    /// Epsilon-greedy acting with one minibatch update per step
    Learning,
}

/// DQN training loop as a pull-based iterator over finished episodes.
///
/// # Training loop
///
/// The run lasts `total_steps = steps + replay_min` environment steps, indexed by the
/// global step `t`.
///
/// 1. While `t < replay_min - 1` the trainer is warming up: actions are uniformly random and
///    nothing is learned.
/// 2. From `t = replay_min - 1` on (the replay buffer then holds `replay_min` transitions after
///    the step's append), each step also samples `replay_batch` transitions, builds TD targets
///    against the target network and applies one optimizer step. Epsilon follows the
///    [`ExplorationSchedule`](crate::exploration::ExplorationSchedule) indexed by the
///    learning-step count `t - (replay_min - 1)`.
/// 3. The target network is refreshed after every `target_update_freq` learning steps.
/// 4. When an episode ends the environment is reset. If the trainer is learning, the episode's
///    [`TrainingStats`] is yielded.
///
/// Each call to `next` runs steps until one learning-phase episode completes. The iterator
/// ends after `total_steps`; a trailing unfinished episode is not reported. Dropping the
/// iterator early leaves the trainer in a consistent state that can be resumed by pulling
/// again. An environment or network error is yielded once, after which the iterator is exhausted.
pub struct Trainer<E, Q = NeuralNetwork> {
    config: DqnConfig,
    env: E,
    online: Q,
    target: TargetNetwork<Q>,
    replay: ReplayBuffer,
    sync_schedule: SyncSchedule,
    rng: StdRng,
    state: Array1<f32>,
    global_step: usize,
    episode: usize,
    episode_reward: f32,
    episode_losses: Vec<f32>,
    learning_steps: usize,
    failed: bool,
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl<E: Environment> Trainer<E, NeuralNetwork> {
    /// Builds a trainer with a freshly initialized single-hidden-layer Q-network and Adam.
    pub fn new(config: DqnConfig, env: E) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let network = NeuralNetwork::q_network(
            env.observation_size(),
            config.hidden_size,
            env.num_actions(),
            OptimizerWrapper::adam(config.learning_rate),
            &mut rng,
        )?;
        Self::build(config, env, network, rng)
    }
}

impl<E: Environment, Q: QFunction> Trainer<E, Q> {
    /// Builds a trainer around an existing action-value function.
    pub fn with_network(config: DqnConfig, env: E, network: Q) -> Result<Self> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Self::build(config, env, network, rng)
    }

    fn build(config: DqnConfig, mut env: E, online: Q, rng: StdRng) -> Result<Self> {
        if online.state_size() != env.observation_size() {
            return Err(DqnError::configuration(
                "network".to_string(),
                format!(
                    "takes states of size {}, environment observes {}",
                    online.state_size(),
                    env.observation_size()
                ),
            ));
        }
        if online.num_actions() != env.num_actions() || env.num_actions() == 0 {
            return Err(DqnError::configuration(
                "network".to_string(),
                format!(
                    "outputs {} action-values, environment has {} actions",
                    online.num_actions(),
                    env.num_actions()
                ),
            ));
        }

        let target = TargetNetwork::new(&online);
        let replay = ReplayBuffer::new(config.replay_max)?;
        let sync_schedule = SyncSchedule::new(config.target_update_freq)?;
        let state = env.reset()?;

        info!(
            "training on {} for {} steps ({} warm-up)",
            env.name(),
            config.total_steps(),
            config.replay_min
        );

        Ok(Trainer {
            config,
            env,
            online,
            target,
            replay,
            sync_schedule,
            rng,
            state,
            global_step: 0,
            episode: 0,
            episode_reward: 0.0,
            episode_losses: Vec::new(),
            learning_steps: 0,
            failed: false,
        })
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn online(&self) -> &Q {
        &self.online
    }

    pub fn target(&self) -> &TargetNetwork<Q> {
        &self.target
    }

    pub fn replay_buffer(&self) -> &ReplayBuffer {
        &self.replay
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Environment steps taken so far
    pub fn global_step(&self) -> usize {
        self.global_step
    }

    pub fn total_steps(&self) -> usize {
        self.config.total_steps()
    }

    /// Episodes finished so far, warm-up included
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Minibatch updates applied so far
    pub fn learning_steps(&self) -> usize {
        self.learning_steps
    }

    pub fn phase(&self) -> Phase {
        match self.learning_step_index() {
            Some(_) => Phase::Learning,
            None => Phase::WarmUp,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.failed || self.global_step >= self.total_steps()
    }

    /// Consumes the trainer and returns the online network.
    pub fn into_network(self) -> Q {
        self.online
    }

    // `replay_min >= 1` is guaranteed by validation.
    fn learning_step_index(&self) -> Option<usize> {
        self.global_step.checked_sub(self.config.replay_min - 1)
    }

    fn env_step(&mut self) -> Result<Option<TrainingStats>> {
        let t = self.global_step;
        let learning_step = self.learning_step_index();

        let (epsilon, action) = match learning_step {
            None => (1.0, self.env.sample_action(&mut self.rng)),
            Some(k) => {
                if k == 0 {
                    info!("warm-up complete at step {}, learning starts", t);
                }
                let epsilon = self.config.exploration.epsilon(k);
                let action = epsilon_greedy(&self.online, self.state.view(), epsilon, &mut self.rng)?;
                (epsilon, action)
            }
        };

        let step = self.env.step(action)?;
        self.replay.add(Transition {
            state: self.state.clone(),
            action,
            next_state: step.next_state.clone(),
            reward: step.reward,
            done: step.done,
        });
        self.episode_reward += step.reward;

        if learning_step.is_some() {
            let loss = self.learn()?;
            self.episode_losses.push(loss);
        }
        self.global_step += 1;

        if !step.done {
            self.state = step.next_state;
            return Ok(None);
        }

        let stats = learning_step.map(|_| TrainingStats {
            episode: self.episode,
            step: t,
            epsilon,
            mean_loss: mean(&self.episode_losses),
            reward: self.episode_reward,
        });
        self.episode_losses.clear();
        self.episode_reward = 0.0;
        self.episode += 1;
        self.state = self.env.reset()?;
        Ok(stats)
    }

    fn learn(&mut self) -> Result<f32> {
        let batch = self.replay.sample(self.config.replay_batch, &mut self.rng)?;
        let minibatch = Minibatch::from_transitions(&batch)?;
        let targets = build_td_targets(&self.online, &self.target, &minibatch, self.config.discount)?;
        let loss = self.online.fit(minibatch.states.view(), targets.view(), &self.config.loss)?;

        self.learning_steps += 1;
        if self.sync_schedule.tick() {
            self.target.sync(&self.online);
            debug!(
                "target network synced after {} learning steps (sync #{})",
                self.learning_steps,
                self.target.sync_count()
            );
        }
        Ok(loss)
    }
}

impl<E: Environment, Q: QFunction> Iterator for Trainer<E, Q> {
    type Item = Result<TrainingStats>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.is_finished() {
            match self.env_step() {
                Ok(Some(stats)) => return Some(Ok(stats)),
                Ok(None) => {}
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl<E: Environment, Q: QFunction> FusedIterator for Trainer<E, Q> {}

// Emitted episodes always contain at least one learning step.
fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}
