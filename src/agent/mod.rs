//! # Q-Learning Building Blocks
//!
//! The pieces the [`Trainer`](crate::trainer::Trainer) composes into a DQN update:
//!
//! - [`QFunction`]: the boundary to the action-value approximator
//! - [`TargetNetwork`] and [`SyncSchedule`]: the frozen bootstrap network and its refresh cadence
//! - [`Minibatch`] and [`build_td_targets`]: one-step TD regression targets with terminal masking
//! - [`greedy_action`] and [`epsilon_greedy`]: action selection
//!
//! ## Example
//!
//! ```rust
//! use deepq::agent::{build_td_targets, Minibatch, QFunction, TargetNetwork};
//! use deepq::network::NeuralNetwork;
//! use deepq::optimizer::OptimizerWrapper;
//! use deepq::replay_buffer::Transition;
//! use ndarray::array;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let online = NeuralNetwork::q_network(2, 8, 2, OptimizerWrapper::adam(1e-3), &mut rng).unwrap();
//! let target = TargetNetwork::new(&online);
//!
//! let transition = Transition {
//!     state: array![0.1, -0.2],
//!     action: 1,
//!     next_state: array![0.2, -0.1],
//!     reward: 1.0,
//!     done: true,
//! };
//! let batch = Minibatch::from_transitions(&[&transition]).unwrap();
//! let targets = build_td_targets(&online, &target, &batch, 0.99).unwrap();
//! assert_eq!(targets[[0, 1]], 1.0);
//! ```

pub mod policy;
pub mod target;
pub mod td_target;
pub mod traits;

pub use policy::{argmax, epsilon_greedy, greedy_action};
pub use target::{SyncSchedule, TargetNetwork};
pub use td_target::{build_td_targets, Minibatch};
pub use traits::QFunction;
