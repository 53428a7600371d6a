//! # Activation Functions Module
//!
//! Element-wise non-linearities applied by [`DenseLayer`](crate::layers::DenseLayer).
//!
//! - **ReLU**: `max(0, x)`, the hidden-layer default of the Q-network
//! - **Linear**: identity, used on the output layer so action-values are unbounded
//! - **Tanh**: hyperbolic tangent, outputs between -1 and 1
//! - **LeakyReLU**: ReLU with a small negative slope
//!
//! ```rust
//! use deepq::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
