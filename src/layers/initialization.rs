use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },
}

impl WeightInit {
    /// Draw a `(fan_in, fan_out)` weight matrix from `rng`.
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Array2<f32> {
        let (fan_in, fan_out) = shape;

        match self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }

            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }

            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Uniform::new(*min, *max), rng)
            }
        }
    }

    /// Biases start at zero except under a custom uniform range.
    pub fn initialize_biases<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Array1<f32> {
        match self {
            WeightInit::XavierUniform | WeightInit::HeUniform => Array1::zeros(size),
            WeightInit::Uniform { min, max } => {
                Array1::random_using(size, Uniform::new(*min, *max), rng)
            }
        }
    }

    /// Get the recommended initialization for an activation function
    pub fn for_activation(activation: &Activation) -> Self {
        if activation.is_rectifier() {
            WeightInit::HeUniform
        } else {
            WeightInit::XavierUniform
        }
    }
}
