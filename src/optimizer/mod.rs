//! Gradient-based parameter updates for [`NeuralNetwork`](crate::network::NeuralNetwork).
//!
//! An optimizer receives the gradients of one backward pass (one entry per layer, in layer
//! order) and updates the layers in place. Stateful optimizers such as Adam keep their moment
//! estimates across calls, so the same optimizer instance must stay attached to the same network.

use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};
use crate::layers::{DenseLayer, LayerGradients};

pub trait Optimizer {
    /// Apply one update to `layers` from the matching `gradients`.
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) -> Result<()>;

    fn learning_rate(&self) -> f32;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl OptimizerWrapper {
    pub fn sgd(learning_rate: f32) -> Self {
        OptimizerWrapper::SGD(SGD::new(learning_rate))
    }

    pub fn adam(learning_rate: f32) -> Self {
        OptimizerWrapper::Adam(Adam::new(learning_rate, 0.9, 0.999, 1e-8))
    }
}

impl Optimizer for OptimizerWrapper {
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) -> Result<()> {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(layers, gradients),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(layers, gradients),
        }
    }

    fn learning_rate(&self) -> f32 {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.learning_rate(),
            OptimizerWrapper::Adam(optimizer) => optimizer.learning_rate(),
        }
    }
}

fn check_layer_count(layers: &[DenseLayer], gradients: &[LayerGradients]) -> Result<()> {
    if layers.len() != gradients.len() {
        return Err(DqnError::dimension_mismatch(
            format!("{} layer gradients", layers.len()),
            format!("{} layer gradients", gradients.len()),
        ));
    }
    for (layer, grads) in layers.iter().zip(gradients) {
        if layer.weights.dim() != grads.weights.dim() || layer.biases.dim() != grads.biases.dim() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", layer.weights.dim()),
                format!("{:?}", grads.weights.dim()),
            ));
        }
    }
    Ok(())
}

/// Plain stochastic gradient descent
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD {
    pub learning_rate: f32,
}

impl SGD {
    pub fn new(learning_rate: f32) -> SGD {
        SGD { learning_rate }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) -> Result<()> {
        check_layer_count(layers, gradients)?;
        let lr = self.learning_rate;
        for (layer, grads) in layers.iter_mut().zip(gradients) {
            layer.weights.zip_mut_with(&grads.weights, |w, &g| *w -= lr * g);
            layer.biases.zip_mut_with(&grads.biases, |b, &g| *b -= lr * g);
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

/// Adam with bias-corrected first and second moment estimates per parameter.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    /// Number of completed steps
    pub t: usize,
}

impl Adam {
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    // Moments are sized from the first network the optimizer sees.
    fn ensure_moments(&mut self, layers: &[DenseLayer]) {
        if self.m_weights.len() == layers.len() {
            return;
        }
        self.m_weights = layers.iter().map(|l| Array2::zeros(l.weights.dim())).collect();
        self.v_weights = layers.iter().map(|l| Array2::zeros(l.weights.dim())).collect();
        self.m_biases = layers.iter().map(|l| Array1::zeros(l.biases.dim())).collect();
        self.v_biases = layers.iter().map(|l| Array1::zeros(l.biases.dim())).collect();
        self.t = 0;
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) -> Result<()> {
        check_layer_count(layers, gradients)?;
        self.ensure_moments(layers);
        self.t += 1;

        let (beta1, beta2, eps, lr) = (self.beta1, self.beta2, self.epsilon, self.learning_rate);
        let correction1 = 1.0 - beta1.powi(self.t as i32);
        let correction2 = 1.0 - beta2.powi(self.t as i32);

        for (i, (layer, grads)) in layers.iter_mut().zip(gradients).enumerate() {
            let m = &mut self.m_weights[i];
            let v = &mut self.v_weights[i];
            m.zip_mut_with(&grads.weights, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            v.zip_mut_with(&grads.weights, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
            ndarray::Zip::from(&mut layer.weights).and(&*m).and(&*v).for_each(|w, &m, &v| {
                *w -= lr * (m / correction1) / ((v / correction2).sqrt() + eps);
            });

            let m = &mut self.m_biases[i];
            let v = &mut self.v_biases[i];
            m.zip_mut_with(&grads.biases, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            v.zip_mut_with(&grads.biases, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
            ndarray::Zip::from(&mut layer.biases).and(&*m).and(&*v).for_each(|b, &m, &v| {
                *b -= lr * (m / correction1) / ((v / correction2).sqrt() + eps);
            });
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
