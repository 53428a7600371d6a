use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use bincode::{serialize, deserialize};

use crate::activations::Activation;
use crate::agent::QFunction;
use crate::error::{DqnError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss::{Loss, LossFunction};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward network of dense layers together with the optimizer that trains it.
///
/// Cloning copies every parameter array and the optimizer state; the clone shares no storage
/// with the original, which is what makes it usable as a frozen target network.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes and activations.
    ///
    /// `layer_sizes` includes the input and output sizes, so it must be one longer than
    /// `activations`. Weights are drawn from `rng` using `init`, or the activation's
    /// recommended scheme when `init` is `None`.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        init: Option<WeightInit>,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DqnError::configuration(
                "layer_sizes",
                "need at least an input and an output size",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(DqnError::configuration(
                "activations".to_string(),
                format!("expected {} activations, got {}", layer_sizes.len() - 1, activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(DqnError::configuration("layer_sizes", "every layer needs at least one unit"));
        }
        if let Some(WeightInit::Uniform { min, max }) = init {
            if !(min < max) {
                return Err(DqnError::configuration("init", "uniform range must satisfy min < max"));
            }
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                let init = init.unwrap_or_else(|| WeightInit::for_activation(&activation));
                DenseLayer::new(window[0], window[1], activation, init, rng)
            })
            .collect::<Vec<_>>();

        Ok(NeuralNetwork { layers, optimizer })
    }

    /// The Q-network topology used by the trainer: one ReLU hidden layer and a linear output.
    pub fn q_network<R: Rng + ?Sized>(
        state_size: usize,
        hidden_size: usize,
        num_actions: usize,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        Self::new(
            &[state_size, hidden_size, num_actions],
            &[Activation::Relu, Activation::Linear],
            None,
            optimizer,
            rng,
        )
    }

    /// Assemble a network from existing layers, checking that each layer's bias length matches
    /// its weight columns and that consecutive sizes agree.
    pub fn from_layers(layers: Vec<DenseLayer>, optimizer: OptimizerWrapper) -> Result<Self> {
        if layers.is_empty() {
            return Err(DqnError::configuration("layers", "network needs at least one layer"));
        }
        for (index, layer) in layers.iter().enumerate() {
            if layer.biases.len() != layer.weights.ncols() {
                return Err(DqnError::dimension_mismatch(
                    format!("layer {} with {} biases", index, layer.weights.ncols()),
                    format!("{} biases", layer.biases.len()),
                ));
            }
        }
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(DqnError::dimension_mismatch(
                    format!("{} inputs", pair[0].output_size()),
                    format!("{} inputs", pair[1].input_size()),
                ));
            }
        }
        Ok(NeuralNetwork { layers, optimizer })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.input_size())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_size())
    }

    /// Forward pass for a batch of inputs without touching any cached training state.
    pub fn predict(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_inputs(inputs)?;
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.predict(current.view());
        }
        Ok(current)
    }

    /// Forward pass for a single input vector.
    pub fn predict_one(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.predict(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Fit the network to `targets` with one optimizer step and return the pre-update loss.
    pub fn train_minibatch(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        loss: &LossFunction,
    ) -> Result<f32> {
        self.check_inputs(inputs)?;
        if targets.dim() != (inputs.nrows(), self.output_size()) {
            return Err(DqnError::dimension_mismatch(
                format!("({}, {})", inputs.nrows(), self.output_size()),
                format!("{:?}", targets.dim()),
            ));
        }

        let mut outputs = inputs.to_owned();
        for layer in &mut self.layers {
            outputs = layer.forward_batch(outputs.view());
        }

        let value = loss.compute(outputs.view(), targets);
        if !value.is_finite() {
            return Err(DqnError::Numerical(format!("loss is not finite: {}", value)));
        }

        let mut error = loss.gradient(outputs.view(), targets);
        let mut gradients = Vec::with_capacity(self.layers.len());
        for layer in self.layers.iter().rev() {
            let (input_error, layer_gradients) = layer.backward_batch(error.view())?;
            gradients.push(layer_gradients);
            error = input_error;
        }
        gradients.reverse();

        self.optimizer.step(&mut self.layers, &gradients)?;
        Ok(value)
    }

    /// Save the network's topology, weights and optimizer state to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a network previously written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        let network: Self = deserialize(&data)?;
        Self::from_layers(network.layers, network.optimizer)
    }

    fn check_inputs(&self, inputs: ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(DqnError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        Ok(())
    }
}

impl QFunction for NeuralNetwork {
    fn state_size(&self) -> usize {
        self.input_size()
    }

    fn num_actions(&self) -> usize {
        self.output_size()
    }

    fn q_values(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.predict(states)
    }

    fn fit(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>, loss: &LossFunction) -> Result<f32> {
        self.train_minibatch(states, targets, loss)
    }
}
