use ndarray::{Array2, ArrayView2};
use serde::{Serialize, Deserialize};

/// Trait defining the interface for regression losses over a batch (one sample per row)
pub trait Loss {
    /// Compute the scalar loss for a batch of predictions and targets
    fn compute(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Compute the gradient of the loss with respect to predictions
    fn gradient(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Squared-error (L2) loss: half the squared error summed over outputs, averaged over the batch.
pub struct MSE;

impl Loss for MSE {
    fn compute(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).sum() / (2.0 * batch_size(predictions))
    }

    fn gradient(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        (&predictions - &targets) / batch_size(predictions)
    }
}

/// Huber loss (smooth L1)
pub struct HuberLoss {
    pub delta: f32,
}

impl HuberLoss {
    pub fn new(delta: f32) -> Self {
        HuberLoss { delta }
    }
}

impl Loss for HuberLoss {
    fn compute(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        diff.mapv(|x| {
            let abs_x = x.abs();
            if abs_x <= self.delta {
                0.5 * x * x
            } else {
                self.delta * abs_x - 0.5 * self.delta * self.delta
            }
        }).sum() / batch_size(predictions)
    }

    fn gradient(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        let diff = &predictions - &targets;
        diff.mapv(|x| {
            if x.abs() <= self.delta {
                x
            } else {
                self.delta * x.signum()
            }
        }) / batch_size(predictions)
    }
}

/// Serializable choice of loss, as stored in a training configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum LossFunction {
    #[default]
    L2,
    Huber { delta: f32 },
}

impl LossFunction {
    pub fn name(&self) -> &'static str {
        match self {
            LossFunction::L2 => "L2Loss",
            LossFunction::Huber { .. } => "HuberLoss",
        }
    }
}

impl Loss for LossFunction {
    fn compute(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        match self {
            LossFunction::L2 => MSE.compute(predictions, targets),
            LossFunction::Huber { delta } => HuberLoss::new(*delta).compute(predictions, targets),
        }
    }

    fn gradient(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        match self {
            LossFunction::L2 => MSE.gradient(predictions, targets),
            LossFunction::Huber { delta } => HuberLoss::new(*delta).gradient(predictions, targets),
        }
    }
}

fn batch_size(predictions: ArrayView2<f32>) -> f32 {
    predictions.nrows().max(1) as f32
}
