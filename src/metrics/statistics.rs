use serde::{Deserialize, Serialize};

/// Summary statistics for a collection of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f32,
    pub std: f32,
    pub min: f32,
    pub max: f32,
    pub count: usize,
}

impl Statistics {
    /// Compute statistics from a slice of values. An empty slice yields all zeros.
    pub fn from_slice(values: &[f32]) -> Self {
        if values.is_empty() {
            return Statistics {
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
                count: 0,
            };
        }

        let count = values.len();
        let sum: f32 = values.iter().sum();
        let mean = sum / count as f32;

        let variance = values.iter()
            .map(|&x| (x - mean).powi(2))
            .sum::<f32>() / count as f32;
        let std = variance.sqrt();

        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Statistics {
            mean,
            std,
            min,
            max,
            count,
        }
    }
}

/// Mean of a sliding window of the most recent values.
#[derive(Debug, Clone)]
pub struct RewardWindow {
    values: std::collections::VecDeque<f32>,
    size: usize,
}

impl RewardWindow {
    pub fn new(size: usize) -> Self {
        RewardWindow {
            values: std::collections::VecDeque::with_capacity(size),
            size: size.max(1),
        }
    }

    /// Push a value, evicting the oldest one when the window is full, and return the new mean.
    pub fn push(&mut self, value: f32) -> f32 {
        if self.values.len() == self.size {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.mean()
    }

    /// Mean of the values in the window, 0 when empty
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.size
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
