//! Linear epsilon decay for epsilon-greedy exploration.

use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// Clamped linear interpolation from `start` to `end` over `horizon_steps` learning steps.
///
/// ```
/// use deepq::exploration::ExplorationSchedule;
///
/// let schedule = ExplorationSchedule::new(1.0, 0.1, 11).unwrap();
/// assert_eq!(schedule.epsilon(0), 1.0);
/// assert_eq!(schedule.epsilon(10), 0.1);
/// assert_eq!(schedule.epsilon(1_000), 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    pub start: f32,
    pub end: f32,
    pub horizon_steps: usize,
}

impl ExplorationSchedule {
    pub fn new(start: f32, end: f32, horizon_steps: usize) -> Result<Self> {
        let schedule = ExplorationSchedule { start, end, horizon_steps };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Both bounds must be probabilities and the horizon at least one step.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("exploration.start", self.start), ("exploration.end", self.end)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DqnError::configuration(
                    name.to_string(),
                    format!("must be a probability in [0, 1], got {}", value),
                ));
            }
        }
        if self.horizon_steps == 0 {
            return Err(DqnError::configuration(
                "exploration.horizon_steps",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Exploration probability `step` learning steps after the learning phase began.
    pub fn epsilon(&self, step: usize) -> f32 {
        let k = if self.horizon_steps <= 1 {
            1.0
        } else {
            (step as f64 / (self.horizon_steps - 1) as f64).clamp(0.0, 1.0) as f32
        };
        k * self.end + (1.0 - k) * self.start
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        ExplorationSchedule {
            start: 1.0,
            end: 0.1,
            horizon_steps: 40_000,
        }
    }
}
