// Test modules for all components
pub mod support;

pub mod test_activations;
pub mod test_evaluator;
pub mod test_trainer;
