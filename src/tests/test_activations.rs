use ndarray::array;
use crate::activations::Activation;

#[test]
fn test_relu_activation() {
    let mut input = array![[-1.0, 0.0, 1.0, 2.0]];
    Activation::Relu.apply_batch(&mut input);
    assert_eq!(input, array![[0.0, 0.0, 1.0, 2.0]]);
}

#[test]
fn test_linear_activation_is_identity() {
    let mut input = array![[-3.5, 0.0], [7.25, -0.5]];
    let expected = input.clone();
    Activation::Linear.apply_batch(&mut input);
    assert_eq!(input, expected);
}

#[test]
fn test_tanh_activation() {
    let mut input = array![[0.0, 100.0, -100.0]];
    Activation::Tanh.apply_batch(&mut input);
    assert_eq!(input[[0, 0]], 0.0);
    assert!((input[[0, 1]] - 1.0).abs() < 1e-6);
    assert!((input[[0, 2]] + 1.0).abs() < 1e-6);
}

#[test]
fn test_leaky_relu() {
    let leaky = Activation::LeakyRelu { alpha: 0.01 };
    let mut input = array![[-1.0, 0.0, 1.0]];
    leaky.apply_batch(&mut input);
    assert_eq!(input, array![[-0.01, 0.0, 1.0]]);
}

#[test]
fn test_activation_derivatives() {
    let pre = array![[-1.0, 0.0, 1.0, 2.0]];

    assert_eq!(Activation::Relu.derivative_batch(pre.view()), array![[0.0, 0.0, 1.0, 1.0]]);
    assert_eq!(Activation::Linear.derivative_batch(pre.view()), array![[1.0, 1.0, 1.0, 1.0]]);

    let leaky = Activation::LeakyRelu { alpha: 0.1 };
    assert_eq!(leaky.derivative_batch(pre.view()), array![[0.1, 0.1, 1.0, 1.0]]);

    let tanh = Activation::Tanh.derivative_batch(array![[0.0]].view());
    assert_eq!(tanh[[0, 0]], 1.0);
}

#[test]
fn test_rectifiers() {
    assert!(Activation::Relu.is_rectifier());
    assert!(Activation::LeakyRelu { alpha: 0.2 }.is_rectifier());
    assert!(!Activation::Linear.is_rectifier());
    assert!(!Activation::Tanh.is_rectifier());
    assert_eq!(Activation::default(), Activation::Relu);
}
