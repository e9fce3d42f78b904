//! Fully-connected feed-forward network with a single logistic output.
//!
//! The network maps a standardized feature vector to the probability of the
//! positive class:
//!
//! ```text
//! input (n) → dense(256, tanh) → dense(256, tanh) → dense(1, sigmoid) → p ∈ [0, 1]
//! ```
//!
//! Hidden widths and activation come from an [`Architecture`] descriptor that
//! is stored next to the weights, so a persisted network is rebuilt with the
//! shape it was trained with.
//!
//! Weights are initialized with Glorot-normal sampling
//! (`N(0, 2 / (fan_in + fan_out))`) and biases with zero.
//!
//! Gradients of the binary cross-entropy loss are computed by plain
//! backpropagation over one example at a time and accumulated into a
//! gradient buffer shaped like the network.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::DimensionMismatchError;

/// Width of each hidden layer in the standard architecture.
pub const HIDDEN_UNITS: usize = 256;

/// Probabilities are clamped to `[LOSS_EPSILON, 1 - LOSS_EPSILON]` before
/// taking logarithms.
pub const LOSS_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Tanh,
    Relu,
}

impl Activation {
    fn apply(self, z: f64) -> f64 {
        match self {
            Self::Tanh => z.tanh(),
            Self::Relu => z.max(0.0),
        }
    }

    /// Derivative in terms of the activation output `a`.
    fn derivative(self, a: f64) -> f64 {
        match self {
            Self::Tanh => 1.0 - a * a,
            Self::Relu => {
                if a > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ArchitectureError {
    #[display("network input dimension must be positive")]
    EmptyInput,
    #[display("hidden layer {index} has no units")]
    EmptyHiddenLayer { index: usize },
    #[display("expected {expected} layers, found {actual}")]
    LayerCount { expected: usize, actual: usize },
    #[display(
        "layer {index} should map {expected_inputs} inputs to {expected_outputs} outputs"
    )]
    LayerShape {
        index: usize,
        expected_inputs: usize,
        expected_outputs: usize,
    },
}

/// Shape of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    pub input_dim: usize,
    pub hidden_layers: Vec<usize>,
    pub hidden_activation: Activation,
}

impl Architecture {
    /// Two tanh hidden layers of [`HIDDEN_UNITS`] units each.
    #[must_use]
    pub fn standard(input_dim: usize) -> Self {
        Self {
            input_dim,
            hidden_layers: vec![HIDDEN_UNITS, HIDDEN_UNITS],
            hidden_activation: Activation::Tanh,
        }
    }

    pub fn validate(&self) -> Result<(), ArchitectureError> {
        if self.input_dim == 0 {
            return Err(ArchitectureError::EmptyInput);
        }
        if let Some(index) = self.hidden_layers.iter().position(|&units| units == 0) {
            return Err(ArchitectureError::EmptyHiddenLayer { index });
        }
        Ok(())
    }

    /// `(inputs, outputs)` of every dense layer, output layer included.
    fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut inputs = self.input_dim;
        let mut shapes = Vec::with_capacity(self.hidden_layers.len() + 1);
        for &units in self.hidden_layers.iter().chain(&[1]) {
            shapes.push((inputs, units));
            inputs = units;
        }
        shapes
    }
}

/// One dense layer. `weights` is row-major with one row per output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DenseLayer {
    pub(crate) inputs: usize,
    pub(crate) outputs: usize,
    pub(crate) weights: Vec<f64>,
    pub(crate) biases: Vec<f64>,
}

impl DenseLayer {
    fn glorot<R>(inputs: usize, outputs: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let std_dev = (2.0 / (inputs + outputs) as f64).sqrt();
        let weights = (0..inputs * outputs)
            .map(|_| rng.sample::<f64, _>(StandardNormal) * std_dev)
            .collect();
        Self {
            inputs,
            outputs,
            weights,
            biases: vec![0.0; outputs],
        }
    }

    fn has_shape(&self, inputs: usize, outputs: usize) -> bool {
        self.inputs == inputs
            && self.outputs == outputs
            && self.weights.len() == inputs * outputs
            && self.biases.len() == outputs
    }

    fn row(&self, output: usize) -> &[f64] {
        &self.weights[output * self.inputs..(output + 1) * self.inputs]
    }

    fn forward(&self, input: &[f64], activation: impl Fn(f64) -> f64) -> Vec<f64> {
        (0..self.outputs)
            .map(|output| {
                let z = self.biases[output]
                    + self
                        .row(output)
                        .iter()
                        .zip(input)
                        .map(|(w, x)| w * x)
                        .sum::<f64>();
                activation(z)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    architecture: Architecture,
    pub(crate) layers: Vec<DenseLayer>,
}

impl Network {
    /// Builds a freshly initialized network.
    pub fn new<R>(architecture: Architecture, rng: &mut R) -> Result<Self, ArchitectureError>
    where
        R: Rng + ?Sized,
    {
        architecture.validate()?;
        let layers = architecture
            .layer_shapes()
            .into_iter()
            .map(|(inputs, outputs)| DenseLayer::glorot(inputs, outputs, rng))
            .collect();
        Ok(Self {
            architecture,
            layers,
        })
    }

    /// Checks that the stored weights match the stored architecture.
    ///
    /// Networks built by [`Network::new`] always pass; this guards
    /// deserialized ones.
    pub fn validate(&self) -> Result<(), ArchitectureError> {
        self.architecture.validate()?;
        let shapes = self.architecture.layer_shapes();
        if shapes.len() != self.layers.len() {
            return Err(ArchitectureError::LayerCount {
                expected: shapes.len(),
                actual: self.layers.len(),
            });
        }
        for (index, (layer, (inputs, outputs))) in self.layers.iter().zip(shapes).enumerate() {
            if !layer.has_shape(inputs, outputs) {
                return Err(ArchitectureError::LayerShape {
                    index,
                    expected_inputs: inputs,
                    expected_outputs: outputs,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.architecture.input_dim
    }

    /// Probability of the positive class for a standardized feature vector.
    pub fn predict(&self, input: &[f64]) -> Result<f64, DimensionMismatchError> {
        DimensionMismatchError::check(self.input_dim(), input.len())?;
        let activations = self.forward_trace(input);
        Ok(output_probability(&activations))
    }

    /// Outputs of every layer, starting with the input itself.
    fn forward_trace(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let hidden = self.architecture.hidden_activation;
        let last = self.layers.len() - 1;
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());
        for (index, layer) in self.layers.iter().enumerate() {
            let previous = &activations[index];
            let output = if index == last {
                layer.forward(previous, sigmoid)
            } else {
                layer.forward(previous, |z| hidden.apply(z))
            };
            activations.push(output);
        }
        activations
    }

    /// Runs one example forward and backward, adding its loss gradient to
    /// `gradients`. Returns the example's loss and predicted probability.
    pub(crate) fn accumulate_gradients(
        &self,
        input: &[f64],
        label: bool,
        gradients: &mut Gradients,
    ) -> (f64, f64) {
        let hidden = self.architecture.hidden_activation;
        let activations = self.forward_trace(input);
        let probability = output_probability(&activations);
        let target = if label { 1.0 } else { 0.0 };

        // sigmoid + cross-entropy: dL/dz = p - y
        let mut delta = vec![probability - target];
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let layer_input = &activations[index];
            let grad = &mut gradients.layers[index];
            for (output, &d) in delta.iter().enumerate() {
                grad.biases[output] += d;
                let row = &mut grad.weights[output * layer.inputs..(output + 1) * layer.inputs];
                for (g, &x) in row.iter_mut().zip(layer_input) {
                    *g += d * x;
                }
            }
            if index == 0 {
                break;
            }
            delta = (0..layer.inputs)
                .map(|input| {
                    let back = delta
                        .iter()
                        .enumerate()
                        .map(|(output, &d)| layer.weights[output * layer.inputs + input] * d)
                        .sum::<f64>();
                    back * hidden.derivative(layer_input[input])
                })
                .collect();
        }

        (binary_cross_entropy(probability, label), probability)
    }
}

fn output_probability(activations: &[Vec<f64>]) -> f64 {
    activations
        .last()
        .and_then(|output| output.first())
        .copied()
        .unwrap_or(0.5)
}

/// Logistic function, evaluated without overflow for large `|z|`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[must_use]
pub fn binary_cross_entropy(probability: f64, label: bool) -> f64 {
    let p = probability.clamp(LOSS_EPSILON, 1.0 - LOSS_EPSILON);
    if label { -p.ln() } else { -(1.0 - p).ln() }
}

/// Loss gradients shaped like a [`Network`].
#[derive(Debug, Clone)]
pub(crate) struct Gradients {
    pub(crate) layers: Vec<LayerGradient>,
}

#[derive(Debug, Clone)]
pub(crate) struct LayerGradient {
    pub(crate) weights: Vec<f64>,
    pub(crate) biases: Vec<f64>,
}

impl Gradients {
    pub(crate) fn zeros_like(network: &Network) -> Self {
        let layers = network
            .layers
            .iter()
            .map(|layer| LayerGradient {
                weights: vec![0.0; layer.weights.len()],
                biases: vec![0.0; layer.biases.len()],
            })
            .collect();
        Self { layers }
    }

    pub(crate) fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.weights.fill(0.0);
            layer.biases.fill(0.0);
        }
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        for layer in &mut self.layers {
            for g in layer.weights.iter_mut().chain(&mut layer.biases) {
                *g *= factor;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn small(input_dim: usize) -> Architecture {
        Architecture {
            input_dim,
            hidden_layers: vec![4, 3],
            hidden_activation: Activation::Tanh,
        }
    }

    fn loss(network: &Network, input: &[f64], label: bool) -> f64 {
        binary_cross_entropy(network.predict(input).unwrap(), label)
    }

    #[test]
    fn test_standard_shape() {
        let mut rng = Pcg32::seed_from_u64(0);
        let network = Network::new(Architecture::standard(15), &mut rng).unwrap();
        let shapes = network
            .layers
            .iter()
            .map(|layer| (layer.inputs, layer.outputs))
            .collect::<Vec<_>>();
        assert_eq!(shapes, [(15, 256), (256, 256), (256, 1)]);
        assert!(network.layers.iter().all(|l| l.biases.iter().all(|&b| b == 0.0)));
        network.validate().unwrap();
    }

    #[test]
    fn test_output_is_probability() {
        let mut rng = Pcg32::seed_from_u64(1);
        let network = Network::new(small(3), &mut rng).unwrap();
        for input in [[0.0, 0.0, 0.0], [1e6, -1e6, 1e6], [-40.0, 3.5, 0.25]] {
            let p = network.predict(&input).unwrap();
            assert!((0.0..=1.0).contains(&p), "p = {p}");
        }
    }

    #[test]
    fn test_input_dimension_checked() {
        let mut rng = Pcg32::seed_from_u64(1);
        let network = Network::new(small(3), &mut rng).unwrap();
        assert_eq!(
            network.predict(&[1.0, 2.0]),
            Err(DimensionMismatchError {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_invalid_architecture() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            Network::new(small(0), &mut rng),
            Err(ArchitectureError::EmptyInput)
        );
        let mut arch = small(2);
        arch.hidden_layers[1] = 0;
        assert_eq!(
            Network::new(arch, &mut rng),
            Err(ArchitectureError::EmptyHiddenLayer { index: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_corrupt_layers() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut network = Network::new(small(2), &mut rng).unwrap();
        network.layers[1].weights.pop();
        assert!(matches!(
            network.validate(),
            Err(ArchitectureError::LayerShape { index: 1, .. })
        ));
        network.layers.pop();
        assert!(matches!(
            network.validate(),
            Err(ArchitectureError::LayerCount { .. })
        ));
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        for activation in [Activation::Tanh, Activation::Relu] {
            let mut rng = Pcg32::seed_from_u64(42);
            let mut arch = small(3);
            arch.hidden_activation = activation;
            let network = Network::new(arch, &mut rng).unwrap();
            let input = [0.3, -1.2, 0.8];
            let label = true;

            let mut gradients = Gradients::zeros_like(&network);
            network.accumulate_gradients(&input, label, &mut gradients);

            let h = 1e-6;
            for (layer_index, layer) in network.layers.iter().enumerate() {
                for weight_index in 0..layer.weights.len() {
                    let mut plus = network.clone();
                    plus.layers[layer_index].weights[weight_index] += h;
                    let mut minus = network.clone();
                    minus.layers[layer_index].weights[weight_index] -= h;
                    let numeric =
                        (loss(&plus, &input, label) - loss(&minus, &input, label)) / (2.0 * h);
                    let analytic = gradients.layers[layer_index].weights[weight_index];
                    assert!(
                        (numeric - analytic).abs() < 1e-5,
                        "{activation:?} {layer_index}/{weight_index}: {numeric} vs {analytic}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_sigmoid_and_loss() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!((binary_cross_entropy(0.5, true) - std::f64::consts::LN_2).abs() < 1e-12);
        assert!(binary_cross_entropy(0.0, true).is_finite());
        assert!(binary_cross_entropy(1.0, false).is_finite());
    }

    #[test]
    fn test_serde_round_trip_preserves_predictions() {
        let mut rng = Pcg32::seed_from_u64(3);
        let network = Network::new(small(2), &mut rng).unwrap();
        let json = serde_json::to_string(&network).unwrap();
        let restored: Network = serde_json::from_str(&json).unwrap();
        let input = [0.7, -0.1];
        assert_eq!(
            network.predict(&input).unwrap().to_bits(),
            restored.predict(&input).unwrap().to_bits()
        );
    }
}
