//! RMSprop parameter updates.
//!
//! For every parameter `w` with mini-batch gradient `g`:
//!
//! ```text
//! v ← ρ·v + (1 − ρ)·g²
//! w ← w − η·g / (√v + ε)
//! ```

use serde::{Deserialize, Serialize};

use crate::network::{Gradients, Network};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RmsPropParams {
    pub learning_rate: f64,
    pub rho: f64,
    pub epsilon: f64,
}

impl Default for RmsPropParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            rho: 0.9,
            epsilon: 1e-7,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RmsProp {
    params: RmsPropParams,
    mean_square: Gradients,
}

impl RmsProp {
    pub(crate) fn new(params: RmsPropParams, network: &Network) -> Self {
        Self {
            params,
            mean_square: Gradients::zeros_like(network),
        }
    }

    pub(crate) fn step(&mut self, network: &mut Network, gradients: &Gradients) {
        let RmsPropParams {
            learning_rate,
            rho,
            epsilon,
        } = self.params;
        let update = |w: &mut f64, v: &mut f64, g: f64| {
            *v = rho * *v + (1.0 - rho) * g * g;
            *w -= learning_rate * g / (v.sqrt() + epsilon);
        };

        for ((layer, grad), square) in network
            .layers
            .iter_mut()
            .zip(&gradients.layers)
            .zip(&mut self.mean_square.layers)
        {
            let weights = layer.weights.iter_mut().zip(&grad.weights);
            for ((w, &g), v) in weights.zip(&mut square.weights) {
                update(w, v, g);
            }
            let biases = layer.biases.iter_mut().zip(&grad.biases);
            for ((b, &g), v) in biases.zip(&mut square.biases) {
                update(b, v, g);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::network::{Activation, Architecture};

    #[test]
    fn test_steps_reduce_loss() {
        let mut rng = Pcg32::seed_from_u64(5);
        let arch = Architecture {
            input_dim: 2,
            hidden_layers: vec![8],
            hidden_activation: Activation::Tanh,
        };
        let mut network = Network::new(arch, &mut rng).unwrap();
        let data = [([1.0, 1.0], true), ([-1.0, -1.0], false)];
        let params = RmsPropParams {
            learning_rate: 0.01,
            ..RmsPropParams::default()
        };
        let mut optimizer = RmsProp::new(params, &network);
        let mut gradients = Gradients::zeros_like(&network);

        let total_loss = |network: &Network, gradients: &mut Gradients| {
            gradients.reset();
            data.iter()
                .map(|(x, y)| network.accumulate_gradients(x, *y, gradients).0)
                .sum::<f64>()
        };

        let initial = total_loss(&network, &mut gradients);
        for _ in 0..50 {
            total_loss(&network, &mut gradients);
            gradients.scale(0.5);
            optimizer.step(&mut network, &gradients);
        }
        let trained = total_loss(&network, &mut gradients);
        assert!(trained < initial, "{trained} >= {initial}");
    }

    #[test]
    fn test_first_step_size() {
        // v starts at zero, so the first step is η·g / √((1−ρ)·g²) ≈ η / √(1−ρ)
        let mut rng = Pcg32::seed_from_u64(0);
        let arch = Architecture {
            input_dim: 1,
            hidden_layers: vec![1],
            hidden_activation: Activation::Relu,
        };
        let mut network = Network::new(arch, &mut rng).unwrap();
        let before = network.layers[1].biases[0];

        let mut gradients = Gradients::zeros_like(&network);
        gradients.layers[1].biases[0] = 2.0;
        let params = RmsPropParams::default();
        let mut optimizer = RmsProp::new(params, &network);
        optimizer.step(&mut network, &gradients);

        let expected = params.learning_rate / (1.0 - params.rho).sqrt();
        let moved = before - network.layers[1].biases[0];
        assert!((moved - expected).abs() < 1e-6, "{moved} vs {expected}");
    }
}
