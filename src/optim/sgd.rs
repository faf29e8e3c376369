use crate::network::network::{ForwardPass, Network};

/// Online gradient step with optional momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    /// `None` selects the plain update rule.
    pub momentum: Option<f64>,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate, momentum: None }
    }

    pub fn with_momentum(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum: Some(momentum) }
    }

    /// Applies one update to every layer and the output unit.
    ///
    /// `deltas` must come from the same `pass`; each layer is fed the
    /// activations it saw during that pass (the raw input for layer 0).
    pub fn step(
        &self,
        network: &mut Network,
        input: &[f64],
        pass: &ForwardPass,
        deltas: &[Vec<f64>],
        oe: f64,
    ) {
        for (i, layer) in network.layers.iter_mut().enumerate() {
            let layer_input = if i == 0 {
                input
            } else {
                pass.layers[i - 1].activations.as_slice()
            };
            layer.apply_deltas(&deltas[i], layer_input, self.learning_rate, self.momentum);
        }
        network.output.apply_error(oe, pass.last_activations(), self.learning_rate, self.momentum);
    }
}
