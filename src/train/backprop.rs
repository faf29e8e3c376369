use crate::network::network::{ForwardPass, Network};

/// Error terms for every hidden neuron, indexed `[layer][neuron]`.
///
/// `oe` is the raw output residual `target - predicted`. The last hidden
/// layer receives `oe * w_k * f'(z_k)` through the output weights; each
/// earlier layer `l` receives `f'(z_k) * Σ_j w[l+1][j][k] * δ[l+1][j]`.
/// All deltas are computed from the weights as they were during `pass`.
pub fn compute_deltas(network: &Network, pass: &ForwardPass, oe: f64) -> Vec<Vec<f64>> {
    let n_layers = network.layers.len();
    let mut deltas: Vec<Vec<f64>> = vec![Vec::new(); n_layers];
    if n_layers == 0 {
        return deltas;
    }

    let last = n_layers - 1;
    let activator = network.layers[last].activator;
    deltas[last] = pass.layers[last]
        .pre_activations
        .iter()
        .zip(&network.output.weights)
        .map(|(&z, &w)| oe * w * activator.derivative(z))
        .collect();

    for l in (0..last).rev() {
        let next = &network.layers[l + 1];
        let activator = network.layers[l].activator;
        let layer_deltas: Vec<f64> = pass.layers[l]
            .pre_activations
            .iter()
            .enumerate()
            .map(|(k, &z)| {
                let back: f64 = next.weights.data
                    .iter()
                    .zip(&deltas[l + 1])
                    .map(|(row, d)| row[k] * d)
                    .sum();
                activator.derivative(z) * back
            })
            .collect();
        deltas[l] = layer_deltas;
    }

    deltas
}
