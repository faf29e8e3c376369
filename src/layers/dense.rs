use rand::Rng;

use crate::{
    activation::activation::ActivationFunction,
    error::{NetworkError, Result},
    init::nguyen_widrow::nguyen_widrow,
    math::matrix::Matrix,
};

/// Values a hidden layer produces for one input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOutput {
    pub activations: Vec<f64>,
    /// Pre-activation sums `Σ input·weight + bias`, needed for the derivative.
    pub pre_activations: Vec<f64>,
}

/// A fully connected hidden layer.
///
/// `weights` is `size × input_size`: row `i` holds the incoming weights of
/// neuron `i`. The shape is fixed at construction; only values change.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    // weight values before the most recent momentum step
    previous_weights: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    /// Nguyen-Widrow initialised bipolar-sigmoid layer.
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        let (weights, biases) = nguyen_widrow(size, input_size, rng);
        Layer::from_parts(weights, biases)
    }

    /// Wraps existing parameters. The momentum buffer starts equal to the
    /// weights so the first momentum term is zero.
    pub fn from_parts(weights: Matrix, biases: Vec<f64>) -> Layer {
        Layer {
            size: weights.rows,
            previous_weights: weights.clone(),
            weights,
            biases,
            activator: ActivationFunction::BipolarSigmoid,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn previous_weights(&self) -> &Matrix {
        &self.previous_weights
    }

    pub(crate) fn set_previous_weights(&mut self, previous: Matrix) {
        self.previous_weights = previous;
    }

    /// Forward pass for one input vector. Does not touch any layer state.
    pub fn feed_from(&self, input: &[f64]) -> Result<LayerOutput> {
        if input.len() != self.input_size() {
            return Err(NetworkError::shape("layer input", self.input_size(), input.len()));
        }

        let mut activations = Vec::with_capacity(self.size);
        let mut pre_activations = Vec::with_capacity(self.size);
        for (row, bias) in self.weights.data.iter().zip(&self.biases) {
            let z = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
            pre_activations.push(z);
            activations.push(self.activator.function(z));
        }

        Ok(LayerOutput { activations, pre_activations })
    }

    /// `weight[i][j] += lr * δ_i * input_j`, `bias[i] += lr * δ_i`.
    ///
    /// With `momentum = Some(m)` each weight also gains
    /// `m * (weight - previous_weight)` and the buffer takes the pre-update value.
    pub fn apply_deltas(&mut self, deltas: &[f64], inputs: &[f64], lr: f64, momentum: Option<f64>) {
        for i in 0..self.size {
            self.biases[i] += lr * deltas[i];
            for j in 0..self.weights.cols {
                let current = self.weights.data[i][j];
                let step = lr * deltas[i] * inputs[j];
                match momentum {
                    Some(m) => {
                        let previous = self.previous_weights.data[i][j];
                        self.weights.data[i][j] = current + step + m * (current - previous);
                        self.previous_weights.data[i][j] = current;
                    }
                    None => self.weights.data[i][j] = current + step,
                }
            }
        }
    }
}
