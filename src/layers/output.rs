use rand::Rng;

use crate::{
    error::{NetworkError, Result},
    init::nguyen_widrow::uniform_output,
};

/// The single linear output neuron. No activation is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputUnit {
    pub weights: Vec<f64>,
    pub bias: f64,
    previous_weights: Vec<f64>,
}

impl OutputUnit {
    pub fn new<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> OutputUnit {
        let (weights, bias) = uniform_output(input_size, rng);
        OutputUnit::from_parts(weights, bias)
    }

    pub fn from_parts(weights: Vec<f64>, bias: f64) -> OutputUnit {
        OutputUnit { previous_weights: weights.clone(), weights, bias }
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    pub fn previous_weights(&self) -> &[f64] {
        &self.previous_weights
    }

    pub(crate) fn set_previous_weights(&mut self, previous: Vec<f64>) {
        self.previous_weights = previous;
    }

    pub fn feed_from(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.input_size() {
            return Err(NetworkError::shape("output unit input", self.input_size(), input.len()));
        }
        Ok(self.weights.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + self.bias)
    }

    /// Same rule as a hidden layer with the residual `oe` as the only delta.
    pub fn apply_error(&mut self, oe: f64, inputs: &[f64], lr: f64, momentum: Option<f64>) {
        self.bias += lr * oe;
        for j in 0..self.weights.len() {
            let current = self.weights[j];
            let step = lr * oe * inputs[j];
            match momentum {
                Some(m) => {
                    self.weights[j] = current + step + m * (current - self.previous_weights[j]);
                    self.previous_weights[j] = current;
                }
                None => self.weights[j] = current + step,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_linear_combination() {
        let unit = OutputUnit::from_parts(vec![0.5, -1.0], 0.25);
        assert_eq!(unit.feed_from(&[2.0, 1.0]).unwrap(), 0.25);
    }

    #[test]
    fn output_rejects_wrong_width() {
        let unit = OutputUnit::from_parts(vec![0.5, -1.0], 0.25);
        assert!(unit.feed_from(&[2.0]).is_err());
    }

    #[test]
    fn apply_error_moves_toward_target() {
        let mut unit = OutputUnit::from_parts(vec![0.5, -1.0], 0.25);
        let input = [0.4, -0.2];
        let before = unit.feed_from(&input).unwrap();
        let oe = 3.0 - before;
        unit.apply_error(oe, &input, 0.1, None);
        let after = unit.feed_from(&input).unwrap();
        assert!((3.0 - after).abs() < (3.0 - before).abs());
        assert!((unit.bias - (0.25 + 0.1 * oe)).abs() < 1e-12);
    }
}
