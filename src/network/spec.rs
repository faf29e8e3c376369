use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Feature width produced by the dataset preprocessor.
pub const DEFAULT_INPUT_SIZE: usize = 15;

fn default_input_size() -> usize {
    DEFAULT_INPUT_SIZE
}

/// Architecture of a network: the input width and the ordered hidden-layer
/// sizes. The scalar output unit is implicit and always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default = "default_input_size")]
    pub input_size: usize,
    /// Neuron count of each hidden layer, input → output.
    pub hidden: Vec<usize>,
}

impl NetworkSpec {
    pub fn new(hidden: Vec<usize>) -> NetworkSpec {
        NetworkSpec { input_size: DEFAULT_INPUT_SIZE, hidden }
    }

    pub fn with_input_size(mut self, input_size: usize) -> NetworkSpec {
        self.input_size = input_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(NetworkError::hyper("input_size", "must be at least 1"));
        }
        if self.hidden.is_empty() {
            return Err(NetworkError::hyper(
                "hidden",
                "architecture needs at least one hidden layer",
            ));
        }
        if let Some(idx) = self.hidden.iter().position(|&n| n == 0) {
            return Err(NetworkError::hyper("hidden", format!("layer {idx} has zero neurons")));
        }
        Ok(())
    }

    /// `(neurons, inputs)` for every hidden layer in order.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut inputs = self.input_size;
        self.hidden
            .iter()
            .map(|&size| {
                let shape = (size, inputs);
                inputs = size;
                shape
            })
            .collect()
    }

    /// Width of the last hidden layer, i.e. the output unit's fan-in.
    pub fn last_hidden(&self) -> usize {
        self.hidden.last().copied().unwrap_or(self.input_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_shapes_chain_inputs() {
        let spec = NetworkSpec::new(vec![8, 4, 1]);
        assert_eq!(spec.layer_shapes(), vec![(8, 15), (4, 8), (1, 4)]);
        assert_eq!(spec.last_hidden(), 1);
    }

    #[test]
    fn rejects_empty_and_zero_layers() {
        assert!(matches!(
            NetworkSpec::new(vec![]).validate(),
            Err(NetworkError::InvalidHyperparameter { name: "hidden", .. })
        ));
        assert!(NetworkSpec::new(vec![3, 0]).validate().is_err());
        assert!(NetworkSpec::new(vec![3]).with_input_size(0).validate().is_err());
        assert!(NetworkSpec::new(vec![3, 2]).validate().is_ok());
    }

    #[test]
    fn input_size_defaults_when_missing_from_json() {
        let spec: NetworkSpec = serde_json::from_str(r#"{ "hidden": [8, 4, 1] }"#).unwrap();
        assert_eq!(spec, NetworkSpec::new(vec![8, 4, 1]));
    }
}
