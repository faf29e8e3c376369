use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::{
    error::{NetworkError, Result, StorageError},
    layers::{dense::Layer, output::OutputUnit},
    math::matrix::Matrix,
    network::{network::Network, spec::NetworkSpec},
};

/// Tag written at the head of every saved model.
pub const FORMAT_TAG: &str = "ferrite-mlp/1";

/// Parameters of one layer as they appear on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerParameters {
    Hidden { weights: Matrix, biases: Vec<f64> },
    Output { weights: Vec<f64>, bias: f64 },
}

/// On-disk model: the parameter collection (hidden layers in architecture
/// order, output unit last), then the hidden layer sizes, then their count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub format: String,
    pub input_size: usize,
    pub parameters: Vec<LayerParameters>,
    pub layer_sizes: Vec<usize>,
    pub layer_count: usize,
}

impl ModelRecord {
    pub fn from_network(network: &Network) -> ModelRecord {
        let mut parameters: Vec<LayerParameters> = network
            .layers
            .iter()
            .map(|layer| LayerParameters::Hidden {
                weights: layer.weights.clone(),
                biases: layer.biases.clone(),
            })
            .collect();
        parameters.push(LayerParameters::Output {
            weights: network.output.weights.clone(),
            bias: network.output.bias,
        });

        ModelRecord {
            format: FORMAT_TAG.to_string(),
            input_size: network.input_size(),
            parameters,
            layer_sizes: network.spec().hidden.clone(),
            layer_count: network.spec().hidden.len(),
        }
    }

    /// Rebuilds the network, rejecting unknown tags and any dimension that
    /// disagrees with the recorded architecture.
    pub fn into_network(self) -> Result<Network> {
        if self.format != FORMAT_TAG {
            return Err(StorageError::UnknownFormat(self.format).into());
        }
        if self.layer_count != self.layer_sizes.len() {
            return Err(NetworkError::shape(
                "layer count",
                self.layer_sizes.len(),
                self.layer_count,
            ));
        }
        if self.parameters.len() != self.layer_count + 1 {
            return Err(NetworkError::shape(
                "parameter entries",
                self.layer_count + 1,
                self.parameters.len(),
            ));
        }

        let spec = NetworkSpec::new(self.layer_sizes).with_input_size(self.input_size);
        let mut layers = Vec::with_capacity(self.layer_count);
        let mut output = None;
        for (idx, entry) in self.parameters.into_iter().enumerate() {
            match (entry, idx == spec.hidden.len()) {
                (LayerParameters::Hidden { weights, biases }, false) => {
                    layers.push(Layer::from_parts(weights, biases));
                }
                (LayerParameters::Output { weights, bias }, true) => {
                    output = Some(OutputUnit::from_parts(weights, bias));
                }
                // an output entry in a hidden slot or vice versa
                (_, _) => {
                    return Err(NetworkError::shape(
                        format!("parameter entry {idx} kind"),
                        spec.hidden.len(),
                        idx,
                    ));
                }
            }
        }
        let output = output.ok_or_else(|| NetworkError::shape("output unit", 1, 0))?;
        Network::from_parts(spec, layers, output)
    }
}

impl Network {
    /// Writes the model as a compact binary record.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &ModelRecord::from_network(self))?;
        info!(path = %path.display(), layers = self.layers.len(), "saved model");
        Ok(())
    }

    /// Reads a model previously written by [`Network::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let record: ModelRecord = bincode::deserialize_from(reader)?;
        let network = record.into_network()?;
        info!(path = %path.display(), layers = network.layers.len(), "loaded model");
        Ok(network)
    }

    /// Serializes the model to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &ModelRecord::from_network(self))?;
        Ok(())
    }

    /// Deserializes a model from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let reader = BufReader::new(File::open(path)?);
        let record: ModelRecord = serde_json::from_reader(reader)?;
        record.into_network()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ModelRecord {
        let net = Network::seeded(NetworkSpec::new(vec![3, 2]), 4).unwrap();
        ModelRecord::from_network(&net)
    }

    #[test]
    fn record_lists_layers_in_order() {
        let rec = record();
        assert_eq!(rec.layer_sizes, vec![3, 2]);
        assert_eq!(rec.layer_count, 2);
        assert_eq!(rec.parameters.len(), 3);
        assert!(matches!(rec.parameters[2], LayerParameters::Output { .. }));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut rec = record();
        rec.format = "something-else/9".into();
        assert!(matches!(
            rec.into_network(),
            Err(NetworkError::Storage(StorageError::UnknownFormat(_)))
        ));
    }

    #[test]
    fn mismatched_layer_sizes_are_rejected() {
        let mut rec = record();
        rec.layer_sizes = vec![3, 5];
        assert!(matches!(rec.into_network(), Err(NetworkError::ShapeMismatch { .. })));

        let mut rec = record();
        rec.layer_count = 3;
        assert!(matches!(rec.into_network(), Err(NetworkError::ShapeMismatch { .. })));
    }

    #[test]
    fn loading_missing_file_surfaces_io_error() {
        let err = Network::load("/definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, NetworkError::Storage(StorageError::Io(_))));
    }
}
