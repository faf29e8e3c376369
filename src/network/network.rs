use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    error::{NetworkError, Result},
    layers::{dense::{Layer, LayerOutput}, output::OutputUnit},
    network::spec::NetworkSpec,
};

/// Everything the forward pass computed for one input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    /// One entry per hidden layer, in order.
    pub layers: Vec<LayerOutput>,
    pub output: f64,
}

impl ForwardPass {
    /// Activations of the last hidden layer (the output unit's inputs).
    pub fn last_activations(&self) -> &[f64] {
        self.layers.last().map(|l| l.activations.as_slice()).unwrap_or(&[])
    }
}

/// Independent deep copy of every parameter, momentum buffers included.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    layers: Vec<Layer>,
    output: OutputUnit,
}

/// Bipolar-sigmoid hidden layers followed by one linear output unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    spec: NetworkSpec,
    pub layers: Vec<Layer>,
    pub output: OutputUnit,
}

impl Network {
    /// Builds a network from `spec`, drawing initial weights from `rng`.
    pub fn new<R: Rng + ?Sized>(spec: NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .layer_shapes()
            .into_iter()
            .map(|(size, input_size)| Layer::new(size, input_size, rng))
            .collect();
        let output = OutputUnit::new(spec.last_hidden(), rng);
        Ok(Network { spec, layers, output })
    }

    /// Same as [`Network::new`] with a `ChaCha8Rng` seeded from `seed`.
    pub fn seeded(spec: NetworkSpec, seed: u64) -> Result<Network> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Network::new(spec, &mut rng)
    }

    /// Assembles a network from existing parameters, checking every shape
    /// against `spec`.
    pub fn from_parts(
        spec: NetworkSpec,
        layers: Vec<Layer>,
        output: OutputUnit,
    ) -> Result<Network> {
        spec.validate()?;
        let network = Network { spec, layers, output };
        network.check_shapes()?;
        Ok(network)
    }

    pub fn spec(&self) -> &NetworkSpec {
        &self.spec
    }

    pub fn input_size(&self) -> usize {
        self.spec.input_size
    }

    /// Verifies that every weight matrix and bias vector matches the
    /// architecture.
    pub fn check_shapes(&self) -> Result<()> {
        let shapes = self.spec.layer_shapes();
        if self.layers.len() != shapes.len() {
            return Err(NetworkError::shape("layer count", shapes.len(), self.layers.len()));
        }
        for (idx, (layer, (size, inputs))) in self.layers.iter().zip(shapes).enumerate() {
            let w = &layer.weights;
            if w.rows != size || w.data.len() != size || layer.size != size {
                return Err(NetworkError::shape(format!("layer {idx} rows"), size, w.data.len()));
            }
            if let Some(row) = w.data.iter().find(|row| row.len() != inputs) {
                return Err(NetworkError::shape(format!("layer {idx} columns"), inputs, row.len()));
            }
            if w.cols != inputs {
                return Err(NetworkError::shape(format!("layer {idx} columns"), inputs, w.cols));
            }
            if layer.biases.len() != size {
                return Err(NetworkError::shape(
                    format!("layer {idx} biases"),
                    size,
                    layer.biases.len(),
                ));
            }
        }
        if self.output.input_size() != self.spec.last_hidden() {
            return Err(NetworkError::shape(
                "output unit weights",
                self.spec.last_hidden(),
                self.output.input_size(),
            ));
        }
        Ok(())
    }

    /// Forward pass; pure with respect to the network.
    pub fn forward(&self, input: &[f64]) -> Result<ForwardPass> {
        if input.len() != self.input_size() {
            return Err(NetworkError::shape("network input", self.input_size(), input.len()));
        }

        let mut layers: Vec<LayerOutput> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let current = layers.last().map(|l| l.activations.as_slice()).unwrap_or(input);
            let out = layer.feed_from(current)?;
            layers.push(out);
        }

        let last = layers.last().map(|l| l.activations.as_slice()).unwrap_or(input);
        let output = self.output.feed_from(last)?;
        Ok(ForwardPass { layers, output })
    }

    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        Ok(self.forward(input)?.output)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { layers: self.layers.clone(), output: self.output.clone() }
    }

    /// Overwrites every parameter with the values held by `snapshot`.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.layers.clone_from(&snapshot.layers);
        self.output.clone_from(&snapshot.output);
    }
}
