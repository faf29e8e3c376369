pub mod error;
pub mod math;
pub mod activation;
pub mod init;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;

// Convenience re-exports
pub use error::{NetworkError, Result, StorageError};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{dense::Layer, output::OutputUnit};
pub use network::{network::Network, spec::NetworkSpec};
pub use optim::{adaptive::{AdaptiveRateController, RateState}, sgd::Sgd};
pub use train::{EpochReport, Trainer, TrainConfig, TrainingOutcome};
pub use data::example::LabeledExample;
