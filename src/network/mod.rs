pub mod network;
pub mod persist;
pub mod spec;

pub use network::{ForwardPass, Network, Snapshot};
pub use persist::{LayerParameters, ModelRecord, FORMAT_TAG};
pub use spec::{NetworkSpec, DEFAULT_INPUT_SIZE};
