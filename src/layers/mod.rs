pub mod dense;
pub mod output;

pub use dense::{Layer, LayerOutput};
pub use output::OutputUnit;
