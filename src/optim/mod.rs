pub mod sgd;
pub mod adaptive;

pub use sgd::Sgd;
pub use adaptive::{AdaptiveRateController, RateState};
