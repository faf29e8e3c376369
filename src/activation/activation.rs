use serde::{Serialize, Deserialize};
use std::f64::consts::E;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    /// `2 / (1 + e^-x) - 1`, range (-1, 1). Used by every hidden layer.
    BipolarSigmoid,
    /// Linear pass-through; the output unit.
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::BipolarSigmoid => 2.0 / (1.0 + E.powf(-x)) - 1.0,
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative evaluated at the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::BipolarSigmoid => self.derivative_from_output(self.function(x)),
            ActivationFunction::Identity => 1.0,
        }
    }

    /// Derivative expressed through the already-activated value `y = f(x)`.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::BipolarSigmoid => 0.5 * (1.0 - y * y),
            ActivationFunction::Identity => 1.0,
        }
    }
}
