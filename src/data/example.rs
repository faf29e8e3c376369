use serde::{Serialize, Deserialize};

/// A normalized feature vector and its numeric class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub features: Vec<f64>,
    pub label: f64,
}

impl LabeledExample {
    pub fn new(features: Vec<f64>, label: f64) -> Self {
        LabeledExample { features, label }
    }
}
