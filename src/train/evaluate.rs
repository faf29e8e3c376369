use crate::{
    data::example::LabeledExample,
    error::Result,
    loss::sse::SseLoss,
    network::network::Network,
};

/// Result of running the network over a held-out set.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// `Σ 0.5 * (target - predicted)²`
    pub sse: f64,
    pub predictions: Vec<f64>,
    /// Percentage of examples with `oe² ≤ 0.25`. Zero for an empty set.
    pub percent_correct: f64,
}

/// Forward passes only; the network is never modified.
pub fn evaluate(network: &Network, examples: &[LabeledExample]) -> Result<Evaluation> {
    let mut sse = 0.0;
    let mut correct = 0usize;
    let mut predictions = Vec::with_capacity(examples.len());

    for example in examples {
        let predicted = network.predict(&example.features)?;
        sse += SseLoss::loss(predicted, example.label);
        if SseLoss::is_correct(predicted, example.label) {
            correct += 1;
        }
        predictions.push(predicted);
    }

    let percent_correct = if examples.is_empty() {
        0.0
    } else {
        correct as f64 / examples.len() as f64 * 100.0
    };

    Ok(Evaluation { sse, predictions, percent_correct })
}
