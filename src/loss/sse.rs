/// Half squared error of a scalar prediction, summed over samples to give
/// the epoch SSE.
pub struct SseLoss;

impl SseLoss {
    /// Residual `target - predicted`. This is also the error signal fed
    /// back into the output unit.
    pub fn residual(predicted: f64, target: f64) -> f64 {
        target - predicted
    }

    /// `0.5 * (target - predicted)²`
    pub fn loss(predicted: f64, target: f64) -> f64 {
        let oe = Self::residual(predicted, target);
        0.5 * oe * oe
    }

    /// Prediction within 0.5 of the label, i.e. `oe² ≤ 0.25`.
    pub fn is_correct(predicted: f64, target: f64) -> bool {
        let oe = Self::residual(predicted, target);
        oe * oe <= 0.25
    }
}
