use serde::{Serialize, Deserialize};

use crate::optim::adaptive::RateState;

/// Per-epoch event handed to the reporting callback.
///
/// The trainer builds one `EpochReport` at the end of every epoch. The
/// callback may render, log or forward it; training does not depend on
/// what it does or how long it takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Training SSE accumulated during this epoch.
    pub train_error: f64,
    /// Test SSE after this epoch's updates.
    pub test_error: f64,
    /// Learning rate after the adaptive controller ran.
    pub learning_rate: f64,
    /// Share of test examples predicted within 0.5 of their label, in percent.
    pub percent_correct: f64,
    /// Raw test-set predictions in test-set order.
    pub predictions: Vec<f64>,
    pub rate_state: RateState,
}

/// Final summary of a `Trainer::fit` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutcome {
    pub percent_correct: f64,
    pub test_error: f64,
    pub test_history: Vec<f64>,
    /// Index of the last epoch that ran.
    pub epoch: usize,
    pub train_history: Vec<f64>,
    pub predictions: Vec<f64>,
    /// True if training stopped because the test error went below the goal.
    pub goal_reached: bool,
}
