use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::{
    network::network::{Network, Snapshot},
    optim::sgd::Sgd,
};

/// Epoch-over-epoch trend of the training SSE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateState {
    /// Error dropped; the learning rate grows.
    Improving,
    /// Error exceeded `last_cost * er`; the epoch is rolled back and the
    /// learning rate shrinks.
    Regressing,
    /// Within tolerance; nothing changes.
    Stable,
}

/// Adjusts the learning rate from the aggregate training error and decides
/// when an epoch has to be discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveRateController {
    pub lr_inc: f64,
    pub lr_dec: f64,
    pub er: f64,
    pub lr_floor: f64,
    pub lr_ceiling: f64,
    last_cost: f64,
    state: RateState,
}

impl AdaptiveRateController {
    pub fn new(lr_inc: f64, lr_dec: f64, er: f64, lr_floor: f64, lr_ceiling: f64) -> Self {
        AdaptiveRateController {
            lr_inc,
            lr_dec,
            er,
            lr_floor,
            lr_ceiling,
            last_cost: 0.0,
            state: RateState::Stable,
        }
    }

    /// Training SSE of the previous epoch; zero before the first epoch.
    pub fn last_cost(&self) -> f64 {
        self.last_cost
    }

    pub fn state(&self) -> RateState {
        self.state
    }

    /// Classifies `sum_sse` against the previous epoch without side effects.
    /// A non-finite error always counts as regressing.
    pub fn classify(&self, sum_sse: f64) -> RateState {
        if !sum_sse.is_finite() || sum_sse > self.last_cost * self.er {
            RateState::Regressing
        } else if sum_sse < self.last_cost {
            RateState::Improving
        } else {
            RateState::Stable
        }
    }

    /// Runs the end-of-epoch transition.
    ///
    /// On `Regressing` the network is restored from `snapshot` (when one
    /// was taken) and the rate is multiplied by `lr_dec` if it is still at
    /// or above the floor; it never drops below the floor. On `Improving`
    /// the rate is multiplied by `lr_inc`, capped at the ceiling.
    /// `last_cost` becomes `sum_sse` unless `sum_sse` is not finite, in
    /// which case the previous cost is kept as the reference.
    pub fn end_epoch(
        &mut self,
        sum_sse: f64,
        sgd: &mut Sgd,
        network: &mut Network,
        snapshot: Option<&Snapshot>,
    ) -> RateState {
        let state = self.classify(sum_sse);
        match state {
            RateState::Regressing => {
                if let Some(snapshot) = snapshot {
                    network.restore(snapshot);
                    warn!(
                        sum_sse,
                        last_cost = self.last_cost,
                        "epoch regressed, weights rolled back"
                    );
                }
                if sgd.learning_rate >= self.lr_floor {
                    sgd.learning_rate = (sgd.learning_rate * self.lr_dec).max(self.lr_floor);
                }
            }
            RateState::Improving => {
                sgd.learning_rate = (sgd.learning_rate * self.lr_inc).min(self.lr_ceiling);
            }
            RateState::Stable => {}
        }
        if sum_sse.is_finite() {
            self.last_cost = sum_sse;
        }
        self.state = state;
        state
    }
}
