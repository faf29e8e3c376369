use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::{
    error::{NetworkError, Result},
    optim::{adaptive::AdaptiveRateController, sgd::Sgd},
};

/// Hyperparameters for a training run.
///
/// Every field has a default, so a JSON config only needs the values it
/// overrides.
///
/// # Fields
/// - `learning_rate`: initial step size; adapted every epoch
/// - `momentum`: fraction of the previous step added to each update
/// - `max_epochs`: hard cap on the number of epochs
/// - `lr_inc` / `lr_dec`: rate multipliers on improving / regressing epochs
/// - `er`: tolerated error growth ratio before an epoch counts as regressing
/// - `goal`: training stops once the test SSE falls below this
/// - `lr_floor` / `lr_ceiling`: bounds for the adapted learning rate
/// - `momentum_enabled`: use the momentum rule instead of the plain one
/// - `epoch_rollback_enabled`: snapshot each epoch and restore it on regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub momentum: f64,
    pub max_epochs: usize,
    pub lr_inc: f64,
    pub lr_dec: f64,
    pub er: f64,
    pub goal: f64,
    pub lr_floor: f64,
    pub lr_ceiling: f64,
    pub momentum_enabled: bool,
    pub epoch_rollback_enabled: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 0.01,
            momentum: 0.1,
            max_epochs: 1000,
            lr_inc: 1.05,
            lr_dec: 0.7,
            er: 1.04,
            goal: 0.0002,
            lr_floor: 0.0001,
            lr_ceiling: 0.99,
            momentum_enabled: true,
            epoch_rollback_enabled: true,
        }
    }
}

impl TrainConfig {
    /// Defaults with the three values every run sets explicitly.
    pub fn new(learning_rate: f64, momentum: f64, max_epochs: usize) -> Self {
        TrainConfig { learning_rate, momentum, max_epochs, ..TrainConfig::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lr_floor > 0.0 && self.lr_floor < self.lr_ceiling) {
            return Err(NetworkError::hyper("lr_floor", format!(
                "{} must be positive and below lr_ceiling {}", self.lr_floor, self.lr_ceiling
            )));
        }
        if !(self.lr_ceiling.is_finite() && self.lr_ceiling > 0.0) {
            return Err(NetworkError::hyper("lr_ceiling", "must be positive and finite"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetworkError::hyper("learning_rate", "must be positive and finite"));
        }
        if self.learning_rate < self.lr_floor || self.learning_rate > self.lr_ceiling {
            return Err(NetworkError::hyper("learning_rate", format!(
                "{} is outside [{}, {}]", self.learning_rate, self.lr_floor, self.lr_ceiling
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(NetworkError::hyper("momentum", "must lie in [0, 1)"));
        }
        if self.max_epochs == 0 {
            return Err(NetworkError::hyper("max_epochs", "must be at least 1"));
        }
        if !(self.lr_inc >= 1.0 && self.lr_inc.is_finite()) {
            return Err(NetworkError::hyper("lr_inc", "must be at least 1"));
        }
        if !(self.lr_dec > 0.0 && self.lr_dec < 1.0) {
            return Err(NetworkError::hyper("lr_dec", "must lie in (0, 1)"));
        }
        if !(self.er >= 1.0 && self.er.is_finite()) {
            return Err(NetworkError::hyper("er", "must be at least 1"));
        }
        if !(self.goal >= 0.0) {
            return Err(NetworkError::hyper("goal", "must be non-negative"));
        }
        Ok(())
    }

    /// Optimizer matching the configured update rule.
    pub fn optimizer(&self) -> Sgd {
        if self.momentum_enabled {
            Sgd::with_momentum(self.learning_rate, self.momentum)
        } else {
            Sgd::new(self.learning_rate)
        }
    }

    pub fn controller(&self) -> AdaptiveRateController {
        AdaptiveRateController::new(
            self.lr_inc,
            self.lr_dec,
            self.er,
            self.lr_floor,
            self.lr_ceiling,
        )
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config from JSON.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
