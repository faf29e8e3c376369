pub mod backprop;
pub mod epoch_stats;
pub mod evaluate;
pub mod train_config;
pub mod trainer;

pub use backprop::compute_deltas;
pub use epoch_stats::{EpochReport, TrainingOutcome};
pub use evaluate::{evaluate, Evaluation};
pub use train_config::TrainConfig;
pub use trainer::{Trainer, TrainingState};
