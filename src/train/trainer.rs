use tracing::{debug, info};

use crate::{
    data::example::LabeledExample,
    error::{NetworkError, Result},
    loss::sse::SseLoss,
    network::network::{Network, Snapshot},
    optim::{
        adaptive::{AdaptiveRateController, RateState},
        sgd::Sgd,
    },
    train::{
        backprop::compute_deltas,
        epoch_stats::{EpochReport, TrainingOutcome},
        evaluate::evaluate,
        train_config::TrainConfig,
    },
};

/// Progress of a training run across epochs.
#[derive(Debug, Clone, Default)]
pub struct TrainingState {
    /// Number of epochs completed so far.
    pub epochs_run: usize,
    pub train_history: Vec<f64>,
    pub test_history: Vec<f64>,
    /// Parameters as they stood when the current epoch began.
    pub snapshot: Option<Snapshot>,
    pub goal_reached: bool,
}

/// Owns a network and drives the online training loop.
pub struct Trainer {
    network: Network,
    config: TrainConfig,
    sgd: Sgd,
    controller: AdaptiveRateController,
    state: TrainingState,
    last_report: Option<EpochReport>,
}

impl Trainer {
    pub fn new(network: Network, config: TrainConfig) -> Result<Trainer> {
        config.validate()?;
        let sgd = config.optimizer();
        let controller = config.controller();
        Ok(Trainer {
            network,
            config,
            sgd,
            controller,
            state: TrainingState::default(),
            last_report: None,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    pub fn learning_rate(&self) -> f64 {
        self.sgd.learning_rate
    }

    /// Training SSE of the most recent epoch.
    pub fn last_cost(&self) -> f64 {
        self.controller.last_cost()
    }

    /// True once the epoch cap or the error goal has been hit.
    pub fn is_finished(&self) -> bool {
        self.state.goal_reached || self.state.epochs_run >= self.config.max_epochs
    }

    /// Runs one epoch: an online pass over `train`, evaluation on `test`,
    /// then the adaptive rate step (which may roll the epoch back).
    ///
    /// After a rollback the test set is scored again, so the goal check and
    /// the report always describe the weights the trainer still holds.
    pub fn train_epoch(
        &mut self,
        train: &[LabeledExample],
        test: &[LabeledExample],
    ) -> Result<EpochReport> {
        if train.is_empty() {
            return Err(NetworkError::EmptyDataset("training"));
        }
        if test.is_empty() {
            return Err(NetworkError::EmptyDataset("test"));
        }

        let epoch = self.state.epochs_run;
        self.state.snapshot = self
            .config
            .epoch_rollback_enabled
            .then(|| self.network.snapshot());

        let mut sum_sse = 0.0;
        for example in train {
            let pass = self.network.forward(&example.features)?;
            let oe = SseLoss::residual(pass.output, example.label);
            sum_sse += SseLoss::loss(pass.output, example.label);
            let deltas = compute_deltas(&self.network, &pass, oe);
            self.sgd.step(&mut self.network, &example.features, &pass, &deltas, oe);
        }

        let mut evaluation = evaluate(&self.network, test)?;

        let rate_state = self.controller.end_epoch(
            sum_sse,
            &mut self.sgd,
            &mut self.network,
            self.state.snapshot.as_ref(),
        );
        if rate_state == RateState::Regressing && self.state.snapshot.is_some() {
            evaluation = evaluate(&self.network, test)?;
        }

        self.state.train_history.push(sum_sse);
        self.state.test_history.push(evaluation.sse);
        self.state.epochs_run += 1;
        if evaluation.sse < self.config.goal {
            self.state.goal_reached = true;
        }

        debug!(
            epoch,
            train_error = sum_sse,
            test_error = evaluation.sse,
            learning_rate = self.sgd.learning_rate,
            percent_correct = evaluation.percent_correct,
            ?rate_state,
            "epoch finished"
        );

        let report = EpochReport {
            epoch,
            train_error: sum_sse,
            test_error: evaluation.sse,
            learning_rate: self.sgd.learning_rate,
            percent_correct: evaluation.percent_correct,
            predictions: evaluation.predictions,
            rate_state,
        };
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Trains until the test error drops below `goal` or `max_epochs`
    /// epochs have run, calling `reporter` after every epoch.
    pub fn fit<F>(
        &mut self,
        train: &[LabeledExample],
        test: &[LabeledExample],
        mut reporter: F,
    ) -> Result<TrainingOutcome>
    where
        F: FnMut(&EpochReport),
    {
        while !self.is_finished() {
            let report = self.train_epoch(train, test)?;
            reporter(&report);
        }
        let outcome = self
            .outcome()
            .ok_or_else(|| NetworkError::hyper("max_epochs", "no epoch has run"))?;

        info!(
            epoch = outcome.epoch,
            test_error = outcome.test_error,
            percent_correct = outcome.percent_correct,
            goal_reached = outcome.goal_reached,
            "training finished"
        );
        Ok(outcome)
    }

    /// Summary of the run so far; `None` before the first epoch.
    pub fn outcome(&self) -> Option<TrainingOutcome> {
        let last = self.last_report.as_ref()?;
        Some(TrainingOutcome {
            percent_correct: last.percent_correct,
            test_error: last.test_error,
            test_history: self.state.test_history.clone(),
            epoch: last.epoch,
            train_history: self.state.train_history.clone(),
            predictions: last.predictions.clone(),
            goal_reached: self.state.goal_reached,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::NetworkSpec;

    fn dataset(n: usize, offset: usize) -> Vec<LabeledExample> {
        (0..n)
            .map(|i| {
                let label = ((i + offset) % 7 + 1) as f64;
                let features = (0..15)
                    .map(|j| (((i * 31 + j * 7 + offset) % 21) as f64 / 10.0) - 1.0)
                    .collect();
                LabeledExample::new(features, label)
            })
            .collect()
    }

    fn trainer(config: TrainConfig) -> Trainer {
        let net = Network::seeded(NetworkSpec::new(vec![8, 4, 1]), 2024).unwrap();
        Trainer::new(net, config).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let net = Network::seeded(NetworkSpec::new(vec![3]), 1).unwrap();
        let cfg = TrainConfig { learning_rate: 0.0, ..TrainConfig::default() };
        assert!(Trainer::new(net, cfg).is_err());
    }

    #[test]
    fn first_epoch_rolls_back_to_initial_weights() {
        let mut t = trainer(TrainConfig::new(0.01, 0.1, 10));
        let initial = t.network().snapshot();
        let report = t.train_epoch(&dataset(10, 0), &dataset(4, 3)).unwrap();

        assert_eq!(report.epoch, 0);
        assert_eq!(report.rate_state, RateState::Regressing);
        assert_eq!(t.network().snapshot(), initial);
        assert_eq!(report.learning_rate, 0.01 * 0.7);
        assert_eq!(t.last_cost(), report.train_error);
    }

    #[test]
    fn rolled_back_epoch_reports_restored_weights() {
        let (train, test) = (dataset(10, 0), dataset(4, 3));
        let mut t = trainer(TrainConfig::new(0.01, 0.1, 10));
        let initial = evaluate(t.network(), &test).unwrap();

        let report = t.train_epoch(&train, &test).unwrap();
        assert_eq!(report.rate_state, RateState::Regressing);
        assert_eq!(report.test_error, initial.sse);
        assert_eq!(report.predictions, initial.predictions);
        assert_eq!(report.percent_correct, initial.percent_correct);
        assert_eq!(t.state().test_history, vec![initial.sse]);
    }

    #[test]
    fn goal_is_judged_on_the_weights_kept() {
        let (train, test) = (dataset(10, 0), dataset(4, 3));
        let initial_sse = {
            let t = trainer(TrainConfig::default());
            evaluate(t.network(), &test).unwrap().sse
        };

        // epoch 0 always rolls back, so a goal just above the untrained error
        // is met by the restored weights and nothing else
        let cfg = TrainConfig { goal: initial_sse * 1.0001, ..TrainConfig::new(0.01, 0.1, 20) };
        let mut t = trainer(cfg);
        let outcome = t.fit(&train, &test, |_| {}).unwrap();

        let kept = evaluate(t.network(), &test).unwrap();
        assert_eq!(kept.sse, outcome.test_error);
        assert_eq!(kept.predictions, outcome.predictions);
        assert!(outcome.goal_reached);
        assert!(kept.sse < t.config().goal);
    }

    #[test]
    fn without_rollback_the_first_epoch_is_kept() {
        let cfg = TrainConfig { epoch_rollback_enabled: false, ..TrainConfig::new(0.01, 0.1, 10) };
        let mut t = trainer(cfg);
        let initial = t.network().snapshot();
        t.train_epoch(&dataset(10, 0), &dataset(4, 3)).unwrap();
        assert_ne!(t.network().snapshot(), initial);
        assert!(t.state().snapshot.is_none());
    }

    #[test]
    fn fit_stops_at_max_epochs_and_reports_each_epoch() {
        let cfg = TrainConfig { goal: 0.0, ..TrainConfig::new(0.05, 0.1, 12) };
        let mut t = trainer(cfg);
        let mut seen = Vec::new();
        let outcome = t
            .fit(&dataset(10, 0), &dataset(5, 2), |r| seen.push(r.epoch))
            .unwrap();

        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(outcome.epoch, 11);
        assert_eq!(outcome.train_history.len(), 12);
        assert_eq!(outcome.test_history.len(), 12);
        assert!(!outcome.goal_reached);
        assert!(t.is_finished());
    }

    #[test]
    fn fit_stops_once_goal_is_met() {
        let cfg = TrainConfig { goal: f64::MAX, ..TrainConfig::new(0.05, 0.1, 50) };
        let mut t = trainer(cfg);
        let outcome = t.fit(&dataset(10, 0), &dataset(5, 2), |_| {}).unwrap();
        assert_eq!(outcome.epoch, 0);
        assert!(outcome.goal_reached);
        assert_eq!(outcome.train_history.len(), 1);
    }

    #[test]
    fn learning_rate_stays_bounded() {
        let cfg = TrainConfig { goal: 0.0, ..TrainConfig::new(0.9, 0.2, 60) };
        let mut t = trainer(cfg);
        let (train, test) = (dataset(10, 0), dataset(5, 2));
        while !t.is_finished() {
            let report = t.train_epoch(&train, &test).unwrap();
            assert!(report.learning_rate >= 0.0001 && report.learning_rate <= 0.99);
            t.network().check_shapes().unwrap();
        }
    }

    #[test]
    fn fit_without_any_epoch_is_a_config_error() {
        let mut t = trainer(TrainConfig::default());
        // only reachable by skipping validation
        t.config.max_epochs = 0;
        assert!(t.outcome().is_none());
        assert!(matches!(
            t.fit(&dataset(4, 0), &dataset(2, 1), |_| {}),
            Err(NetworkError::InvalidHyperparameter { name: "max_epochs", .. })
        ));
    }

    #[test]
    fn empty_sets_are_rejected() {
        let mut t = trainer(TrainConfig::default());
        assert!(matches!(
            t.train_epoch(&[], &dataset(2, 0)),
            Err(NetworkError::EmptyDataset("training"))
        ));
        assert!(matches!(
            t.train_epoch(&dataset(2, 0), &[]),
            Err(NetworkError::EmptyDataset("test"))
        ));
    }
}
