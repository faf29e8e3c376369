use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, Level};

use ferrite_mlp::{
    data::dataset::{normalize, read_records, stratified_split, DEFAULT_TEST_COUNTS},
    train::evaluate::evaluate,
    LabeledExample, Network, NetworkSpec, TrainConfig, Trainer,
};

#[derive(Parser)]
#[command(name = "ferrite-mlp", about = "Train and evaluate a from-scratch MLP classifier")]
struct Cli {
    /// Log every epoch and model I/O
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a network on a `name,features...,label` file
    Train {
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        /// Hidden layer sizes, input to output
        #[arg(long, value_delimiter = ',', default_value = "8,4,1")]
        hidden: Vec<usize>,
        /// JSON file with training hyperparameters
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        #[arg(short, long, value_name = "INT")]
        epochs: Option<usize>,
        #[arg(long)]
        learning_rate: Option<f64>,
        #[arg(long)]
        momentum: Option<f64>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Sort the training set by label instead of keeping it shuffled
        #[arg(long)]
        sort: bool,
        /// Print a progress line every N epochs
        #[arg(long, default_value_t = 100)]
        report_every: usize,
        /// Where to write the trained model (`.json` for JSON, binary otherwise)
        #[arg(short, long, value_name = "PATH")]
        save: Option<PathBuf>,
    },
    /// Score a saved model on the held-out split of a data file
    Evaluate {
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        /// Must match the seed used for training to reproduce its split
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn install_logger(verbose: bool) -> Result<(), Box<dyn Error>> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt().compact().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

type Split = (Vec<LabeledExample>, Vec<LabeledExample>);

fn prepare(data: &Path, seed: u64, sort: bool) -> Result<Split, Box<dyn Error>> {
    let mut records = read_records(data)?;
    normalize(&mut records);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Ok(stratified_split(records, &DEFAULT_TEST_COUNTS, sort, &mut rng))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    install_logger(cli.verbose)?;

    match cli.command {
        Command::Train {
            data,
            hidden,
            config,
            epochs,
            learning_rate,
            momentum,
            seed,
            sort,
            report_every,
            save,
        } => {
            let (train, test) = prepare(&data, seed, sort)?;
            let width = train.first().map(|e| e.features.len()).unwrap_or(0);
            info!(train = train.len(), test = test.len(), width, "dataset ready");

            let mut cfg = match config {
                Some(path) => TrainConfig::load_json(path)?,
                None => TrainConfig::default(),
            };
            if let Some(e) = epochs {
                cfg.max_epochs = e;
            }
            if let Some(lr) = learning_rate {
                cfg.learning_rate = lr;
            }
            if let Some(m) = momentum {
                cfg.momentum = m;
            }

            let spec = NetworkSpec::new(hidden).with_input_size(width);
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
            let network = Network::new(spec, &mut rng)?;
            let mut trainer = Trainer::new(network, cfg)?;

            let every = report_every.max(1);
            let outcome = trainer.fit(&train, &test, |r| {
                if r.epoch % every == 0 {
                    info!(
                        "epoch {:>5}  train {:>10.5}  test {:>10.5}  lr {:.5}  correct {:>6.2}%",
                        r.epoch, r.train_error, r.test_error, r.learning_rate, r.percent_correct
                    );
                }
            })?;

            println!("epochs run:      {}", outcome.epoch + 1);
            println!("test SSE:        {:.6}", outcome.test_error);
            println!("correct:         {:.2}%", outcome.percent_correct);
            for (example, predicted) in test.iter().zip(&outcome.predictions) {
                println!("  label {:>2}  predicted {:>7.3}", example.label, predicted);
            }

            if let Some(path) = save {
                let network = trainer.into_network();
                if is_json(&path) {
                    network.save_json(&path)?;
                } else {
                    network.save(&path)?;
                }
                println!("model written to {}", path.display());
            }
        }
        Command::Evaluate { model, data, seed } => {
            let network = if is_json(&model) {
                Network::load_json(&model)?
            } else {
                Network::load(&model)?
            };
            let (_, test) = prepare(&data, seed, false)?;
            let evaluation = evaluate(&network, &test)?;
            println!("test SSE:        {:.6}", evaluation.sse);
            println!("correct:         {:.2}%", evaluation.percent_correct);
        }
    }

    Ok(())
}
