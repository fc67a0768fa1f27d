use std::{
    io::{self, Write},
    num::NonZeroUsize,
    path::PathBuf,
    process,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use machine_learning::{Dataset, Trainer, TrainingConfig, parse_input};

const DEFAULT_DATASET: &str = "data.csv";

/// Fits a line to a two column CSV dataset and predicts a value for a given input.
#[derive(Debug, Parser)]
#[command(name = "gold-prediction", version)]
struct Args {
    /// Header-less CSV file with one `x,y` pair per row.
    #[arg(default_value = DEFAULT_DATASET)]
    dataset: PathBuf,

    /// Step size for gradient descent [default: 0.01]
    #[arg(short, long)]
    learning_rate: Option<f64>,

    /// Number of gradient descent iterations [default: 1000]
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Log the training progress every N iterations [default: 100]
    #[arg(long)]
    log_every: Option<NonZeroUsize>,

    /// JSON file with a training configuration, explicit flags take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Value to predict for, prompted on stdin when missing.
    #[arg(long)]
    input: Option<String>,
}

impl Args {
    /// Merges the configuration file, if any, with the flags given on the command line.
    fn training_config(&self) -> Result<TrainingConfig> {
        let base = match &self.config {
            Some(path) => TrainingConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            None => TrainingConfig::default(),
        };

        let config = TrainingConfig::new(
            self.learning_rate.unwrap_or(base.learning_rate()),
            self.iterations.unwrap_or(base.iterations()),
        )?
        .with_log_every(self.log_every.unwrap_or(base.log_every()));

        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.training_config()?;
    debug!("training config: {config:?}");

    let dataset = Dataset::from_csv_path(&args.dataset).context("Failed to load dataset")?;
    info!(
        "training on {} samples from {}",
        dataset.len(),
        args.dataset.display()
    );

    let fitted = Trainer::new(config).train(&dataset)?;
    debug!("fitted regression: {}", serde_json::to_string(&fitted)?);

    println!("Trained Model: {}", fitted.model());
    println!("In original units: {}", fitted.original_line());

    let raw = match args.input {
        Some(raw) => raw,
        None => prompt("Enter a value to predict: ")?,
    };
    let value = parse_input(&raw)?;

    println!("Predicted value: {:.2}", fitted.predict(value));
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{msg}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read the value to predict")?;

    Ok(line)
}
