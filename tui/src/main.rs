use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use machine_learning::{Dataset, OriginalLine, Trainer, TrainingConfig};
use tui::{App, ChartData, PlotLine, Theme, parse_plot_line, run};

/// Shows a dataset next to one or more regression lines in the terminal.
#[derive(Debug, Parser)]
#[command(name = "plotter", version)]
struct Args {
    /// Header-less CSV file with one `x,y` pair per row.
    #[arg(default_value = "data.csv")]
    dataset: PathBuf,

    /// A line to draw, in the dataset's units, as LABEL=SLOPE,INTERCEPT. Repeatable.
    #[arg(long = "line", value_name = "LABEL=SLOPE,INTERCEPT", value_parser = parse_plot_line)]
    lines: Vec<(String, OriginalLine)>,

    /// Don't fit a line to the dataset, only draw the given ones.
    #[arg(long)]
    no_fit: bool,

    /// Step size for gradient descent.
    #[arg(short, long, default_value_t = 0.01)]
    learning_rate: f64,

    /// Number of gradient descent iterations.
    #[arg(short, long, default_value_t = 1000)]
    iterations: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let dataset = Dataset::from_csv_path(&args.dataset).context("Failed to load dataset")?;

    let mut lines: Vec<PlotLine> = args
        .lines
        .into_iter()
        .enumerate()
        .map(|(i, (label, line))| PlotLine::new(label, line, Theme::line_color(i)))
        .collect();

    if !args.no_fit {
        let config = TrainingConfig::new(args.learning_rate, args.iterations)?;
        let fitted = Trainer::new(config).train(&dataset)?;
        let line = fitted.original_line();
        info!("fitted line: {line}");

        lines.push(PlotLine::new("Fitted", line, Theme::line_color(lines.len())));
    }

    run(App::new(ChartData::new(&dataset, &lines)))
}
