//! Fretnet CLI - dataset generation for guitar fret classifiers
//!
//! # Commands
//!
//! - `fretnet generate` - Render the training and test sets
//! - `fretnet inspect` - Print shapes and label statistics of a stored set
//!
//! # Usage
//!
//! ```bash
//! # Render data/train and data/test from recordings in samples/
//! fretnet generate --samples samples
//!
//! # Regenerate with a larger set and a fixed seed
//! fretnet generate --train-size 5000 --seed 7 --force
//!
//! # Label statistics of the B string in the test set
//! fretnet inspect data/test --string 4
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use clap::{Args, Parser, Subcommand};
use fretnet::{
    create_input_data, needs_input_data, DatasetConfig, Error, ExampleGenerator,
    MissingAssetPolicy, Result, WavSampleStore, FRET_COUNT,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fretnet CLI - dataset generation for guitar fret classifiers
#[derive(Parser)]
#[command(name = "fretnet")]
#[command(about = "Synthetic guitar chord spectrogram datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the training and test sets
    Generate(GenerateArgs),

    /// Print shapes and label statistics of a stored set
    Inspect(InspectArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Directory of `<pitch>.wav` recordings
    #[arg(long, default_value = "samples")]
    samples: PathBuf,

    /// JSON dataset config; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    train_dir: Option<PathBuf>,

    #[arg(long)]
    test_dir: Option<PathBuf>,

    #[arg(long)]
    train_size: Option<usize>,

    #[arg(long)]
    test_size: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Redraw examples with missing recordings up to N times instead of aborting
    #[arg(long, value_name = "N")]
    redraw: Option<usize>,

    /// Fail on silent mixes instead of writing blank images
    #[arg(long)]
    reject_silent: bool,

    /// Regenerate even if both sets already exist
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Dataset directory
    #[arg(default_value = fretnet::config::DEFAULT_TRAIN_DIR)]
    dir: PathBuf,

    /// String whose labels to summarize (0 = low E)
    #[arg(long, default_value_t = 0)]
    string: usize,
}

fn load_config(path: Option<&PathBuf>) -> Result<DatasetConfig> {
    let Some(path) = path else {
        return Ok(DatasetConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(dir) = args.train_dir {
        config.train_dir = dir;
    }
    if let Some(dir) = args.test_dir {
        config.test_dir = dir;
    }
    if let Some(n) = args.train_size {
        config.training_set_size = n;
    }
    if let Some(n) = args.test_size {
        config.test_set_size = n;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_attempts) = args.redraw {
        config.missing_assets = MissingAssetPolicy::Redraw { max_attempts };
    }
    config.generator.reject_silent |= args.reject_silent;
    config.validate()?;

    if !args.force && !needs_input_data(&config) {
        tracing::info!(
            train = %config.train_dir.display(),
            test = %config.test_dir.display(),
            "datasets already exist, skipping (use --force to regenerate)"
        );
        return Ok(());
    }

    let store = WavSampleStore::new(args.samples)?;
    let generator = ExampleGenerator::builder(store)
        .config(config.generator.clone())
        .build()?;

    let summary = create_input_data(&generator, &config)?;
    let (height, width, channels) = generator.input_shape();
    println!(
        "train: {} examples in {}",
        summary.train.examples,
        summary.train.dir.display()
    );
    println!(
        "test:  {} examples in {}",
        summary.test.examples,
        summary.test.dir.display()
    );
    println!("input shape: ({height}, {width}, {channels}), output shape: {FRET_COUNT}");
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let split = fretnet::dataset::load_dataset(args.string, &args.dir)?;

    println!("{}: {} examples", args.dir.display(), split.len());
    if let Some((height, width, channels)) = split.input_shape() {
        println!("input shape: ({height}, {width}, {channels})");
    }
    let histogram = split.fret_histogram();
    let muted = split.labels.iter().filter(|row| !row.contains(&true)).count();
    println!("string {}: {} unplayed", args.string, muted);
    for (fret, count) in histogram.iter().enumerate().filter(|(_, count)| **count > 0) {
        println!("  fret {fret:>2}: {count}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Inspect(args) => inspect(args),
    }
}
