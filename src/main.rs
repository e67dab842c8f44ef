use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use rusty_tuning::error::TuningError;
use rusty_tuning::experiment::{self, ExperimentConfig};

/// Simulate the orientation tuning of a V1-like neuron and recover its tuning curve.
/// The outcome is printed as JSON on the standard output.
#[derive(Parser, Debug)]
struct Args {
    /// A JSON configuration file, overridden by the other arguments
    #[arg(long)]
    config: Option<PathBuf>,
    /// The seed used for spike train simulation
    #[arg(long)]
    seed: Option<u64>,
    /// The number of stimulus orientations
    #[arg(short = 'n', long)]
    num_orientations: Option<usize>,
    /// The preferred orientation (in degrees)
    #[arg(long)]
    pref: Option<f64>,
    /// The tuning concentration
    #[arg(long)]
    kappa: Option<f64>,
    /// The baseline firing rate (in Hz)
    #[arg(long)]
    baseline: Option<f64>,
    /// The modulation amplitude (in Hz)
    #[arg(long)]
    amplitude: Option<f64>,
    /// The trial duration (in seconds)
    #[arg(short = 'T', long)]
    duration: Option<f64>,
    /// The simulation time step (in seconds)
    #[arg(long)]
    dt: Option<f64>,
    /// Simulate the spike trains in parallel
    #[arg(long)]
    parallel: bool,
    /// The logging level (written to the standard error)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn experiment_config(&self) -> Result<ExperimentConfig, TuningError> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load_from(path)?,
            None => ExperimentConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(num_orientations) = self.num_orientations {
            config.num_orientations = num_orientations;
        }
        if let Some(pref) = self.pref {
            config.tuning.preferred_orientation = pref;
        }
        if let Some(kappa) = self.kappa {
            config.tuning.kappa = kappa;
        }
        if let Some(baseline) = self.baseline {
            config.tuning.baseline = baseline;
        }
        if let Some(amplitude) = self.amplitude {
            config.tuning.amplitude = amplitude;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        config.parallel |= self.parallel;

        Ok(config)
    }
}

fn init_logging(level: LevelFilter) -> Result<(), TuningError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| TuningError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| TuningError::IOError(e.to_string()))?;
    Ok(())
}

fn main() -> Result<(), TuningError> {
    let args = Args::parse();
    init_logging(args.log_level)?;

    log::info!("{:?}", args);

    let config = args.experiment_config()?;
    let outcome = experiment::run(&config)?;
    log::info!(
        "Experiment done! Fitted parameters: {:?} (cost {:.3})",
        outcome.fit.params(),
        outcome.fit.cost()
    );

    let json =
        serde_json::to_string_pretty(&outcome).map_err(|e| TuningError::IOError(e.to_string()))?;
    println!("{}", json);

    Ok(())
}
