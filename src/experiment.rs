//! End-to-end orientation tuning experiment.
//!
//! An experiment chains the whole pipeline: orientations are generated, ground-truth rates are computed from the
//! tuning model, one spike train per orientation is simulated, firing rates are estimated from the spike trains,
//! and the tuning parameters are finally recovered from the estimated rates.
//!
//! The outcome holds everything needed to draw a spike raster (spike trains and orientations) and a tuning curve
//! (orientations, observed and predicted rates).
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::fit::{fit_tuning_curve_with, FitOptions, FitResult};
use crate::rate::compute_aligned_firing_rates;
use crate::spike_train::{par_simulate_spike_trains, simulate_spike_trains, SpikeTrain};
use crate::stimulus::generate_orientations;
use crate::tuning::TuningParameters;
use crate::{DEFAULT_DT, DEFAULT_DURATION, DEFAULT_NUM_ORIENTATIONS};

/// The configuration of an experiment.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// The number of stimulus orientations.
    pub num_orientations: usize,
    /// The ground-truth tuning of the simulated neuron.
    pub tuning: TuningParameters,
    /// The trial duration (in seconds).
    pub duration: f64,
    /// The simulation time step (in seconds).
    pub dt: f64,
    /// The seed of the random number generator(s).
    pub seed: u64,
    /// Whether to simulate the spike trains in parallel, one random stream per orientation.
    pub parallel: bool,
    /// Settings of the curve fitting.
    pub fit: FitOptions,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            num_orientations: DEFAULT_NUM_ORIENTATIONS,
            tuning: TuningParameters::default(),
            duration: DEFAULT_DURATION,
            dt: DEFAULT_DT,
            seed: 0,
            parallel: false,
            fit: FitOptions::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load a configuration from a JSON file. Missing fields take their default value.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, TuningError> {
        let file = File::open(path).map_err(|e| TuningError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| TuningError::IOError(e.to_string()))
    }

    /// Check the configuration before running anything.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.num_orientations < 1 {
            return Err(TuningError::InvalidParameter(
                "The number of orientations must be at least 1.".to_string(),
            ));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(TuningError::InvalidParameter(
                "The duration must be a positive number.".to_string(),
            ));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(TuningError::InvalidParameter(
                "The time step must be a positive number.".to_string(),
            ));
        }
        if !self.tuning.is_finite() {
            return Err(TuningError::InvalidParameter(
                "The tuning parameters must be finite numbers.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything produced by an experiment, aligned by orientation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ExperimentOutcome {
    /// The stimulus orientations (in degrees).
    pub orientations: Vec<f64>,
    /// The ground-truth tuning parameters.
    pub ground_truth: TuningParameters,
    /// The ground-truth firing rates (in Hz).
    pub true_rates: Vec<f64>,
    /// The simulated spike trains.
    pub spike_trains: Vec<SpikeTrain>,
    /// The firing rates estimated from the spike trains (in Hz).
    pub observed_rates: Vec<f64>,
    /// The fitted tuning curve.
    pub fit: FitResult,
}

/// Run an experiment with the given configuration.
///
/// The function returns an error for an invalid configuration, and a convergence error if the fitting fails.
pub fn run(config: &ExperimentConfig) -> Result<ExperimentOutcome, TuningError> {
    config.validate()?;

    let orientations = generate_orientations(config.num_orientations)?;
    let true_rates = config.tuning.evaluate(&orientations);
    log::info!(
        "Generated {} orientations with ground truth {:?}",
        orientations.len(),
        config.tuning
    );

    let spike_trains = if config.parallel {
        par_simulate_spike_trains(&true_rates, config.duration, config.dt, config.seed)?
    } else {
        let mut rng = StdRng::seed_from_u64(config.seed);
        simulate_spike_trains(&true_rates, config.duration, config.dt, &mut rng)?
    };
    log::info!(
        "Simulated {} spikes in total",
        spike_trains.iter().map(|st| st.num_spikes()).sum::<usize>()
    );

    let observed_rates = compute_aligned_firing_rates(&orientations, &spike_trains, config.duration)?;

    let fit = fit_tuning_curve_with(&orientations, &observed_rates, &config.fit)?;
    log::info!("Recovered tuning parameters: {:?}", fit.params());

    Ok(ExperimentOutcome {
        orientations,
        ground_truth: config.tuning,
        true_rates,
        spike_trains,
        observed_rates,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ExperimentConfig::default().validate().is_ok());

        let config = ExperimentConfig {
            num_orientations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TuningError::InvalidParameter(_))));

        let config = ExperimentConfig {
            dt: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TuningError::InvalidParameter(_))));

        let config = ExperimentConfig {
            duration: -1.0,
            ..Default::default()
        };
        assert!(matches!(run(&config), Err(TuningError::InvalidParameter(_))));
    }

    #[test]
    fn test_run_aligned_and_reproducible() {
        let config = ExperimentConfig {
            num_orientations: 12,
            tuning: TuningParameters::new(60.0, 2.0, 10.0, 40.0),
            duration: 5.0,
            ..Default::default()
        };

        let outcome = run(&config).unwrap();
        assert_eq!(outcome.orientations.len(), 12);
        assert_eq!(outcome.true_rates.len(), 12);
        assert_eq!(outcome.spike_trains.len(), 12);
        assert_eq!(outcome.observed_rates.len(), 12);
        assert_eq!(outcome.fit.predicted().len(), 12);
        assert_eq!(outcome.ground_truth, config.tuning);

        assert_eq!(run(&config).unwrap(), outcome);
    }

    #[test]
    fn test_run_parallel_reproducible() {
        let config = ExperimentConfig {
            num_orientations: 24,
            tuning: TuningParameters::new(90.0, 2.0, 10.0, 40.0),
            duration: 5.0,
            parallel: true,
            ..Default::default()
        };
        assert_eq!(run(&config).unwrap(), run(&config).unwrap());
    }

    #[test]
    fn test_run_too_few_orientations() {
        let config = ExperimentConfig {
            num_orientations: 3,
            ..Default::default()
        };
        assert!(matches!(run(&config), Err(TuningError::ConvergenceError(_))));
    }

    #[test]
    fn test_config_serde() {
        let config: ExperimentConfig =
            serde_json::from_str(r#"{"num_orientations": 16, "seed": 7}"#).unwrap();
        assert_eq!(config.num_orientations, 16);
        assert_eq!(config.seed, 7);
        assert_eq!(config.dt, DEFAULT_DT);
        assert_eq!(config.tuning, TuningParameters::default());
    }
}
