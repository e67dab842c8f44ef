//! This crate provides tools for simulating and analyzing the orientation tuning of V1-like neurons in Rust.
//!
//! # Simulating Responses
//!
//! ```rust
//! use rusty_tuning::stimulus::generate_orientations;
//! use rusty_tuning::tuning::TuningParameters;
//! use rusty_tuning::spike_train::simulate_spike_trains;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! // Eight orientations evenly spaced over [0, 180)
//! let orientations = generate_orientations(8).unwrap();
//!
//! // Ground-truth tuning of the neuron
//! let params = TuningParameters::new(45.0, 3.0, 5.0, 20.0);
//! let rates = params.evaluate(&orientations);
//!
//! // One spike train per orientation
//! let mut rng = StdRng::seed_from_u64(42);
//! let spike_trains = simulate_spike_trains(&rates, 1.0, 0.001, &mut rng).unwrap();
//!
//! assert_eq!(spike_trains.len(), 8);
//! ```
//!
//! # Fitting Tuning Curves
//!
//! ```rust
//! use rusty_tuning::stimulus::generate_orientations;
//! use rusty_tuning::tuning::tuning_response;
//! use rusty_tuning::fit::fit_tuning_curve;
//!
//! let orientations = generate_orientations(8).unwrap();
//! let rates = tuning_response(&orientations, 45.0, 3.0, 5.0, 20.0);
//!
//! // Recover the parameters from noiseless rates
//! let fit = fit_tuning_curve(&orientations, &rates).unwrap();
//! assert!((fit.params().preferred_orientation - 45.0).abs() < 2.0);
//! assert!((fit.params().baseline - 5.0).abs() < 0.5);
//! ```
//!
//! # Running a Whole Experiment
//!
//! ```rust
//! use rusty_tuning::experiment::{self, ExperimentConfig};
//!
//! let config = ExperimentConfig {
//!     num_orientations: 16,
//!     duration: 10.0,
//!     ..Default::default()
//! };
//! let outcome = experiment::run(&config).unwrap();
//! assert_eq!(outcome.observed_rates.len(), outcome.orientations.len());
//! ```

pub mod error;
pub mod experiment;
pub mod fit;
pub mod rate;
pub mod spike_train;
pub mod stimulus;
pub mod tuning;

/// The orientation range (in degrees) over which stimuli are spread.
pub const ORIENTATION_RANGE: f64 = 180.0;
/// The default number of stimulus orientations.
pub const DEFAULT_NUM_ORIENTATIONS: usize = 8;
/// The default trial duration (in seconds).
pub const DEFAULT_DURATION: f64 = 1.0;
/// The default simulation time step (in seconds).
pub const DEFAULT_DT: f64 = 0.001;
/// The default baseline firing rate (in Hz).
pub const DEFAULT_BASELINE: f64 = 5.0;
/// The default modulation amplitude (in Hz).
pub const DEFAULT_AMPLITUDE: f64 = 20.0;
/// The initial guess for the concentration parameter when fitting.
pub const KAPPA_GUESS: f64 = 2.0;
/// The minimum number of data points to fit the four tuning parameters.
pub const MIN_FIT_POINTS: usize = 4;
/// Minimum number of spike trains to consider parallel simulation.
pub const MIN_PARALLEL_TRAINS: usize = 16;
