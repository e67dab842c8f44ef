//! Module implementing the concept of a spike train, and its simulation from a firing rate.
//!
//! Spike trains are simulated with a discrete-time approximation of a Poisson process: the trial is split into bins
//! of width `dt`, and each bin independently holds a spike with probability `rate * dt`.
//! The approximation only makes sense for `rate * dt <= 1`; beyond, every bin tends to fire.
//!
//! Randomness is always drawn from a generator provided by the caller, so that reproducibility is controlled by
//! seeding that generator.
//!
//! # Examples
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rusty_tuning::spike_train::simulate_spike_train;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let spike_train = simulate_spike_train(20.0, 1.0, 0.001, &mut rng).unwrap();
//! assert!(spike_train.times().iter().all(|&t| t >= 0.0 && t < 1.0));
//! ```
use itertools::Itertools;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::MIN_PARALLEL_TRAINS;

/// Represents the (sorted) spike times of a neuron during a trial of a given duration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpikeTrain {
    /// The spike times (in seconds), sorted in increasing order and within [0, duration).
    times: Vec<f64>,
    /// The trial duration (in seconds).
    duration: f64,
}

impl SpikeTrain {
    /// Create a spike train with the specified spike times and trial duration.
    /// If necessary, the spike times are sorted.
    /// The function returns an error for invalid duration or spike times.
    pub fn build(times: &[f64], duration: f64) -> Result<Self, TuningError> {
        check_duration(duration)?;

        if let Some(t) = times.iter().find(|t| !t.is_finite()) {
            return Err(TuningError::InvalidSpikeTrain(format!(
                "spike time {} is not finite",
                t
            )));
        }

        if let Some(t) = times.iter().find(|&&t| t < 0.0 || t >= duration) {
            return Err(TuningError::InvalidSpikeTrain(format!(
                "spike time {} lies outside [0, {})",
                t, duration
            )));
        }

        let times = times
            .iter()
            .copied()
            .sorted_by(|t1, t2| t1.total_cmp(t2))
            .collect();

        Ok(SpikeTrain { times, duration })
    }

    /// Create an empty spike train.
    pub fn empty(duration: f64) -> Result<Self, TuningError> {
        SpikeTrain::build(&[], duration)
    }

    /// Returns the spike times of the spike train.
    pub fn times(&self) -> &[f64] {
        &self.times[..]
    }

    /// Returns the trial duration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the number of spikes in the spike train.
    pub fn num_spikes(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the spike train holds no spike.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the firing rate (in Hz) over the trial.
    pub fn firing_rate(&self) -> f64 {
        self.num_spikes() as f64 / self.duration
    }
}

fn check_duration(duration: f64) -> Result<(), TuningError> {
    if !(duration.is_finite() && duration > 0.0) {
        return Err(TuningError::InvalidParameter(
            "The duration must be a positive number.".to_string(),
        ));
    }
    Ok(())
}

fn check_simulation_parameters(rate: f64, duration: f64, dt: f64) -> Result<(), TuningError> {
    check_duration(duration)?;
    if !(dt.is_finite() && dt > 0.0) {
        return Err(TuningError::InvalidParameter(
            "The time step must be a positive number.".to_string(),
        ));
    }
    if !(rate.is_finite() && rate >= 0.0) {
        return Err(TuningError::InvalidParameter(
            "The firing rate must be a non-negative number.".to_string(),
        ));
    }
    Ok(())
}

/// Simulate a spike train for a neuron firing at the given rate (in Hz) during a trial of the given duration.
///
/// The trial is split into `floor(duration / dt)` bins, and a spike is emitted at the start of every bin whose
/// Bernoulli draw with probability `rate * dt` succeeds. At most one spike is emitted per bin.
/// A probability above one is not an error: every bin then fires.
///
/// The function returns an error for non-positive duration or time step, or for a negative firing rate.
pub fn simulate_spike_train<R: Rng>(
    rate: f64,
    duration: f64,
    dt: f64,
    rng: &mut R,
) -> Result<SpikeTrain, TuningError> {
    check_simulation_parameters(rate, duration, dt)?;

    let num_bins = (duration / dt).floor() as usize;
    let spike_prob = rate * dt;
    if spike_prob > 1.0 {
        log::warn!(
            "Spike probability per bin is {:.3} > 1 (rate {} Hz, dt {} s): the Poisson approximation breaks down",
            spike_prob,
            rate,
            dt
        );
    }

    let times: Vec<f64> = (0..num_bins)
        .filter(|_| rng.gen::<f64>() < spike_prob)
        .map(|n| n as f64 * dt)
        .collect();

    log::debug!(
        "Simulated {} spikes over {} bins at rate {} Hz",
        times.len(),
        num_bins,
        rate
    );

    Ok(SpikeTrain { times, duration })
}

/// Simulate one spike train per firing rate, in order, drawing from the same random number generator.
pub fn simulate_spike_trains<R: Rng>(
    rates: &[f64],
    duration: f64,
    dt: f64,
    rng: &mut R,
) -> Result<Vec<SpikeTrain>, TuningError> {
    rates
        .iter()
        .map(|&rate| simulate_spike_train(rate, duration, dt, rng))
        .collect()
}

/// Simulate one spike train per firing rate, possibly in parallel.
///
/// Every spike train draws from its own ChaCha stream, keyed by the seed and the position of its rate.
/// The result is thus reproducible for a given seed, whatever the number of threads.
pub fn par_simulate_spike_trains(
    rates: &[f64],
    duration: f64,
    dt: f64,
    seed: u64,
) -> Result<Vec<SpikeTrain>, TuningError> {
    let simulate = |(id, &rate): (usize, &f64)| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(id as u64);
        simulate_spike_train(rate, duration, dt, &mut rng)
    };

    if rates.len() >= MIN_PARALLEL_TRAINS {
        rates.par_iter().enumerate().map(simulate).collect()
    } else {
        rates.iter().enumerate().map(simulate).collect()
    }
}
