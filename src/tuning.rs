//! The parametric orientation tuning model.
//!
//! The expected firing rate of the neuron for a stimulus with orientation θ is given by a von Mises-shaped curve
//!
//! r(θ) = baseline + amplitude · exp(κ · cos(θ - pref)) / exp(κ),
//!
//! where the angle difference is converted to radians.
//! The curve is normalized so that r(pref) = baseline + amplitude, whatever the concentration κ.
//! The same implementation is used to synthesize ground-truth rates and as the objective of the curve fitting.
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_AMPLITUDE, DEFAULT_BASELINE, KAPPA_GUESS};

/// The number of free parameters of the tuning model.
pub const NUM_PARAMS: usize = 4;

/// The parameters of an orientation tuning curve.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct TuningParameters {
    /// The preferred orientation (in degrees).
    pub preferred_orientation: f64,
    /// The concentration of the tuning curve, i.e., how sharply it peaks around the preferred orientation.
    pub kappa: f64,
    /// The baseline firing rate (in Hz).
    pub baseline: f64,
    /// The modulation amplitude (in Hz). A negative amplitude turns the peak into a trough.
    pub amplitude: f64,
}

impl Default for TuningParameters {
    fn default() -> Self {
        TuningParameters {
            preferred_orientation: 90.0,
            kappa: KAPPA_GUESS,
            baseline: DEFAULT_BASELINE,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl TuningParameters {
    /// Create a new set of tuning parameters.
    pub fn new(preferred_orientation: f64, kappa: f64, baseline: f64, amplitude: f64) -> Self {
        TuningParameters {
            preferred_orientation,
            kappa,
            baseline,
            amplitude,
        }
    }

    /// Create tuning parameters from an array ordered as (preferred orientation, kappa, baseline, amplitude).
    pub fn from_array(values: [f64; NUM_PARAMS]) -> Self {
        let [preferred_orientation, kappa, baseline, amplitude] = values;
        TuningParameters::new(preferred_orientation, kappa, baseline, amplitude)
    }

    /// Returns the parameters as an array ordered as (preferred orientation, kappa, baseline, amplitude).
    pub fn to_array(&self) -> [f64; NUM_PARAMS] {
        [
            self.preferred_orientation,
            self.kappa,
            self.baseline,
            self.amplitude,
        ]
    }

    /// Returns true if all parameters are finite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|p| p.is_finite())
    }

    /// Returns the normalized modulation exp(κ · (cos Δ - 1)) and the angle difference Δ (in radians).
    /// The modulation is exactly one at the preferred orientation.
    fn modulation(&self, theta: f64) -> (f64, f64) {
        let delta = (theta - self.preferred_orientation).to_radians();
        ((self.kappa * (delta.cos() - 1.0)).exp(), delta)
    }

    /// Returns the expected firing rate (in Hz) for a stimulus with the given orientation (in degrees).
    pub fn response(&self, theta: f64) -> f64 {
        let (modulation, _) = self.modulation(theta);
        self.baseline + self.amplitude * modulation
    }

    /// Returns the expected firing rates (in Hz) for every orientation.
    pub fn evaluate(&self, thetas: &[f64]) -> Vec<f64> {
        thetas.iter().map(|&theta| self.response(theta)).collect()
    }

    /// Returns the partial derivatives of the response with respect to
    /// (preferred orientation, kappa, baseline, amplitude) at the given orientation.
    pub fn gradient(&self, theta: f64) -> [f64; NUM_PARAMS] {
        let (modulation, delta) = self.modulation(theta);
        [
            self.amplitude * modulation * self.kappa * delta.sin() * 1_f64.to_radians(),
            self.amplitude * modulation * (delta.cos() - 1.0),
            1.0,
            modulation,
        ]
    }
}

/// Returns the expected firing rates (in Hz) of a neuron with the given tuning parameters, for every orientation.
///
/// # Examples
///
/// ```rust
/// use rusty_tuning::tuning::tuning_response;
///
/// let rates = tuning_response(&[45.0, 135.0], 45.0, 3.0, 5.0, 20.0);
/// assert_eq!(rates[0], 25.0);
/// assert!(rates[1] < rates[0]);
/// ```
pub fn tuning_response(
    thetas: &[f64],
    preferred_orientation: f64,
    kappa: f64,
    baseline: f64,
    amplitude: f64,
) -> Vec<f64> {
    TuningParameters::new(preferred_orientation, kappa, baseline, amplitude).evaluate(thetas)
}
