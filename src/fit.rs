//! This module provides the nonlinear least-squares fitting of tuning curves.
//!
//! The four tuning parameters are recovered from observed firing rates with a single Levenberg-Marquardt run,
//! started from a heuristic initial guess. No bounds are imposed on the parameters, and there is no restart:
//! the quality of the fit depends on the initial guess and on the noise in the rates.
use itertools::Itertools;
use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::storage::Owned;
use nalgebra::{Const, DVector, Dyn, OMatrix, Vector4, U4};
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::tuning::{TuningParameters, NUM_PARAMS};
use crate::{KAPPA_GUESS, MIN_FIT_POINTS};

/// Settings of the curve fitting.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// The initial guess for the concentration parameter.
    pub kappa_guess: f64,
    /// Relative tolerance on the reduction of the sum of squares.
    pub ftol: f64,
    /// Relative tolerance on the change of the parameters.
    pub xtol: f64,
    /// Tolerance on the orthogonality between the residuals and the Jacobian columns.
    pub gtol: f64,
    /// The optimizer stops after `patience * (NUM_PARAMS + 1)` evaluations.
    pub patience: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            kappa_guess: KAPPA_GUESS,
            ftol: f64::EPSILON.sqrt(),
            xtol: f64::EPSILON.sqrt(),
            gtol: 0.0,
            patience: 100,
        }
    }
}

/// The outcome of a successful curve fitting.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FitResult {
    /// The estimated tuning parameters.
    params: TuningParameters,
    /// The predicted firing rate at every fitted orientation.
    predicted: Vec<f64>,
    /// The final sum of squared residuals.
    cost: f64,
    /// The number of evaluations of the residuals.
    num_evaluations: usize,
}

impl FitResult {
    /// Returns the estimated tuning parameters.
    pub fn params(&self) -> &TuningParameters {
        &self.params
    }

    /// Returns the predicted firing rate at every fitted orientation.
    pub fn predicted(&self) -> &[f64] {
        &self.predicted[..]
    }

    /// Returns the final sum of squared residuals.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the number of evaluations of the residuals.
    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }

    /// Returns the residuals (predicted minus observed) with respect to the given rates.
    pub fn residuals(&self, rates: &[f64]) -> Result<Vec<f64>, TuningError> {
        if rates.len() != self.predicted.len() {
            return Err(TuningError::LengthMismatch {
                expected: self.predicted.len(),
                found: rates.len(),
            });
        }
        Ok(self
            .predicted
            .iter()
            .zip_eq(rates)
            .map(|(p, r)| p - r)
            .collect())
    }

    /// Returns the estimated parameters together with the predicted rates.
    pub fn into_parts(self) -> (TuningParameters, Vec<f64>) {
        (self.params, self.predicted)
    }
}

/// The least-squares problem of matching the tuning model to observed rates.
struct TuningProblem<'a> {
    orientations: &'a [f64],
    rates: &'a [f64],
    params: TuningParameters,
}

impl LeastSquaresProblem<f64, Dyn, U4> for TuningProblem<'_> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, U4>;
    type ParameterStorage = Owned<f64, U4>;

    fn set_params(&mut self, x: &Vector4<f64>) {
        self.params = TuningParameters::from_array([x[0], x[1], x[2], x[3]]);
    }

    fn params(&self) -> Vector4<f64> {
        Vector4::from(self.params.to_array())
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        Some(DVector::from_iterator(
            self.orientations.len(),
            self.orientations
                .iter()
                .zip(self.rates)
                .map(|(&theta, &rate)| self.params.response(theta) - rate),
        ))
    }

    fn jacobian(&self) -> Option<OMatrix<f64, Dyn, U4>> {
        let gradients: Vec<[f64; NUM_PARAMS]> = self
            .orientations
            .iter()
            .map(|&theta| self.params.gradient(theta))
            .collect();
        Some(OMatrix::<f64, Dyn, U4>::from_fn_generic(
            Dyn(gradients.len()),
            Const::<NUM_PARAMS>,
            |i, j| gradients[i][j],
        ))
    }
}

fn check_observations(orientations: &[f64], rates: &[f64]) -> Result<(), TuningError> {
    if orientations.len() != rates.len() {
        return Err(TuningError::LengthMismatch {
            expected: orientations.len(),
            found: rates.len(),
        });
    }
    if orientations.iter().chain(rates).any(|v| !v.is_finite()) {
        return Err(TuningError::InvalidParameter(
            "The orientations and rates must be finite numbers.".to_string(),
        ));
    }
    Ok(())
}

/// Returns the heuristic starting point of the fitting:
/// - the preferred orientation is the (first) orientation with the highest rate,
/// - kappa is the provided guess,
/// - the baseline is the lowest rate,
/// - the amplitude is the difference between the highest and the lowest rates.
///
/// The function returns an error for misaligned or empty observations.
pub fn initial_guess(
    orientations: &[f64],
    rates: &[f64],
    kappa_guess: f64,
) -> Result<TuningParameters, TuningError> {
    check_observations(orientations, rates)?;

    let (min_rate, max_rate) = rates
        .iter()
        .copied()
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .ok_or_else(|| {
            TuningError::InvalidParameter("At least one observation is required.".to_string())
        })?;

    let argmax = rates
        .iter()
        .enumerate()
        .fold(0, |best, (i, &rate)| if rate > rates[best] { i } else { best });

    Ok(TuningParameters::new(
        orientations[argmax],
        kappa_guess,
        min_rate,
        max_rate - min_rate,
    ))
}

/// Fit the tuning model to the observed rates, with the default settings.
///
/// See [`fit_tuning_curve_with`].
pub fn fit_tuning_curve(orientations: &[f64], rates: &[f64]) -> Result<FitResult, TuningError> {
    fit_tuning_curve_with(orientations, rates, &FitOptions::default())
}

/// Fit the tuning model to the observed rates by nonlinear least squares.
///
/// The function returns an error for misaligned or non-finite observations, and a convergence error if there are
/// fewer observations than parameters or if the optimizer fails to converge.
pub fn fit_tuning_curve_with(
    orientations: &[f64],
    rates: &[f64],
    options: &FitOptions,
) -> Result<FitResult, TuningError> {
    check_observations(orientations, rates)?;

    if orientations.len() < MIN_FIT_POINTS {
        return Err(TuningError::ConvergenceError(format!(
            "{} observations cannot determine {} parameters",
            orientations.len(),
            NUM_PARAMS
        )));
    }

    let guess = initial_guess(orientations, rates, options.kappa_guess)?;
    log::debug!("Initial guess: {:?}", guess);

    let problem = TuningProblem {
        orientations,
        rates,
        params: guess,
    };

    let (problem, report) = LevenbergMarquardt::new()
        .with_ftol(options.ftol)
        .with_xtol(options.xtol)
        .with_gtol(options.gtol)
        .with_patience(options.patience)
        .minimize(problem);

    if !report.termination.was_successful() {
        log::warn!(
            "Curve fitting failed after {} evaluations: {:?}",
            report.number_of_evaluations,
            report.termination
        );
        return Err(TuningError::ConvergenceError(format!(
            "{:?}",
            report.termination
        )));
    }

    let params = problem.params;
    if !params.is_finite() {
        return Err(TuningError::ConvergenceError(format!(
            "non-finite parameters {:?}",
            params
        )));
    }

    let predicted = params.evaluate(orientations);
    let cost = predicted
        .iter()
        .zip(rates)
        .map(|(p, r)| (p - r).powi(2))
        .sum();

    log::info!(
        "Curve fitting converged after {} evaluations ({:?}): {:?}",
        report.number_of_evaluations,
        report.termination,
        params
    );

    Ok(FitResult {
        params,
        predicted,
        cost,
        num_evaluations: report.number_of_evaluations,
    })
}
