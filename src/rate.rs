//! Estimation of firing rates from spike trains.
use crate::error::TuningError;
use crate::spike_train::SpikeTrain;

/// Returns the firing rate (in Hz) of every spike train, i.e., its number of spikes divided by the trial duration.
///
/// The rates are in the same order as the spike trains.
/// The function returns an error for a non-positive duration.
///
/// # Examples
///
/// ```rust
/// use rusty_tuning::rate::compute_firing_rates;
/// use rusty_tuning::spike_train::SpikeTrain;
///
/// let spike_trains = vec![
///     SpikeTrain::build(&[0.1, 0.4, 1.2], 2.0).unwrap(),
///     SpikeTrain::empty(2.0).unwrap(),
/// ];
/// assert_eq!(compute_firing_rates(&spike_trains, 2.0).unwrap(), vec![1.5, 0.0]);
/// ```
pub fn compute_firing_rates(
    spike_trains: &[SpikeTrain],
    duration: f64,
) -> Result<Vec<f64>, TuningError> {
    if !(duration.is_finite() && duration > 0.0) {
        return Err(TuningError::InvalidParameter(
            "The duration must be a positive number.".to_string(),
        ));
    }

    Ok(spike_trains
        .iter()
        .map(|spike_train| spike_train.num_spikes() as f64 / duration)
        .collect())
}

/// Returns the firing rates of the spike trains, checking that there is exactly one spike train per orientation.
pub fn compute_aligned_firing_rates(
    orientations: &[f64],
    spike_trains: &[SpikeTrain],
    duration: f64,
) -> Result<Vec<f64>, TuningError> {
    if orientations.len() != spike_trains.len() {
        return Err(TuningError::LengthMismatch {
            expected: orientations.len(),
            found: spike_trains.len(),
        });
    }
    compute_firing_rates(spike_trains, duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_firing_rates() {
        let spike_trains = vec![
            SpikeTrain::build(&[0.0, 0.25, 0.5], 0.75).unwrap(),
            SpikeTrain::empty(0.75).unwrap(),
            SpikeTrain::build(&[0.7], 0.75).unwrap(),
        ];
        let rates = compute_firing_rates(&spike_trains, 0.75).unwrap();
        assert_eq!(rates, vec![3.0 / 0.75, 0.0, 1.0 / 0.75]);

        assert_eq!(compute_firing_rates(&[], 1.0).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn test_compute_firing_rates_invalid_duration() {
        let spike_trains = vec![SpikeTrain::empty(1.0).unwrap()];
        assert!(matches!(
            compute_firing_rates(&spike_trains, 0.0),
            Err(TuningError::InvalidParameter(_))
        ));
        assert!(matches!(
            compute_firing_rates(&spike_trains, -1.0),
            Err(TuningError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_compute_aligned_firing_rates() {
        let spike_trains = vec![
            SpikeTrain::build(&[0.5], 1.0).unwrap(),
            SpikeTrain::empty(1.0).unwrap(),
        ];
        assert_eq!(
            compute_aligned_firing_rates(&[0.0, 90.0], &spike_trains, 1.0).unwrap(),
            vec![1.0, 0.0]
        );
        assert_eq!(
            compute_aligned_firing_rates(&[0.0, 60.0, 120.0], &spike_trains, 1.0),
            Err(TuningError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }
}
