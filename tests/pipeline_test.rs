use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rusty_tuning::error::TuningError;
use rusty_tuning::fit::fit_tuning_curve;
use rusty_tuning::rate::compute_firing_rates;
use rusty_tuning::spike_train::{simulate_spike_train, simulate_spike_trains, SpikeTrain};
use rusty_tuning::stimulus::generate_orientations;
use rusty_tuning::tuning::tuning_response;

#[test]
fn test_recover_noiseless_tuning() {
    let orientations = generate_orientations(8).unwrap();
    let rates = tuning_response(&orientations, 45.0, 3.0, 5.0, 20.0);

    let fit = fit_tuning_curve(&orientations, &rates).unwrap();
    let params = fit.params();

    assert!((params.preferred_orientation - 45.0).abs() < 2.0);
    assert!(((params.kappa - 3.0) / 3.0).abs() < 0.1);
    assert!((params.baseline - 5.0).abs() < 0.5);
    assert!((params.amplitude - 20.0).abs() < 0.5);
}

#[test]
fn test_recover_tuning_from_spikes() {
    let orientations = generate_orientations(16).unwrap();
    let true_rates = tuning_response(&orientations, 90.0, 2.0, 10.0, 60.0);

    let duration = 50.0;
    let mut rng = StdRng::seed_from_u64(42);
    let spike_trains = simulate_spike_trains(&true_rates, duration, 0.001, &mut rng).unwrap();
    let rates = compute_firing_rates(&spike_trains, duration).unwrap();

    // With 50 s trials, the rate estimates are within a few Hz of the truth
    for (rate, true_rate) in rates.iter().zip(true_rates.iter()) {
        assert_abs_diff_eq!(rate, true_rate, epsilon = 5.0);
    }

    let fit = fit_tuning_curve(&orientations, &rates).unwrap();
    assert_abs_diff_eq!(fit.params().preferred_orientation, 90.0, epsilon = 5.0);
    assert_abs_diff_eq!(fit.params().baseline + fit.params().amplitude, 70.0, epsilon = 5.0);
}

#[test]
fn test_simulation_reproducible_with_seed() {
    let spike_trains: Vec<SpikeTrain> = (0..3)
        .map(|_| {
            let mut rng = StdRng::seed_from_u64(7);
            simulate_spike_train(30.0, 2.0, 0.001, &mut rng).unwrap()
        })
        .collect();
    assert_eq!(spike_trains[0], spike_trains[1]);
    assert_eq!(spike_trains[1], spike_trains[2]);
}

#[test]
fn test_rate_of_known_spike_train() {
    let spike_train = SpikeTrain::build(&[0.1, 0.2, 0.3, 0.4, 0.5, 1.7], 2.5).unwrap();
    let rates = compute_firing_rates(&[spike_train], 2.5).unwrap();
    assert_eq!(rates, vec![6.0 / 2.5]);
}

#[test]
fn test_errors_are_distinguishable() {
    let orientations = generate_orientations(8).unwrap();
    let mismatch = fit_tuning_curve(&orientations, &[1.0, 2.0]).unwrap_err();
    assert!(mismatch.is_invalid_argument());

    let too_few = fit_tuning_curve(&orientations[..3], &[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(too_few, TuningError::ConvergenceError(_)));
    assert!(!too_few.is_invalid_argument());
}
