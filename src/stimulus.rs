//! Generation of the stimulus orientations.
use crate::error::TuningError;
use crate::ORIENTATION_RANGE;

/// Returns `n` orientations (in degrees) evenly spaced over the half-open interval [0, 180).
///
/// The orientation 180 is never included since it is equivalent to 0 for an axis-symmetric stimulus.
///
/// # Examples
///
/// ```rust
/// use rusty_tuning::stimulus::generate_orientations;
///
/// let orientations = generate_orientations(4).unwrap();
/// assert_eq!(orientations, vec![0.0, 45.0, 90.0, 135.0]);
/// ```
pub fn generate_orientations(n: usize) -> Result<Vec<f64>, TuningError> {
    if n < 1 {
        return Err(TuningError::InvalidParameter(
            "The number of orientations must be at least 1.".to_string(),
        ));
    }

    Ok((0..n)
        .map(|i| ORIENTATION_RANGE * i as f64 / n as f64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_orientations() {
        assert_eq!(
            generate_orientations(0),
            Err(TuningError::InvalidParameter(
                "The number of orientations must be at least 1.".to_string()
            ))
        );

        assert_eq!(generate_orientations(1).unwrap(), vec![0.0]);
        assert_eq!(
            generate_orientations(8).unwrap(),
            vec![0.0, 22.5, 45.0, 67.5, 90.0, 112.5, 135.0, 157.5]
        );
    }

    #[test]
    fn test_generate_orientations_properties() {
        for n in 1..200 {
            let orientations = generate_orientations(n).unwrap();
            assert_eq!(orientations.len(), n);
            assert_eq!(orientations[0], 0.0);
            assert!(orientations.windows(2).all(|w| w[0] < w[1]));
            assert!(orientations.iter().all(|&theta| theta < ORIENTATION_RANGE));
        }
    }
}
