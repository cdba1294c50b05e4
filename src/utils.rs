use crate::errors::TreeError;
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Ordering;

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), TreeError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(TreeError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_min_parameter(value: usize, min: usize, parameter: &str) -> Result<(), TreeError> {
    if value < min {
        Err(TreeError::InvalidParameter(
            parameter.to_string(),
            format!("integer of at least {}", min),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Draw an integer uniformly from `[low, high)`.
#[inline]
pub fn rand_int(low: usize, high: usize, rng: &mut StdRng) -> usize {
    debug_assert!(low < high);
    rng.gen_range(low..high)
}

/// Draw a float uniformly from `[low, high)`.
///
/// Falls back to `low` when the draw is not representable inside the
/// range, as happens with infinite bounds.
#[inline]
pub fn rand_uniform(low: f64, high: f64, rng: &mut StdRng) -> f64 {
    let u = rng.gen::<f64>();
    // Interpolating avoids the overflow of `high - low`.
    let v = low * (1.0 - u) + high * u;
    if v >= low && v < high {
        v
    } else {
        low
    }
}

/// Threshold between two consecutive distinct sorted values `a < b`,
/// such that `a <= t < b`.
#[inline]
pub fn midpoint(a: f64, b: f64) -> f64 {
    let t = a / 2.0 + b / 2.0;
    if t >= a && t < b {
        t
    } else {
        a
    }
}

/// Reorder `idx[start..stop]` so that every sample whose feature value is
/// `<= threshold` comes first. Returns the absolute position of the first
/// sample on the right hand side.
#[inline]
pub fn pivot_on_threshold(start: usize, stop: usize, idx: &mut [usize], feature: &[f64], threshold: f64) -> usize {
    let mut p = start;
    let mut partition_end = stop;
    while p < partition_end {
        if feature[idx[p]] <= threshold {
            p += 1;
        } else {
            partition_end -= 1;
            idx.swap(p, partition_end);
        }
    }
    partition_end
}

/// Same as [`pivot_on_threshold`], but the feature values are already laid
/// out by position in `values` and are swapped along with the indices.
#[inline]
pub fn pivot_on_threshold_cached(
    start: usize,
    stop: usize,
    idx: &mut [usize],
    values: &mut [f64],
    threshold: f64,
) -> usize {
    let mut p = start;
    let mut partition_end = stop;
    while p < partition_end {
        if values[p] <= threshold {
            p += 1;
        } else {
            partition_end -= 1;
            values.swap(p, partition_end);
            idx.swap(p, partition_end);
        }
    }
    partition_end
}

/// Indices that would sort `values` ascending.
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
    idx
}

#[inline]
pub fn total_cmp_pair(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0)
}

#[inline]
pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn test_round() {
        assert_eq!(0.3, precision_round(0.3333, 1));
        assert_eq!(0.2343, precision_round(0.2343123123123, 4));
    }

    #[test]
    fn test_validate_float_parameter() {
        assert!(validate_float_parameter(0.2, 0.0, 0.5, "min_weight_fraction_leaf").is_ok());
        assert!(validate_float_parameter(0.7, 0.0, 0.5, "min_weight_fraction_leaf").is_err());
        assert!(validate_float_parameter(f64::NAN, 0.0, 0.5, "min_weight_fraction_leaf").is_err());
    }

    #[test]
    fn test_validate_min_parameter() {
        assert!(validate_min_parameter(2, 2, "min_samples_split").is_ok());
        let err = validate_min_parameter(1, 2, "min_samples_split").unwrap_err();
        assert!(matches!(err, TreeError::InvalidParameter(..)));
    }

    #[test]
    fn test_rand_draws_advance() {
        let mut rng = StdRng::seed_from_u64(0);
        let draws: Vec<usize> = (0..50).map(|_| rand_int(0, 1000, &mut rng)).collect();
        assert!(draws.iter().all(|d| *d < 1000));
        // An evolving sequence, not the same value over and over.
        assert!(draws.windows(2).any(|w| w[0] != w[1]));

        let u = rand_uniform(2.0, 3.0, &mut rng);
        assert!((2.0..3.0).contains(&u));
    }

    #[test]
    fn test_rand_uniform_extreme_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let u = rand_uniform(-1e308, 1.7e308, &mut rng);
            assert!(u.is_finite());
            assert!((-1e308..1.7e308).contains(&u));
        }
        let u = rand_uniform(f64::NEG_INFINITY, f64::INFINITY, &mut rng);
        assert_eq!(u, f64::NEG_INFINITY);
        let u = rand_uniform(0.0, f64::MAX, &mut rng);
        assert!((0.0..f64::MAX).contains(&u));
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint(1.0, 2.0), 1.5);
        assert_eq!(midpoint(1e308, 1.7e308), 1.35e308);
        assert_eq!(midpoint(f64::NEG_INFINITY, f64::INFINITY), f64::NEG_INFINITY);
        assert_eq!(midpoint(3.0, f64::INFINITY), 3.0);
        assert_eq!(midpoint(f64::NEG_INFINITY, 3.0), f64::NEG_INFINITY);
        let b = 1.0 + f64::EPSILON;
        assert_eq!(midpoint(1.0, b), 1.0);
    }

    #[test]
    fn test_pivot() {
        let mut rng = StdRng::seed_from_u64(0);
        let feature: Vec<f64> = (0..100).map(|_| rng.gen_range(0..15) as f64).collect();
        let mut idx: Vec<usize> = (0..100).collect();
        idx.shuffle(&mut rng);
        let untouched_head = idx[..10].to_vec();
        let untouched_tail = idx[90..].to_vec();

        let threshold = 7.0;
        let pos = pivot_on_threshold(10, 90, &mut idx, &feature, threshold);
        assert!((10..=90).contains(&pos));
        assert!(idx[10..pos].iter().all(|i| feature[*i] <= threshold));
        assert!(idx[pos..90].iter().all(|i| feature[*i] > threshold));
        assert_eq!(&idx[..10], &untouched_head[..]);
        assert_eq!(&idx[90..], &untouched_tail[..]);
    }

    #[test]
    fn test_pivot_all_one_side() {
        let feature = vec![1.0, 2.0, 3.0];
        let mut idx = vec![0, 1, 2];
        assert_eq!(pivot_on_threshold(0, 3, &mut idx, &feature, 5.0), 3);
        assert_eq!(pivot_on_threshold(0, 3, &mut idx, &feature, 0.0), 0);
    }

    #[test]
    fn test_pivot_cached() {
        let mut values = vec![5.0, 1.0, 4.0, 2.0];
        let mut idx = vec![10, 11, 12, 13];
        let pos = pivot_on_threshold_cached(0, 4, &mut idx, &mut values, 3.0);
        assert_eq!(pos, 2);
        for p in 0..4 {
            let expected = match idx[p] {
                10 => 5.0,
                11 => 1.0,
                12 => 4.0,
                _ => 2.0,
            };
            assert_eq!(values[p], expected);
        }
        assert!(values[..pos].iter().all(|v| *v <= 3.0));
    }

    #[test]
    fn test_argsort() {
        let v = vec![3.0, 1.0, 2.0, 1.0];
        assert_eq!(argsort(&v), vec![1, 3, 2, 0]);
    }
}
