// Z-score primitives shared by the composite scorer and the comparison
// metrics.

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single metric across a player pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Smallest standard deviation used as a z-score divisor.
///
/// A pool where every player posts the same value has no spread; dividing
/// by this floor keeps the result finite and maps every member to 0.0.
pub const STDEV_FLOOR: f64 = 1e-6;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the sample standard deviation (N - 1 denominator); a single value
/// has no spread and gets a stdev of 0.0.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return PoolStats { mean, stdev: 0.0 };
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Divides by `max(stdev, STDEV_FLOOR)`, so a constant pool yields 0.0 for
/// every member instead of NaN or infinity.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    (value - stats.mean) / stats.stdev.max(STDEV_FLOOR)
}

/// Standardize a whole column against its own pool stats.
///
/// Output order matches input order. An empty slice gives an empty vector
/// and a constant column gives all zeros.
pub fn zscores(values: &[f64]) -> Vec<f64> {
    let stats = compute_pool_stats(values);
    values.iter().map(|v| compute_zscore(*v, &stats)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn pool_stats_known_values() {
        // Sample variance of [2,4,4,4,5,5,7,9] is 32/7.
        let stats = compute_pool_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx_eq(stats.mean, 5.0, 1e-12));
        assert!(approx_eq(stats.stdev, (32.0_f64 / 7.0).sqrt(), 1e-12));
    }

    #[test]
    fn pool_stats_empty_and_single() {
        assert_eq!(
            compute_pool_stats(&[]),
            PoolStats {
                mean: 0.0,
                stdev: 0.0
            }
        );
        let one = compute_pool_stats(&[42.0]);
        assert!(approx_eq(one.mean, 42.0, 1e-12));
        assert_eq!(one.stdev, 0.0);
    }

    #[test]
    fn constant_column_scores_zero() {
        let z = zscores(&[3.0, 3.0, 3.0]);
        assert!(z.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn zscore_column_is_standardized() {
        let values = [0.310, 0.355, 0.298, 0.402, 0.331, 0.287, 0.366];
        let z = zscores(&values);
        let stats = compute_pool_stats(&z);
        assert!(approx_eq(stats.mean, 0.0, 1e-9));
        assert!(approx_eq(stats.stdev, 1.0, 1e-9));
    }

    #[test]
    fn zscore_sign_follows_mean() {
        let stats = PoolStats {
            mean: 10.0,
            stdev: 2.0,
        };
        assert!(approx_eq(compute_zscore(14.0, &stats), 2.0, 1e-12));
        assert!(approx_eq(compute_zscore(7.0, &stats), -1.5, 1e-12));
    }
}
