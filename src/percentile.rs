//! Percentile extraction from a populated [`Reservoir`].

use log::trace;

use crate::{PercentileError, Reservoir};

/// Estimates one value per requested rank from the samples held in `reservoir`.
///
/// Each rank is a fraction, `0.99` meaning the 99th percentile. Ranks need not be sorted
/// or unique; the result holds one estimate per rank, in the same order. The estimate for
/// rank `p` is the sample at index `floor(len * p)` of the sorted samples, clamped to the
/// last index so that `p >= 1.0` yields the largest retained value.
///
/// The samples are sorted in place, so their order inside the reservoir changes. A
/// reservoir that has never ingested anything yields `T::default()` for every rank.
///
/// # Errors
///
/// Returns [`PercentileError::NegativeRank`] or [`PercentileError::NanRank`] for the
/// first invalid rank. The reservoir is left unsorted in that case.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use reservoir_percentiles::{compute_percentiles, Reservoir};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut reservoir = Reservoir::with_capacity(8);
/// reservoir.extend([50_i64, 10, 40, 20, 30], &mut rng);
///
/// let estimates = compute_percentiles(&mut reservoir, &[0.5, 0.0, 1.0]).unwrap();
/// assert_eq!(estimates, vec![30, 10, 50]);
/// ```
pub fn compute_percentiles<T>(
    reservoir: &mut Reservoir<T>,
    ranks: &[f64],
) -> Result<Vec<T>, PercentileError>
where
    T: Ord + Clone + Default,
{
    ranks.iter().try_for_each(|&rank| validate_rank(rank))?;

    let samples = match reservoir.samples_mut() {
        Some(samples) if !samples.is_empty() => samples,
        _ => return Ok(vec![T::default(); ranks.len()]),
    };

    samples.sort_unstable();

    Ok(ranks
        .iter()
        .map(|&rank| samples[rank_to_index(samples.len(), rank)].clone())
        .collect())
}

impl<T: Ord + Clone + Default> Reservoir<T> {
    /// Estimates the values at `ranks`. See [`compute_percentiles`].
    pub fn percentiles(&mut self, ranks: &[f64]) -> Result<Vec<T>, PercentileError> {
        compute_percentiles(self, ranks)
    }

    /// Estimates the value at a single `rank`. See [`compute_percentiles`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use reservoir_percentiles::Reservoir;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut reservoir = Reservoir::with_capacity(1000);
    /// reservoir.extend(1_i64..=100, &mut rng);
    ///
    /// assert_eq!(reservoir.percentile(0.99).unwrap(), 100);
    /// assert!(reservoir.percentile(-0.5).is_err());
    /// ```
    pub fn percentile(&mut self, rank: f64) -> Result<T, PercentileError> {
        let mut estimates = compute_percentiles(self, &[rank])?;
        Ok(estimates.pop().unwrap_or_default())
    }
}

/// Estimates the value at `rank` over all of `data`, using the same index rule as
/// [`compute_percentiles`].
#[doc(hidden)]
pub fn exact_percentile<T: Ord + Clone + Default>(data: &[T], rank: f64) -> T {
    if data.is_empty() {
        return T::default();
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    sorted[rank_to_index(sorted.len(), rank.max(0.0))].clone()
}

fn validate_rank(rank: f64) -> Result<(), PercentileError> {
    if rank.is_nan() {
        Err(PercentileError::NanRank)
    } else if rank < 0.0 {
        Err(PercentileError::NegativeRank { rank })
    } else {
        Ok(())
    }
}

/// Maps a non-negative rank onto an index of a sorted sequence of `len > 0` items.
fn rank_to_index(len: usize, rank: f64) -> usize {
    let index = (len as f64 * rank).floor();
    if index >= len as f64 {
        trace!("rank {rank} clamped to the largest of {len} samples");
        len - 1
    } else {
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn five_values() -> Reservoir<i64> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut reservoir = Reservoir::with_capacity(5);
        reservoir.extend([30_i64, 50, 10, 40, 20], &mut rng);
        reservoir
    }

    #[test]
    fn test_small_exact_set() {
        let mut reservoir = five_values();
        let estimates = reservoir.percentiles(&[0.0, 0.5, 0.8]).unwrap();
        assert_eq!(estimates, vec![10, 30, 50]);
    }

    #[test]
    fn test_rank_one_is_the_maximum() {
        let mut reservoir = five_values();
        assert_eq!(reservoir.percentile(1.0).unwrap(), 50);
        assert_eq!(reservoir.percentile(1.5).unwrap(), 50);
        assert_eq!(reservoir.percentile(f64::INFINITY).unwrap(), 50);
    }

    #[test]
    fn test_ranks_keep_input_order() {
        let mut reservoir = five_values();
        let estimates = reservoir.percentiles(&[0.99, 0.2, 0.2, 0.0]).unwrap();
        assert_eq!(estimates, vec![50, 20, 20, 10]);
        assert_eq!(reservoir.percentiles(&[]).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_extraction_sorts_in_place() {
        let mut reservoir = five_values();
        reservoir.percentiles(&[0.5]).unwrap();
        assert_eq!(reservoir.samples(), &[10, 20, 30, 40, 50]);
        assert_eq!(reservoir.count_seen(), 5);
    }

    #[test]
    fn test_empty_reservoir_yields_zeros() {
        let mut reservoir = Reservoir::<i64>::new();
        let estimates = reservoir.percentiles(&[0.0, 0.5, 0.99, 1.0]).unwrap();
        assert_eq!(estimates, vec![0, 0, 0, 0]);
        assert!(!reservoir.is_allocated());
    }

    #[test]
    fn test_reset_reservoir_yields_zeros() {
        let mut reservoir = five_values();
        reservoir.reset();
        assert_eq!(reservoir.percentiles(&[0.5, 1.0]).unwrap(), vec![0, 0]);
        assert_eq!(
            reservoir.percentiles(&[0.5, 1.0]),
            Reservoir::<i64>::new().percentiles(&[0.5, 1.0])
        );
    }

    #[test]
    fn test_invalid_ranks() {
        let mut reservoir = five_values();
        let before = reservoir.samples().to_vec();

        assert_eq!(
            reservoir.percentiles(&[0.5, -0.1]),
            Err(PercentileError::NegativeRank { rank: -0.1 })
        );
        assert_eq!(
            reservoir.percentiles(&[f64::NAN, -1.0]),
            Err(PercentileError::NanRank)
        );
        assert_eq!(reservoir.samples(), before.as_slice());

        assert_eq!(
            Reservoir::<i64>::new().percentile(-2.0),
            Err(PercentileError::NegativeRank { rank: -2.0 })
        );
    }

    #[test]
    fn test_monotonicity() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut reservoir = Reservoir::with_capacity(200);
        let mut state = 17_i64;
        for _ in 0..10_000 {
            state = (state * 1_103_515_245 + 12_345) % 1_000_003;
            reservoir.ingest(state, &mut rng);
        }

        let ranks: Vec<f64> = (0..=1000).map(|i| i as f64 / 1000.0).collect();
        let estimates = reservoir.percentiles(&ranks).unwrap();
        for pair in estimates.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_repeated_extraction_is_stable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut reservoir = Reservoir::with_capacity(100);
        reservoir.extend((0_i64..5000).rev(), &mut rng);

        let ranks = [0.5, 0.9, 0.99, 0.0, 1.0];
        let first = reservoir.percentiles(&ranks).unwrap();
        let second = reservoir.percentiles(&ranks).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_estimates_track_exact_percentiles() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<i64> = (0..100_000).map(|i| (i * 7919) % 100_000).collect();
        let mut reservoir = Reservoir::with_capacity(2000);
        reservoir.extend(values.iter().copied(), &mut rng);

        for &rank in &[0.1, 0.25, 0.5, 0.75, 0.9] {
            let expected = exact_percentile(&values, rank);
            let estimated = reservoir.percentile(rank).unwrap();
            assert!(
                (expected - estimated).abs() <= 5_000,
                "rank={}, expected={}, estimated={}",
                rank,
                expected,
                estimated
            );
        }
    }

    #[test]
    fn test_rank_to_index() {
        assert_eq!(rank_to_index(5, 0.0), 0);
        assert_eq!(rank_to_index(5, 0.5), 2);
        assert_eq!(rank_to_index(5, 0.8), 4);
        assert_eq!(rank_to_index(5, 0.99), 4);
        assert_eq!(rank_to_index(5, 1.0), 4);
        assert_eq!(rank_to_index(1, 0.7), 0);
    }
}
