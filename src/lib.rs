//! # Reservoir Percentiles
//!
//! Approximate percentiles over an unbounded stream of observations, in bounded memory.
//!
//! A [`Reservoir`] keeps a uniform random sample of everything it has been fed, using
//! Algorithm R. At reporting time, [`compute_percentiles`] sorts that sample and reads the
//! requested ranks off it. The estimate's error shrinks as the reservoir's capacity grows,
//! and the memory and extraction cost grow with it.
//!
//! ## Features
//!
//! - Fixed memory: at most `capacity` samples, allocated on first use.
//! - The random source is passed in by the caller, so sampling is reproducible under a
//!   seeded generator.
//! - Querying before any data arrives is well defined and yields zeros.
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use reservoir_percentiles::Reservoir;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut reservoir = Reservoir::with_capacity(100);
//!
//! // Record five latencies
//! for latency in [10_i64, 20, 30, 40, 50] {
//!     reservoir.ingest(latency, &mut rng);
//! }
//!
//! // Estimate the minimum, the median and the 80th percentile
//! let estimates = reservoir.percentiles(&[0.0, 0.5, 0.8]).unwrap();
//! assert_eq!(estimates, vec![10, 30, 50]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

mod percentile;
mod reservoir;

pub use percentile::compute_percentiles;
#[doc(hidden)]
pub use percentile::exact_percentile;
pub use reservoir::Reservoir;
pub use reservoir::DEFAULT_CAPACITY;

/// The conventional sample type: a 64-bit integer measurement such as a latency in
/// microseconds or a size in bytes.
pub type Sample = i64;

/// Errors returned when a requested percentile rank cannot be mapped onto the samples.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PercentileError {
    /// The rank was below zero.
    #[error("percentile rank {rank} is negative")]
    NegativeRank {
        /// The offending rank.
        rank: f64,
    },
    /// The rank was not a number.
    #[error("percentile rank is NaN")]
    NanRank,
}
