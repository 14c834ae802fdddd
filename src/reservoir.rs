//! The sampling reservoir: a bounded, uniform random subset of a stream.

use log::debug;
use rand::Rng;

/// Number of samples retained by [`Reservoir::new`].
pub const DEFAULT_CAPACITY: usize = 1000;

/// A fixed-capacity reservoir maintained with Algorithm R.
///
/// After `n` items have been ingested, each of them is retained with probability
/// `min(1, capacity / n)`. Backing storage for the samples is allocated on the first
/// ingestion and released by [`Reservoir::reset`] or when the reservoir is dropped.
///
/// The reservoir does no locking of its own. Every mutating operation, including
/// percentile extraction, takes `&mut self`; hosts that share one reservoir between
/// producers and a reporter wrap it in a `Mutex`.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use reservoir_percentiles::Reservoir;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut reservoir = Reservoir::with_capacity(100);
/// for latency in 0_i64..10_000 {
///     reservoir.ingest(latency, &mut rng);
/// }
///
/// assert_eq!(reservoir.len(), 100);
/// assert_eq!(reservoir.count_seen(), 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
    capacity: usize,
    samples: Option<Vec<T>>,
    count_seen: u64,
}

impl<T> Reservoir<T> {
    /// Creates an empty reservoir holding up to [`DEFAULT_CAPACITY`] samples.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty reservoir holding up to `capacity` samples.
    ///
    /// No storage is allocated until the first call to [`Reservoir::ingest`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reservoir_percentiles::Reservoir;
    ///
    /// let reservoir = Reservoir::<i64>::with_capacity(512);
    /// assert_eq!(reservoir.capacity(), 512);
    /// assert!(!reservoir.is_allocated());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "reservoir capacity must be greater than zero");

        Self {
            capacity,
            samples: None,
            count_seen: 0,
        }
    }

    /// Returns the reservoir to its freshly created state, releasing any backing storage.
    ///
    /// Calling this on an already empty reservoir does nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use reservoir_percentiles::Reservoir;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut reservoir = Reservoir::with_capacity(10);
    /// reservoir.extend(0_i64..100, &mut rng);
    ///
    /// reservoir.reset();
    /// assert_eq!(reservoir.len(), 0);
    /// assert_eq!(reservoir.count_seen(), 0);
    /// assert!(!reservoir.is_allocated());
    /// ```
    pub fn reset(&mut self) {
        if self.samples.take().is_some() {
            debug!(
                "released reservoir storage after {} items seen",
                self.count_seen
            );
        }
        self.count_seen = 0;
    }

    /// Offers one observation to the reservoir.
    ///
    /// While the reservoir has free slots the item is always kept. Once it is full, a
    /// slot is drawn uniformly from `0..=count_seen` (the total before this item is
    /// counted); the item replaces that slot when it falls inside the reservoir and is
    /// discarded otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use reservoir_percentiles::Reservoir;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut reservoir = Reservoir::with_capacity(3);
    /// reservoir.ingest(10_i64, &mut rng);
    /// reservoir.ingest(20, &mut rng);
    ///
    /// assert_eq!(reservoir.samples(), &[10, 20]);
    /// ```
    pub fn ingest<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        let capacity = self.capacity;
        let samples = self.samples.get_or_insert_with(|| {
            debug!("allocating reservoir storage for {capacity} samples");
            Vec::with_capacity(capacity)
        });

        if samples.len() < capacity {
            samples.push(item);
        } else {
            let slot = rng.gen_range(0..=self.count_seen);
            if slot < capacity as u64 {
                samples[slot as usize] = item;
            }
        }

        self.count_seen += 1;
    }

    /// Ingests every item of `items`, in order.
    pub fn extend<I, R>(&mut self, items: I, rng: &mut R)
    where
        I: IntoIterator<Item = T>,
        R: Rng + ?Sized,
    {
        for item in items {
            self.ingest(item, rng);
        }
    }

    /// Returns the maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of samples currently retained.
    pub fn len(&self) -> usize {
        self.samples.as_ref().map_or(0, Vec::len)
    }

    /// Returns `true` when no sample is retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the reservoir holds `capacity` samples.
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Returns the total number of items ingested since creation or the last reset.
    pub fn count_seen(&self) -> u64 {
        self.count_seen
    }

    /// Returns `true` while backing storage is held.
    pub fn is_allocated(&self) -> bool {
        self.samples.is_some()
    }

    /// Returns the retained samples.
    ///
    /// Their order carries no meaning and changes whenever percentiles are extracted.
    pub fn samples(&self) -> &[T] {
        self.samples.as_deref().unwrap_or(&[])
    }

    /// Consumes the reservoir and returns the retained samples.
    pub fn into_samples(self) -> Vec<T> {
        self.samples.unwrap_or_default()
    }

    /// Returns the probability that any single ingested item is currently retained.
    ///
    /// This is `min(1, capacity / count_seen)`, or `0.0` before anything was ingested.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use reservoir_percentiles::Reservoir;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut reservoir = Reservoir::with_capacity(10);
    /// reservoir.extend(0_i64..40, &mut rng);
    /// assert_eq!(reservoir.sampling_probability(), 0.25);
    /// ```
    pub fn sampling_probability(&self) -> f64 {
        if self.count_seen == 0 {
            0.0
        } else {
            (self.capacity as f64 / self.count_seen as f64).min(1.0)
        }
    }

    /// Mutable view of the retained samples, `None` before the first ingestion.
    pub(crate) fn samples_mut(&mut self) -> Option<&mut [T]> {
        self.samples.as_deref_mut()
    }
}

impl<T> Default for Reservoir<T> {
    fn default() -> Self {
        Self::new()
    }
}
