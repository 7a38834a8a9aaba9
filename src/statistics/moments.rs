//! Weighted running mean and variance
//!
//! Streaming first and second moments using the weighted form of Welford's
//! numerically stable online algorithm. Accumulators can be merged, which is
//! how ingestion is parallelised: one accumulator per shard, merged at the end.

use crate::io::{ByteSink, ByteSource, TransferError};
use crate::math;
use crate::traits::{DecodeError, MergeError, Sketch};

const FIELD_LEN: usize = 8;
const NUM_FIELDS: usize = 5;

/// Size of the binary encoding produced by [`WeightedStats::write`]
pub const ENCODED_LEN: usize = FIELD_LEN * NUM_FIELDS;

/// Weighted running statistics using Welford's algorithm
///
/// Tracks mean, population and sample variance over a stream of weighted
/// values in O(1) memory. Nothing is guarded: an empty accumulator or one
/// with a total weight at or below one yields NaN or infinite variances, and
/// NaN inputs propagate into every statistic. Check [`count`](Self::count) or
/// [`sum_weight`](Self::sum_weight) before interpreting the result.
///
/// # Example
///
/// ```
/// use streamvar::statistics::WeightedStats;
///
/// let mut stats = WeightedStats::new();
///
/// for value in [1.0, 1.0, 1.0, 0.0, 0.0, 0.0] {
///     stats.add(value);
/// }
///
/// assert_eq!(stats.count(), 6);
/// assert!((stats.mean() - 0.5).abs() < 1e-12);
/// assert!((stats.variance() - 0.25).abs() < 1e-12);
/// assert!((stats.sample_variance() - 0.3).abs() < 1e-12);
/// ```
///
/// # Distributed Usage
///
/// ```
/// use streamvar::statistics::WeightedStats;
///
/// let mut shard1 = WeightedStats::new();
/// let mut shard2 = WeightedStats::new();
///
/// for v in [1.0, 2.0, 3.0] {
///     shard1.add(v);
/// }
/// for v in [4.0, 5.0, 6.0] {
///     shard2.add(v);
/// }
///
/// shard1.merge(&shard2);
/// assert_eq!(shard1.count(), 6);
/// assert!((shard1.mean() - 3.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightedStats {
    /// Number of add calls
    count: u64,
    /// Weighted running mean
    mean: f64,
    /// Sum of weights
    sum_weight: f64,
    /// Sum of squared weights
    sum_weight_sq: f64,
    /// Weighted sum of squared deviations (M2)
    weighted_sum_sq_dev: f64,
}

impl WeightedStats {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            sum_weight: 0.0,
            sum_weight_sq: 0.0,
            weighted_sum_sq_dev: 0.0,
        }
    }

    /// Add a value with weight 1
    #[inline]
    pub fn add(&mut self, value: f64) {
        self.add_weighted(value, 1.0);
    }

    /// Add a weighted value
    ///
    /// Weights are not validated. Zero or negative weights are folded in as
    /// given.
    pub fn add_weighted(&mut self, value: f64, weight: f64) {
        self.count += 1;
        self.sum_weight += weight;
        self.sum_weight_sq += weight * weight;

        // The step uses the updated total weight, and M2 takes the deviation
        // from both the old and the new mean.
        let mean_before = self.mean;
        self.mean = mean_before + (weight / self.sum_weight) * (value - mean_before);
        self.weighted_sum_sq_dev += weight * (value - mean_before) * (value - self.mean);
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Number of values added
    ///
    /// This counts calls, not weight. See [`sum_weight`](Self::sum_weight).
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Weighted mean, 0 when empty
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Total weight added
    pub fn sum_weight(&self) -> f64 {
        self.sum_weight
    }

    /// Sum of the squared weights
    pub fn sum_weight_sq(&self) -> f64 {
        self.sum_weight_sq
    }

    /// Population variance
    ///
    /// Divides by the total weight. May come out as a tiny negative number
    /// through rounding when all values are equal.
    pub fn variance(&self) -> f64 {
        self.weighted_sum_sq_dev / self.sum_weight
    }

    /// Sample variance (Bessel's correction on the total weight)
    ///
    /// Not meaningful unless the total weight exceeds one.
    pub fn sample_variance(&self) -> f64 {
        self.weighted_sum_sq_dev / (self.sum_weight - 1.0)
    }

    /// Population standard deviation
    pub fn standard_deviation(&self) -> f64 {
        math::sqrt(self.variance())
    }

    /// Sample standard deviation
    pub fn sample_standard_deviation(&self) -> f64 {
        math::sqrt(self.sample_variance())
    }

    /// Kish's effective sample size, `sum_weight² / sum_weight_sq`
    ///
    /// Equals [`count`](Self::count) when every weight is the same.
    pub fn effective_sample_size(&self) -> f64 {
        self.sum_weight * self.sum_weight / self.sum_weight_sq
    }

    /// Merge another accumulator into this one
    ///
    /// Uses the parallel combination of Chan et al. generalised to weights.
    /// The result matches feeding `other`'s values into `self` directly, up
    /// to rounding. Merging two empty accumulators yields a NaN mean.
    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.sum_weight += other.sum_weight;
        self.sum_weight_sq += other.sum_weight_sq;

        let mean_before = self.mean;
        self.mean =
            mean_before + (other.sum_weight / self.sum_weight) * (other.mean - mean_before);
        self.weighted_sum_sq_dev += other.weighted_sum_sq_dev
            + other.sum_weight * (other.mean - mean_before) * (other.mean - self.mean);
    }

    /// Fold a set of shard accumulators into one
    ///
    /// Empty shards are skipped, so an empty shard never turns the result
    /// into NaN. Returns an empty accumulator if every shard is empty.
    pub fn merge_all<'a, I>(shards: I) -> Self
    where
        I: IntoIterator<Item = &'a WeightedStats>,
    {
        let mut total = Self::new();
        for shard in shards.into_iter().filter(|s| !s.is_empty()) {
            total.merge(shard);
        }

        #[cfg(feature = "log")]
        log::trace!(
            "merged shards: count={} sum_weight={}",
            total.count,
            total.sum_weight
        );

        total
    }

    /// Write the 40-byte big-endian encoding to `sink`
    ///
    /// Fields go out in order: count, mean, sum of weights, sum of squared
    /// weights, M2. Returns 40 on success. On failure the error carries the
    /// number of bytes written before the failing field.
    pub fn write<S>(&self, sink: &mut S) -> Result<usize, TransferError<S::Error>>
    where
        S: ByteSink + ?Sized,
    {
        let mut written = 0;
        for field in self.encode_fields() {
            if let Err(error) = sink.write_bytes(&field) {
                #[cfg(feature = "log")]
                log::debug!("write failed after {} of {} bytes", written, ENCODED_LEN);
                return Err(TransferError::new(written, error));
            }
            written += FIELD_LEN;
        }
        Ok(written)
    }

    /// Read the 40-byte big-endian encoding from `source`
    ///
    /// All fields are replaced together once the whole encoding has been
    /// read; on failure `self` keeps its previous state and the error carries
    /// the number of bytes consumed before the failing field. Bytes of a
    /// partially read field may still have been consumed from `source`.
    pub fn read<S>(&mut self, source: &mut S) -> Result<usize, TransferError<S::Error>>
    where
        S: ByteSource + ?Sized,
    {
        let mut fields = [[0u8; FIELD_LEN]; NUM_FIELDS];
        let mut consumed = 0;
        for field in fields.iter_mut() {
            if let Err(error) = source.read_bytes(field) {
                #[cfg(feature = "log")]
                log::debug!("read failed after {} of {} bytes", consumed, ENCODED_LEN);
                return Err(TransferError::new(consumed, error));
            }
            consumed += FIELD_LEN;
        }
        *self = Self::decode_fields(&fields);
        Ok(consumed)
    }

    /// Encode into a fixed 40-byte array
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        for (chunk, field) in out.chunks_exact_mut(FIELD_LEN).zip(self.encode_fields()) {
            chunk.copy_from_slice(&field);
        }
        out
    }

    /// Decode from the first 40 bytes of `bytes`
    ///
    /// Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < ENCODED_LEN {
            return Err(DecodeError::BufferTooShort {
                expected: ENCODED_LEN,
                found: bytes.len(),
            });
        }

        let mut fields = [[0u8; FIELD_LEN]; NUM_FIELDS];
        for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(FIELD_LEN)) {
            field.copy_from_slice(chunk);
        }
        Ok(Self::decode_fields(&fields))
    }

    fn encode_fields(&self) -> [[u8; FIELD_LEN]; NUM_FIELDS] {
        [
            self.count.to_be_bytes(),
            self.mean.to_be_bytes(),
            self.sum_weight.to_be_bytes(),
            self.sum_weight_sq.to_be_bytes(),
            self.weighted_sum_sq_dev.to_be_bytes(),
        ]
    }

    fn decode_fields(fields: &[[u8; FIELD_LEN]; NUM_FIELDS]) -> Self {
        Self {
            count: u64::from_be_bytes(fields[0]),
            mean: f64::from_be_bytes(fields[1]),
            sum_weight: f64::from_be_bytes(fields[2]),
            sum_weight_sq: f64::from_be_bytes(fields[3]),
            weighted_sum_sq_dev: f64::from_be_bytes(fields[4]),
        }
    }
}

impl Sketch for WeightedStats {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.add(*item);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        WeightedStats::merge(self, other);
        Ok(())
    }

    fn clear(&mut self) {
        WeightedStats::clear(self);
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Extend<f64> for WeightedStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// `(value, weight)` pairs
impl Extend<(f64, f64)> for WeightedStats {
    fn extend<I: IntoIterator<Item = (f64, f64)>>(&mut self, iter: I) {
        for (value, weight) in iter {
            self.add_weighted(value, weight);
        }
    }
}

impl FromIterator<f64> for WeightedStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for WeightedStats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("WeightedStats", 5)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("mean", &self.mean)?;
        state.serialize_field("sum_weight", &self.sum_weight)?;
        state.serialize_field("sum_weight_sq", &self.sum_weight_sq)?;
        state.serialize_field("weighted_sum_sq_dev", &self.weighted_sum_sq_dev)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> serde::Deserialize<'de> for WeightedStats {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct StatsData {
            count: u64,
            mean: f64,
            sum_weight: f64,
            sum_weight_sq: f64,
            weighted_sum_sq_dev: f64,
        }

        let data = StatsData::deserialize(deserializer)?;
        Ok(WeightedStats {
            count: data.count,
            mean: data.mean,
            sum_weight: data.sum_weight,
            sum_weight_sq: data.sum_weight_sq,
            weighted_sum_sq_dev: data.weighted_sum_sq_dev,
        })
    }
}
