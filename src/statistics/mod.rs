//! Statistical summaries for streaming data
//!
//! This module provides accumulators for computing statistics over streams
//! in a single pass with constant memory.
//!
//! # Example
//!
//! ```
//! use streamvar::statistics::WeightedStats;
//!
//! let mut stats = WeightedStats::new();
//!
//! for (value, weight) in [(1.0, 1.0), (2.0, 0.5), (3.0, 2.0)] {
//!     stats.add_weighted(value, weight);
//! }
//!
//! println!("Mean: {}", stats.mean());
//! println!("Stddev: {}", stats.standard_deviation());
//! println!("Effective n: {}", stats.effective_sample_size());
//! ```

mod moments;

pub use moments::{WeightedStats, ENCODED_LEN};
