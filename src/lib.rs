//! # Streamvar
//!
//! Streaming weighted mean and variance for Rust.
//!
//! Streamvar keeps running statistics over unbounded streams without storing
//! the observations, using the weighted form of Welford's numerically stable
//! online algorithm.
//!
//! ## Features
//!
//! - **Weighted updates**: every observation may carry its own weight
//! - **Full Mergeability**: accumulators built on separate shards combine exactly
//! - **Fixed-size state**: 40-byte big-endian encoding for storage or transfer
//! - **no_std**: serialization works against minimal byte sink/source traits
//!
//! ## Quick Start
//!
//! ```rust
//! use streamvar::prelude::*;
//!
//! let mut stats = WeightedStats::new();
//! for latency_ms in [12.0, 15.0, 11.0, 30.0] {
//!     stats.add(latency_ms);
//! }
//! println!("mean={} sd={}", stats.mean(), stats.sample_standard_deviation());
//! ```
//!
//! ## Distributed Computing
//!
//! Give every worker its own accumulator and merge them at aggregation time:
//!
//! ```rust
//! use streamvar::WeightedStats;
//!
//! let mut worker1 = WeightedStats::new();
//! let mut worker2 = WeightedStats::new();
//!
//! // Each worker processes its partition
//! worker1.add(1.0);
//! worker2.add_weighted(3.0, 2.0);
//!
//! // Merge results
//! worker1.merge(&worker2);
//! assert_eq!(worker1.count(), 2);
//! ```
//!
//! ## Serialization
//!
//! ```rust
//! use streamvar::WeightedStats;
//!
//! let mut stats = WeightedStats::new();
//! stats.add(4.0);
//!
//! let mut buf: Vec<u8> = Vec::new();
//! assert_eq!(stats.write(&mut buf).unwrap(), 40);
//!
//! let mut restored = WeightedStats::new();
//! assert_eq!(restored.read(&mut buf.as_slice()).unwrap(), 40);
//! assert_eq!(restored, stats);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support, [`io::FromStd`] for `std::io` streams
//! - `serde`: Enable serialization
//! - `log`: Debug records for failed transfers and shard merges
//! - `full`: Enable everything

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod io;
mod math;
pub mod statistics;
pub mod traits;

pub mod prelude {
    #[cfg(feature = "std")]
    pub use crate::io::FromStd;
    pub use crate::io::{ByteSink, ByteSource, TransferError};
    pub use crate::statistics::WeightedStats;
    pub use crate::traits::*;
}

pub use io::TransferError;
pub use statistics::WeightedStats;
