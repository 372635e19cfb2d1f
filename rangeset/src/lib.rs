//! Interval-arithmetic primitives for pixelization index ranges.
//!
//! The central type is [`RangeSet`]: a canonical, ordered union of
//! half-open intervals over the full `[0, 2^64)` index domain, supporting
//! exact set algebra (union, intersection, difference, symmetric
//! difference, complement), wraparound ranges, power-of-two coarsening and
//! scaling. Pixelization schemes assign a 64-bit index to every pixel of a
//! sphere subdivision; a `RangeSet` compactly describes the pixels covered
//! by a region as a handful of index ranges.
//!
//! ```
//! use rangeset::RangeSet;
//!
//! let mut pixels = RangeSet::range(16, 32);
//! pixels.insert(40, 44);
//! pixels.erase(20, 22);
//!
//! assert_eq!(pixels.cardinality(), 4 + 10 + 4);
//! assert!(pixels.contains(19));
//! assert!(!pixels.contains(20));
//! ```
//!
//! Sets are plain values: construction, queries and algebra never involve
//! shared state, and a `clone` is an independent deep copy.

pub use set::*;

mod set;
