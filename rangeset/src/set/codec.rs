//! Byte-exact persistence for range sets.
//!
//! The layout is stable across releases: a version byte, the interval
//! count as a little-endian u64, then one `(first, last)` pair of
//! little-endian u64 per interval, in the same wraparound convention as
//! [`RangeSet::ranges`] (an end of 2^64 is written as 0, which canonical
//! ordering restricts to the final pair).

use thiserror::Error;

use super::{RangeSet, DOMAIN_END};

/// Layout version written as the first byte of every encoding.
const VERSION: u8 = 1;

/// Failure to reconstruct a [`RangeSet`] from bytes. No variant ever
/// leaves a partially decoded set behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The input is not exactly the length implied by its interval count.
    #[error("encoding is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },
    /// The version byte is not one this library writes.
    #[error("unsupported layout version {0}")]
    Version(u8),
    /// The interval pairs are not in canonical ascending order.
    #[error("range list is not in canonical form")]
    NotCanonical,
}

impl RangeSet {
    /// Serializes the set to its stable byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(9 + self.num_ranges() * 16);
        buf.push(VERSION);
        buf.extend_from_slice(&(self.num_ranges() as u64).to_le_bytes());
        for (first, last) in self.ranges() {
            buf.extend_from_slice(&first.to_le_bytes());
            buf.extend_from_slice(&last.to_le_bytes());
        }
        buf
    }

    /// Reconstructs a set written by [`RangeSet::encode`]. The input must
    /// be the complete encoding, nothing more: trailing bytes are
    /// rejected, as is any pair sequence that is not in canonical form.
    pub fn decode(buf: &[u8]) -> Result<RangeSet, DecodeError> {
        let too_short = DecodeError::Length {
            expected: 9,
            actual: buf.len(),
        };
        let (&version, rest) = buf.split_first().ok_or(too_short)?;
        if version != VERSION {
            return Err(DecodeError::Version(version));
        }
        if rest.len() < 8 {
            return Err(DecodeError::Length {
                expected: 9,
                actual: buf.len(),
            });
        }
        let (count, pairs) = rest.split_at(8);
        let count = read_u64(count) as usize;
        if pairs.len() % 16 != 0 || count != pairs.len() / 16 {
            return Err(DecodeError::Length {
                expected: count.saturating_mul(16).saturating_add(9),
                actual: buf.len(),
            });
        }
        let mut endpoints = Vec::with_capacity(count * 2);
        for pair in pairs.chunks_exact(16) {
            let first = read_u64(&pair[..8]);
            let last = read_u64(&pair[8..]);
            endpoints.push(first as u128);
            // A stored end of 0 denotes the domain end; anywhere but the
            // final pair this breaks monotonicity and fails validation.
            endpoints.push(if last == 0 { DOMAIN_END } else { last as u128 });
        }
        let set = RangeSet { endpoints };
        if !set.is_valid() {
            return Err(DecodeError::NotCanonical);
        }
        tracing::trace!("decoded a set of {} ranges", count);
        Ok(set)
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    u64::from_le_bytes(raw)
}
