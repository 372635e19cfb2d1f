use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not, Sub};

use itertools::Itertools;

pub use codec::DecodeError;
pub use iter::Ranges;

mod algebra;
mod codec;
mod iter;

/// One past the largest representable index: the exclusive end of the
/// whole domain. Interval ends are logical bounds in `[1, 2^64]` and may
/// take this value; interval starts never do.
pub const DOMAIN_END: u128 = 1 << 64;

/// A set of unsigned 64-bit integers, stored as a canonical union of
/// disjoint half-open intervals.
///
/// The set is backed by a strictly increasing sequence of interval
/// endpoints: `endpoints[2*i]` is the inclusive start of interval `i` and
/// `endpoints[2*i + 1]` its exclusive end. Endpoints are widened to
/// `u128` so that the exclusive domain end `2^64` ([`DOMAIN_END`]) is an
/// ordinary value rather than a sentinel. Canonical form is unique per
/// represented set: strict monotonicity rules out empty, overlapping and
/// adjacent intervals, so structural equality is set equality.
///
/// Ranges given to constructors and mutators are `(first, last)` pairs of
/// domain values with wraparound semantics: `first < last` denotes
/// `[first, last)`, `first > last` denotes `[first, 2^64) ∪ [0, last)`,
/// and `first == last` denotes the full domain.
///
/// ```
/// use rangeset::RangeSet;
///
/// let wrapping = RangeSet::range(u64::MAX - 1, 2);
/// assert_eq!(wrapping.cardinality(), 4);
/// assert!(wrapping.contains(u64::MAX));
/// assert!(wrapping.contains(1));
/// assert!(!wrapping.contains(2));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RangeSet {
    /// Strictly increasing interval endpoints, always of even length.
    /// Every value is at most [`DOMAIN_END`], which only the final end may
    /// reach.
    endpoints: Vec<u128>,
}

impl RangeSet {
    /// Creates an empty set.
    pub fn new() -> RangeSet {
        RangeSet { endpoints: Vec::new() }
    }

    /// Creates the set of all 2^64 representable indices.
    pub fn full() -> RangeSet {
        RangeSet {
            endpoints: vec![0, DOMAIN_END],
        }
    }

    /// Creates the singleton set `[value, value + 1)`.
    pub fn single(value: u64) -> RangeSet {
        RangeSet {
            endpoints: vec![value as u128, value as u128 + 1],
        }
    }

    /// Creates the set of indices in the wraparound range `(first, last)`.
    ///
    /// `first == last` yields the full set; this is the documented "all
    /// representable values" convention, not an error.
    pub fn range(first: u64, last: u64) -> RangeSet {
        let mut set = RangeSet::new();
        set.insert(first, last);
        set
    }

    // =========== Mutators ===================

    /// Adds the indices of the wraparound range `(first, last)` to the set.
    ///
    /// Storage for the worst-case growth is reserved before the endpoint
    /// list is touched, so the operation either completes or leaves the
    /// set exactly as it was.
    pub fn insert(&mut self, first: u64, last: u64) {
        if first == last {
            self.fill();
        } else if first < last {
            self.insert_interval(first as u128, last as u128);
        } else {
            self.insert_interval(first as u128, DOMAIN_END);
            if last > 0 {
                self.insert_interval(0, last as u128);
            }
        }
    }

    /// Removes the indices of the wraparound range `(first, last)` from
    /// the set, by inserting the range into the complement.
    pub fn erase(&mut self, first: u64, last: u64) {
        self.complement();
        self.insert(first, last);
        self.complement();
    }

    /// Replaces the set with its complement within the domain.
    pub fn complement(&mut self) {
        // Membership of the whole domain is flipped by toggling a leading
        // 0 and a trailing 2^64; interior endpoints are unchanged.
        if self.endpoints.first() == Some(&0) {
            self.endpoints.remove(0);
        } else {
            self.endpoints.insert(0, 0);
        }
        if self.endpoints.last() == Some(&DOMAIN_END) {
            self.endpoints.pop();
        } else {
            self.endpoints.push(DOMAIN_END);
        }
        debug_assert!(self.is_valid());
    }

    /// Returns the complement of the set.
    pub fn complemented(&self) -> RangeSet {
        let mut result = self.clone();
        result.complement();
        result
    }

    /// Makes the set empty.
    pub fn clear(&mut self) {
        self.endpoints.clear();
    }

    /// Makes the set contain the full domain.
    pub fn fill(&mut self) {
        self.endpoints.clear();
        self.endpoints.extend([0, DOMAIN_END]);
    }

    /// Coarsens the set so that every interval starts and ends on a
    /// multiple of `2^n`, merging intervals that become adjacent or
    /// overlapping. The result is always a superset of the original set,
    /// and simplifying twice with the same `n` changes nothing.
    ///
    /// `n == 0` is a no-op; `n >= 64` widens any non-empty set to the full
    /// domain. The empty set stays empty for every `n`.
    pub fn simplify(&mut self, n: u32) {
        if n == 0 || self.endpoints.is_empty() {
            return;
        }
        if n >= 64 {
            self.fill();
            return;
        }
        let mask = (1u128 << n) - 1;
        // Round every start down and every end up, then merge the runs
        // that the rounding brought into contact. Rounded starts and ends
        // are still monotone, so a single coalescing pass suffices.
        let rounded: Vec<u128> = self
            .endpoints
            .iter()
            .tuples()
            .map(|(&begin, &end)| (begin & !mask, (end + mask) & !mask))
            .coalesce(|left, right| {
                if right.0 <= left.1 {
                    Ok((left.0, right.1))
                } else {
                    Err((left, right))
                }
            })
            .flat_map(|(begin, end)| [begin, end])
            .collect();
        self.endpoints = rounded;
        debug_assert!(self.is_valid());
    }

    /// Multiplies every interval endpoint by `factor`.
    ///
    /// A factor of 0 empties the set and 1 leaves it unchanged. If a
    /// scaled endpoint leaves the domain, the interval list is truncated
    /// at that point: an overflowing end clamps to 2^64 and every later
    /// interval is dropped. Scaling is lossy on overflow, not modular.
    pub fn scale(&mut self, factor: u64) {
        match factor {
            0 => self.clear(),
            1 => (),
            _ => {
                let factor = factor as u128;
                let mut scaled = Vec::with_capacity(self.endpoints.len());
                for (&begin, &end) in self.endpoints.iter().tuples() {
                    let begin = begin * factor;
                    if begin >= DOMAIN_END {
                        break;
                    }
                    let end = end * factor;
                    scaled.push(begin);
                    if end >= DOMAIN_END {
                        scaled.push(DOMAIN_END);
                        break;
                    }
                    scaled.push(end);
                }
                self.endpoints = scaled;
                debug_assert!(self.is_valid());
            }
        }
    }

    /// Merges the non-empty interval `[begin, end)` of logical bounds into
    /// the endpoint list.
    fn insert_interval(&mut self, begin: u128, end: u128) {
        debug_assert!(begin < end && end <= DOMAIN_END);
        // Reserved before any modification: the splice below can then not
        // allocate, so a failed allocation leaves the set untouched.
        self.endpoints.reserve(2);
        // `lo` is the first interval ending at or after `begin`, `hi` the
        // first interval starting strictly after `end`; an end equal to
        // `begin` or a start equal to `end` is adjacent and must merge.
        // Intervals `lo..hi` are replaced by their hull with `[begin, end)`.
        let lo = self.endpoints.partition_point(|&v| v < begin) / 2;
        let hi = (self.endpoints.partition_point(|&v| v <= end) + 1) / 2;
        let (begin, end) = if lo < hi {
            (
                begin.min(self.endpoints[2 * lo]),
                end.max(self.endpoints[2 * hi - 1]),
            )
        } else {
            (begin, end)
        };
        self.endpoints.splice(2 * lo..2 * hi, [begin, end]);
        debug_assert!(self.is_valid());
    }

    // =========== Queries ===================

    /// Returns true if the set contains no index.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Returns true if the set contains every index of the domain.
    pub fn is_full(&self) -> bool {
        self.endpoints == [0, DOMAIN_END]
    }

    /// Returns the number of indices in the set. The full set holds 2^64
    /// indices, hence the widened return type.
    pub fn cardinality(&self) -> u128 {
        self.endpoints.iter().tuples().map(|(&b, &e)| e - b).sum()
    }

    /// Returns the number of maximal intervals in the set.
    pub fn num_ranges(&self) -> usize {
        self.endpoints.len() / 2
    }

    /// Returns true if `value` is a member of the set. This is also the
    /// singleton form of [`RangeSet::intersects`].
    pub fn contains(&self, value: u64) -> bool {
        // An odd number of endpoints at or below `value` places it inside
        // an interval.
        self.endpoints.partition_point(|&v| v <= value as u128) % 2 == 1
    }

    /// Returns true if the set and the wraparound range `(first, last)`
    /// share at least one index.
    pub fn intersects_range(&self, first: u64, last: u64) -> bool {
        if first == last {
            return !self.is_empty();
        }
        if first < last {
            algebra::intersects(&self.endpoints, &[first as u128, last as u128])
        } else {
            algebra::intersects(&self.endpoints, &[first as u128, DOMAIN_END])
                || (last > 0 && algebra::intersects(&self.endpoints, &[0, last as u128]))
        }
    }

    /// Returns true if the two sets share at least one index.
    pub fn intersects(&self, other: &RangeSet) -> bool {
        if std::ptr::eq(self, other) {
            return !self.is_empty();
        }
        algebra::intersects(&self.endpoints, &other.endpoints)
    }

    /// Returns true if every index of the wraparound range `(first, last)`
    /// is in the set.
    pub fn contains_range(&self, first: u64, last: u64) -> bool {
        !self.complemented().intersects_range(first, last)
    }

    /// Returns true if every index of `other` is in the set.
    pub fn contains_set(&self, other: &RangeSet) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        !self.complemented().intersects(other)
    }

    /// Returns true if every index of the set lies in the wraparound range
    /// `(first, last)`.
    pub fn is_within_range(&self, first: u64, last: u64) -> bool {
        // The complement of the range (first, last) is the range
        // (last, first), except that a full range has an empty complement.
        first == last || !self.intersects_range(last, first)
    }

    /// Returns true if every index of the set is in `other`.
    pub fn is_within(&self, other: &RangeSet) -> bool {
        other.contains_set(self)
    }

    /// Returns true if the set and the wraparound range `(first, last)`
    /// have no index in common.
    pub fn is_disjoint_from_range(&self, first: u64, last: u64) -> bool {
        !self.intersects_range(first, last)
    }

    /// Returns true if the two sets have no index in common.
    pub fn is_disjoint_from(&self, other: &RangeSet) -> bool {
        !self.intersects(other)
    }

    /// Returns true if the endpoint list is in canonical form: even
    /// length, strictly increasing, no value beyond the domain end.
    ///
    /// Public operations maintain this invariant unconditionally; the
    /// predicate exists for tests and debug assertions.
    pub fn is_valid(&self) -> bool {
        self.endpoints.len() % 2 == 0
            && self.endpoints.windows(2).all(|w| w[0] < w[1])
            && self.endpoints.last().is_none_or(|&v| v <= DOMAIN_END)
    }

    /// Iterates over the maximal intervals of the set as `(start, end)`
    /// pairs of logical bounds, in ascending order. The end of the final
    /// interval may be [`DOMAIN_END`].
    pub fn iter(&self) -> Ranges<'_> {
        Ranges::new(&self.endpoints)
    }

    /// Exports the maximal intervals as `(first, last)` pairs of domain
    /// values in the wraparound convention accepted by
    /// [`RangeSet::insert`]: an end of 2^64 is exported as 0. The pairs
    /// are ascending and non-overlapping, so feeding them back through
    /// `insert` reconstructs the set exactly.
    pub fn ranges(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        // The cast reduces 2^64 to 0, which is precisely the convention.
        self.iter().map(|(begin, end)| (begin as u64, end as u64))
    }

    // =========== Set algebra ===================

    /// Returns the intersection of the two sets.
    pub fn intersection(&self, other: &RangeSet) -> RangeSet {
        if std::ptr::eq(self, other) {
            return self.clone();
        }
        let mut out = Vec::new();
        algebra::intersect(&self.endpoints, &other.endpoints, &mut out);
        let result = RangeSet { endpoints: out };
        debug_assert!(result.is_valid());
        result
    }

    /// Returns the union of the two sets, computed as the complement of
    /// the intersection of the complements.
    pub fn union(&self, other: &RangeSet) -> RangeSet {
        if std::ptr::eq(self, other) {
            return self.clone();
        }
        let mut result = self.complemented().intersection(&other.complemented());
        result.complement();
        result
    }

    /// Returns the set of indices in `self` but not in `other`.
    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        if std::ptr::eq(self, other) {
            return RangeSet::new();
        }
        self.intersection(&other.complemented())
    }

    /// Returns the set of indices in exactly one of the two sets.
    pub fn symmetric_difference(&self, other: &RangeSet) -> RangeSet {
        if std::ptr::eq(self, other) {
            return RangeSet::new();
        }
        let mut out = Vec::new();
        algebra::symmetric_difference(&self.endpoints, &other.endpoints, &mut out);
        let result = RangeSet { endpoints: out };
        debug_assert!(result.is_valid());
        result
    }
}

impl Debug for RangeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|(begin, end)| begin..end))
            .finish()
    }
}

impl Extend<u64> for RangeSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for value in iter {
            self.insert_interval(value as u128, value as u128 + 1);
        }
    }
}

impl Extend<(u64, u64)> for RangeSet {
    fn extend<I: IntoIterator<Item = (u64, u64)>>(&mut self, iter: I) {
        for (first, last) in iter {
            self.insert(first, last);
        }
    }
}

impl FromIterator<u64> for RangeSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> RangeSet {
        let mut set = RangeSet::new();
        set.extend(iter);
        set
    }
}

impl FromIterator<(u64, u64)> for RangeSet {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> RangeSet {
        let mut set = RangeSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = (u128, u128);
    type IntoIter = Ranges<'a>;

    fn into_iter(self) -> Ranges<'a> {
        self.iter()
    }
}

impl BitAnd for &RangeSet {
    type Output = RangeSet;

    fn bitand(self, rhs: &RangeSet) -> RangeSet {
        self.intersection(rhs)
    }
}

impl BitOr for &RangeSet {
    type Output = RangeSet;

    fn bitor(self, rhs: &RangeSet) -> RangeSet {
        self.union(rhs)
    }
}

impl BitXor for &RangeSet {
    type Output = RangeSet;

    fn bitxor(self, rhs: &RangeSet) -> RangeSet {
        self.symmetric_difference(rhs)
    }
}

impl Sub for &RangeSet {
    type Output = RangeSet;

    fn sub(self, rhs: &RangeSet) -> RangeSet {
        self.difference(rhs)
    }
}

impl Not for &RangeSet {
    type Output = RangeSet;

    fn not(self) -> RangeSet {
        self.complemented()
    }
}
