//! Recursive merge kernels over interval-endpoint slices.
//!
//! An endpoint slice is an even-length, strictly increasing sequence of
//! logical bounds; `s[0]` and `s[s.len() - 1]` bracket its overall extent
//! on the index line. Splitting such a slice at any even index yields two
//! smaller endpoint slices, which is what the recursions below exploit:
//! a sub-run of endpoints corresponds to a contiguous span of the domain,
//! so two sub-runs with disjoint extents can be pruned without looking at
//! their contents.

/// Appends the intersection of the interval lists `a` and `b` to `out`.
///
/// The two lists are split at their midpoints rounded up to an even index
/// and the four quadrant pairs are visited left to right. Every visit
/// only appends, and the visit order alone keeps the appended endpoints
/// globally sorted: results drawn from the low half of either operand
/// precede results drawn from its high half, because the halves of a
/// canonical list are separated by a gap.
pub(super) fn intersect(a: &[u128], b: &[u128], out: &mut Vec<u128>) {
    if disjoint_extents(a, b) {
        return;
    }
    match (a.len() > 2, b.len() > 2) {
        (false, false) => push_interval(out, a[0].max(b[0]), a[1].min(b[1])),
        (false, true) => {
            let mid = half(b);
            intersect(a, &b[..mid], out);
            intersect(a, &b[mid..], out);
        }
        (true, false) => {
            let mid = half(a);
            intersect(&a[..mid], b, out);
            intersect(&a[mid..], b, out);
        }
        (true, true) => {
            let (amid, bmid) = (half(a), half(b));
            intersect(&a[..amid], &b[..bmid], out);
            intersect(&a[..amid], &b[bmid..], out);
            intersect(&a[amid..], &b[..bmid], out);
            intersect(&a[amid..], &b[bmid..], out);
        }
    }
}

/// Returns true if the interval lists `a` and `b` share at least one
/// index. Same pruning recursion as [`intersect`], with an early exit
/// instead of an output list.
pub(super) fn intersects(a: &[u128], b: &[u128]) -> bool {
    if disjoint_extents(a, b) {
        false
    } else if a.len() == 2 && b.len() == 2 {
        // Two single intervals with overlapping extents intersect.
        true
    } else if a.len() > 2 {
        let mid = half(a);
        intersects(&a[..mid], b) || intersects(&a[mid..], b)
    } else {
        let mid = half(b);
        intersects(a, &b[..mid]) || intersects(a, &b[mid..])
    }
}

/// Appends the symmetric difference of the interval lists `a` and `b` to
/// `out`, sweeping both lists in ascending order. One toggle per operand
/// tracks whether the sweep position is inside an interval of that
/// operand; an endpoint is emitted exactly when the XOR of the toggles
/// changes. Endpoints shared by both operands flip both toggles at once
/// and are emitted for neither, which is what merges intervals that the
/// difference brings into contact.
pub(super) fn symmetric_difference(a: &[u128], b: &[u128], out: &mut Vec<u128>) {
    let (mut i, mut j) = (0, 0);
    let (mut inside_a, mut inside_b) = (false, false);
    loop {
        let v = match (a.get(i), b.get(j)) {
            (Some(&x), Some(&y)) => x.min(y),
            (Some(&x), None) => x,
            (None, Some(&y)) => y,
            (None, None) => break,
        };
        let was = inside_a ^ inside_b;
        if a.get(i) == Some(&v) {
            inside_a = !inside_a;
            i += 1;
        }
        if b.get(j) == Some(&v) {
            inside_b = !inside_b;
            j += 1;
        }
        if (inside_a ^ inside_b) != was {
            out.push(v);
        }
    }
    debug_assert!(!inside_a && !inside_b);
}

/// True if the overall extents of the two endpoint slices have no index
/// in common. Extents are half-open, so touching extents are disjoint.
fn disjoint_extents(a: &[u128], b: &[u128]) -> bool {
    a.is_empty() || b.is_empty() || a[0] >= b[b.len() - 1] || b[0] >= a[a.len() - 1]
}

/// Midpoint of an endpoint slice, rounded up to an even index so that
/// both halves are themselves endpoint slices.
fn half(s: &[u128]) -> usize {
    debug_assert!(s.len() > 2);
    (s.len() / 2 + 1) & !1
}

/// Appends the non-empty interval `[begin, end)` to `out`. The recursion
/// visit order guarantees strictly ascending, non-adjacent appends.
fn push_interval(out: &mut Vec<u128>, begin: u128, end: u128) {
    debug_assert!(begin < end);
    debug_assert!(out.last().is_none_or(|&last| last < begin));
    out.push(begin);
    out.push(end);
}

#[cfg(test)]
mod tests {
    use crate::RangeSet;

    fn rs(ranges: &[(u64, u64)]) -> RangeSet {
        ranges.iter().copied().collect()
    }

    fn exported(set: &RangeSet) -> Vec<(u64, u64)> {
        set.ranges().collect()
    }

    #[test]
    fn binary_operations_on_overlapping_sets() {
        let a = rs(&[(0, 10)]);
        let b = rs(&[(5, 15)]);
        assert_eq!(exported(&a.intersection(&b)), vec![(5, 10)]);
        assert_eq!(exported(&a.union(&b)), vec![(0, 15)]);
        assert_eq!(exported(&a.difference(&b)), vec![(0, 5)]);
        assert_eq!(exported(&b.difference(&a)), vec![(10, 15)]);
        assert_eq!(exported(&a.symmetric_difference(&b)), vec![(0, 5), (10, 15)]);
    }

    #[test]
    fn self_identities() {
        for set in [RangeSet::new(), RangeSet::full(), rs(&[(5, 10), (20, 30)])] {
            assert_eq!(set.intersection(&set), set);
            assert_eq!(set.union(&set), set);
            assert!(set.difference(&set).is_empty());
            assert!(set.symmetric_difference(&set).is_empty());
            // The same identities must hold for distinct but equal values.
            let copy = set.clone();
            assert_eq!(set.intersection(&copy), set);
            assert_eq!(set.union(&copy), set);
            assert!(set.difference(&copy).is_empty());
            assert!(set.symmetric_difference(&copy).is_empty());
        }
    }

    #[test]
    fn de_morgan_laws() {
        let a = rs(&[(0, 4), (8, 20), (30, 31), (40, 55)]);
        let b = rs(&[(2, 10), (19, 33), (54, 60), (100, 120)]);
        assert_eq!(
            a.union(&b),
            a.complemented()
                .intersection(&b.complemented())
                .complemented()
        );
        assert_eq!(
            a.intersection(&b),
            a.complemented().union(&b.complemented()).complemented()
        );
    }

    #[test]
    fn intersection_recurses_through_many_intervals() {
        // Eight intervals per operand forces the four-way quadrant split.
        let a: RangeSet = (0..8u64).map(|i| (i * 10, i * 10 + 6)).collect();
        let b: RangeSet = (0..8u64).map(|i| (i * 10 + 4, i * 10 + 8)).collect();
        let expected: Vec<(u64, u64)> = (0..8).map(|i| (i * 10 + 4, i * 10 + 6)).collect();
        let meet = a.intersection(&b);
        assert_eq!(exported(&meet), expected);
        assert!(meet.is_valid());
    }

    #[test]
    fn intersection_of_coarse_and_fine_sets() {
        // A single interval against many, and the reverse.
        let coarse = rs(&[(15, 65)]);
        let fine: RangeSet = (0..10u64).map(|i| (i * 10, i * 10 + 5)).collect();
        let expected = vec![(20, 25), (30, 35), (40, 45), (50, 55), (60, 65)];
        assert_eq!(exported(&coarse.intersection(&fine)), expected);
        assert_eq!(exported(&fine.intersection(&coarse)), expected);
    }

    #[test]
    fn intersection_with_extremes() {
        let set = rs(&[(5, 10), (20, 30)]);
        assert_eq!(set.intersection(&RangeSet::full()), set);
        assert!(set.intersection(&RangeSet::new()).is_empty());
        assert_eq!(RangeSet::full().intersection(&set), set);
    }

    #[test]
    fn union_of_disjoint_sets_adds_cardinalities() {
        let a = rs(&[(0, 10), (50, 60)]);
        let b = rs(&[(20, 30), (70, 80)]);
        assert!(a.is_disjoint_from(&b));
        let both = a.union(&b);
        assert_eq!(both.cardinality(), a.cardinality() + b.cardinality());
        assert_eq!(exported(&both), vec![(0, 10), (20, 30), (50, 60), (70, 80)]);
    }

    #[test]
    fn union_merges_adjacent_intervals() {
        let a = rs(&[(0, 5)]);
        let b = rs(&[(5, 10)]);
        assert_eq!(exported(&a.union(&b)), vec![(0, 10)]);
    }

    #[test]
    fn symmetric_difference_merges_at_contact_points() {
        let a = rs(&[(0, 5)]);
        let b = rs(&[(5, 10)]);
        assert_eq!(exported(&a.symmetric_difference(&b)), vec![(0, 10)]);

        let c = rs(&[(0, 10)]);
        let d = rs(&[(0, 5)]);
        assert_eq!(exported(&c.symmetric_difference(&d)), vec![(5, 10)]);
    }

    #[test]
    fn symmetric_difference_is_union_of_differences() {
        let a = rs(&[(0, 4), (8, 20), (30, 31)]);
        let b = rs(&[(2, 10), (19, 33)]);
        assert_eq!(
            a.symmetric_difference(&b),
            a.difference(&b).union(&b.difference(&a))
        );
    }

    #[test]
    fn operations_across_the_domain_boundary() {
        let a = RangeSet::range(u64::MAX - 10, 5);
        let b = RangeSet::range(u64::MAX - 2, 2);
        assert_eq!(
            exported(&a.intersection(&b)),
            vec![(0, 2), (u64::MAX - 2, 0)]
        );
        assert_eq!(exported(&a.union(&b)), vec![(0, 5), (u64::MAX - 10, 0)]);
        assert_eq!(
            exported(&a.difference(&b)),
            vec![(2, 5), (u64::MAX - 10, u64::MAX - 2)]
        );
    }

    #[test]
    fn difference_carves_holes() {
        let a = rs(&[(0, 100)]);
        let b = rs(&[(10, 20), (40, 50), (80, 90)]);
        assert_eq!(
            exported(&a.difference(&b)),
            vec![(0, 10), (20, 40), (50, 80), (90, 100)]
        );
    }
}
