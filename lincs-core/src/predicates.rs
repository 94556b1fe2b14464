//! Overlap and strand-compatibility predicates.
//!
//! Both the envelope collapser and the transcript merge engine decide what to
//! merge using only these two functions.

use crate::models::Strand;

///
/// Number of bases shared by `[start_a, stop_a]` and `[start_b, stop_b]`
/// after extending both intervals by `margin` on each side.
///
/// Coordinates are inclusive, so intervals that touch at a single position
/// share one base. Returns 0 when the (extended) intervals are disjoint.
///
/// # Example
/// ```
/// use lincs_core::overlaps;
///
/// assert_eq!(overlaps(1, 5, 3, 8, 0), 3);
/// assert_eq!(overlaps(1, 5, 5, 8, 0), 1);
/// assert_eq!(overlaps(1, 5, 6, 8, 0), 0);
/// assert_eq!(overlaps(1, 5, 6, 8, 1), 2);
/// ```
#[inline]
pub fn overlaps(start_a: i64, stop_a: i64, start_b: i64, stop_b: i64, margin: i64) -> i64 {
    let lo = (start_a - margin).max(start_b - margin);
    let hi = (stop_a + margin).min(stop_b + margin);
    if hi < lo { 0 } else { hi - lo + 1 }
}

///
/// Whether features on strands `a` and `b` may be merged.
///
/// Two strands are compatible when both belong to `{Plus, PlusOrUnknown, Unknown}`
/// or both belong to `{Minus, MinusOrUnknown, Unknown}`.
///
#[inline]
pub fn strand_compatible(a: Strand, b: Strand) -> bool {
    (a.in_plus_group() && b.in_plus_group()) || (a.in_minus_group() && b.in_minus_group())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const ALL_STRANDS: [Strand; 5] = [
        Strand::Plus,
        Strand::Minus,
        Strand::Unknown,
        Strand::PlusOrUnknown,
        Strand::MinusOrUnknown,
    ];

    #[rstest]
    #[case((1, 5), (3, 8), 3)]
    #[case((1, 5), (5, 8), 1)]
    #[case((1, 5), (6, 8), 0)]
    #[case((20, 30), (45, 50), 0)]
    #[case((30, 70), (45, 50), 6)]
    #[case((100, 199), (150, 249), 50)]
    fn test_overlap_magnitude(#[case] a: (i64, i64), #[case] b: (i64, i64), #[case] expected: i64) {
        assert_eq!(overlaps(a.0, a.1, b.0, b.1, 0), expected);
    }

    #[rstest]
    fn test_overlap_symmetry() {
        let intervals = [(1, 5), (3, 8), (5, 5), (6, 8), (1, 100), (40, 60), (99, 120)];
        for margin in [0, 1, 7] {
            for a in intervals {
                for b in intervals {
                    assert_eq!(
                        overlaps(a.0, a.1, b.0, b.1, margin),
                        overlaps(b.0, b.1, a.0, a.1, margin)
                    );
                }
            }
        }
    }

    #[rstest]
    fn test_overlap_with_margin() {
        // 1 kb apart, each extended by 500 -> touch at one base
        assert_eq!(overlaps(1, 100, 1100, 1200, 500), 1);
        assert_eq!(overlaps(1, 100, 1101, 1200, 500), 0);
    }

    #[rstest]
    fn test_unknown_compatible_with_everything() {
        for s in ALL_STRANDS {
            assert!(strand_compatible(Strand::Unknown, s));
            assert!(strand_compatible(s, Strand::Unknown));
        }
    }

    #[rstest]
    #[case(Strand::Plus, Strand::Minus)]
    #[case(Strand::PlusOrUnknown, Strand::Minus)]
    #[case(Strand::PlusOrUnknown, Strand::MinusOrUnknown)]
    #[case(Strand::MinusOrUnknown, Strand::Plus)]
    fn test_incompatible(#[case] a: Strand, #[case] b: Strand) {
        assert!(!strand_compatible(a, b));
        assert!(!strand_compatible(b, a));
    }

    #[rstest]
    fn test_compatibility_symmetry() {
        for a in ALL_STRANDS {
            for b in ALL_STRANDS {
                assert_eq!(strand_compatible(a, b), strand_compatible(b, a));
                assert_eq!(strand_compatible(a, b), a.combine(&b).is_some());
            }
        }
    }
}
