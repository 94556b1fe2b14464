//! Per-base classification arrays.
//!
//! An array holds one [`Category`] per base of a chromosome; index `k`
//! describes position `k + 1`. Arrays are painted from three interval
//! sources in a fixed order (coding, noncoding, other), see [`Pass`].

use lincs_core::{Interval, LincsError, MAX_MARGIN, Result};

use crate::category::{Category, Pass};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationArray {
    categories: Vec<Category>,
}

impl ClassificationArray {
    ///
    /// A fresh array of `size` bases, all [`Category::Intergenic`].
    ///
    pub fn new(size: i64) -> Result<Self> {
        if size <= 0 {
            return Err(LincsError::InvalidArgument(format!(
                "chromosome size must be positive, got {}",
                size
            )));
        }
        Ok(ClassificationArray {
            categories: vec![Category::Intergenic; size as usize],
        })
    }

    ///
    /// Paint a full array for one chromosome.
    ///
    /// `coding` and `noncoding` intervals are widened by `margin` on both
    /// sides while painting; `other` intervals are painted as given.
    ///
    /// # Arguments
    /// - size: chromosome length in bases
    /// - coding, noncoding, other: 1-based inclusive intervals, each within `[1, size]`
    /// - margin: 0..=MAX_MARGIN
    ///
    /// # Errors
    /// `InvalidArgument` for a non-positive size or a margin out of range,
    /// `OutOfRangeInterval` for an interval outside the chromosome.
    ///
    pub fn build(
        size: i64,
        coding: &[Interval],
        noncoding: &[Interval],
        other: &[Interval],
        margin: i64,
    ) -> Result<Self> {
        let mut array = ClassificationArray::new(size)?;
        array.paint(coding, Pass::Coding, margin)?;
        array.paint(noncoding, Pass::Noncoding, margin)?;
        array.paint(other, Pass::Other, 0)?;
        Ok(array)
    }

    /// Wrap already decoded categories.
    pub fn from_categories(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(LincsError::InvalidArgument(
                "classification array is empty".to_string(),
            ));
        }
        Ok(ClassificationArray { categories })
    }

    /// Rebuild an array from its letter encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(LincsError::InvalidArgument(
                "classification array is empty".to_string(),
            ));
        }
        let categories = bytes
            .iter()
            .enumerate()
            .map(|(idx, &b)| {
                Category::from_byte(b).ok_or_else(|| {
                    LincsError::InvalidArgument(format!(
                        "invalid category byte {:#04x} at position {}",
                        b,
                        idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ClassificationArray { categories })
    }

    ///
    /// Apply one pass to every interval in `intervals`.
    ///
    /// All intervals are checked against the array bounds before any base is
    /// touched, so a failed call leaves the array as it was. The margin
    /// expansion itself is clamped to the array.
    ///
    pub fn paint(&mut self, intervals: &[Interval], pass: Pass, margin: i64) -> Result<()> {
        if !(0..=MAX_MARGIN).contains(&margin) {
            return Err(LincsError::InvalidArgument(format!(
                "margin must be between 0 and {}, got {}",
                MAX_MARGIN, margin
            )));
        }
        let size = self.len() as i64;
        for iv in intervals {
            if iv.start > iv.stop {
                return Err(LincsError::MalformedFeature(format!(
                    "interval start {} is greater than its stop {}",
                    iv.start, iv.stop
                )));
            }
            if iv.start < 1 || iv.stop > size {
                return Err(LincsError::OutOfRangeInterval {
                    start: iv.start,
                    stop: iv.stop,
                    size,
                });
            }
        }

        for iv in intervals {
            let lo = (iv.start - margin).max(1) as usize - 1;
            let hi = (iv.stop + margin).min(size) as usize;
            for cat in &mut self.categories[lo..hi] {
                *cat = pass.apply(*cat);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category at 1-based `position`.
    pub fn get(&self, position: i64) -> Option<Category> {
        if position < 1 {
            return None;
        }
        self.categories.get(position as usize - 1).copied()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Letter encoding, one byte per base.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.categories.iter().map(|c| c.as_byte())
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories.iter().filter(|&&c| c == category).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn ivs(bounds: &[(i64, i64)]) -> Vec<Interval> {
        bounds.iter().map(|&b| Interval::from(b)).collect()
    }

    fn letters(array: &ClassificationArray) -> String {
        String::from_utf8(array.bytes().collect()).unwrap()
    }

    #[rstest]
    fn test_golden_no_margin() {
        let array = ClassificationArray::build(
            10,
            &ivs(&[(1, 1), (5, 5)]),
            &ivs(&[(2, 3)]),
            &ivs(&[(9, 9)]),
            0,
        )
        .unwrap();
        assert_eq!(letters(&array), "mllimiiini");
    }

    #[rstest]
    fn test_golden_margin_clamped() {
        let array = ClassificationArray::build(
            20,
            &ivs(&[(1, 2), (19, 20)]),
            &ivs(&[(9, 9)]),
            &ivs(&[(13, 14)]),
            3,
        )
        .unwrap();
        assert_eq!(letters(&array), "mmmmmlllllllnnimmmmm");
        assert_eq!(array.count(Category::CodingOnly), 10);
    }

    #[rstest]
    fn test_noncoding_over_coding_is_both() {
        let array =
            ClassificationArray::build(12, &ivs(&[(3, 6)]), &ivs(&[(5, 9)]), &ivs(&[(1, 12)]), 0)
                .unwrap();
        assert_eq!(letters(&array), "nnmmbblllnnn");
        assert_eq!(array.get(5), Some(Category::Both));
        assert_eq!(array.get(0), None);
        assert_eq!(array.get(13), None);
    }

    #[rstest]
    fn test_other_ignores_margin_and_never_downgrades() {
        let array =
            ClassificationArray::build(10, &ivs(&[(5, 5)]), &[], &ivs(&[(2, 8)]), 2).unwrap();
        assert_eq!(letters(&array), "inmmmmmnii");
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn test_non_positive_size(#[case] size: i64) {
        assert!(matches!(
            ClassificationArray::new(size),
            Err(LincsError::InvalidArgument(_))
        ));
    }

    #[rstest]
    #[case(-1)]
    #[case(MAX_MARGIN + 1)]
    fn test_bad_margin(#[case] margin: i64) {
        let res = ClassificationArray::build(10, &ivs(&[(1, 1)]), &[], &[], margin);
        assert!(matches!(res, Err(LincsError::InvalidArgument(_))));
    }

    #[rstest]
    #[case((0, 3))]
    #[case((8, 11))]
    fn test_out_of_range_rejected(#[case] bounds: (i64, i64)) {
        let mut array = ClassificationArray::new(10).unwrap();
        let res = array.paint(&ivs(&[(1, 2), bounds]), Pass::Coding, 0);
        assert_eq!(
            res,
            Err(LincsError::OutOfRangeInterval {
                start: bounds.0,
                stop: bounds.1,
                size: 10
            })
        );
        // nothing painted
        assert_eq!(array.count(Category::Intergenic), 10);
    }

    #[rstest]
    fn test_from_bytes() {
        let array = ClassificationArray::from_bytes(b"imlbn").unwrap();
        assert_eq!(array.categories(), &Category::ALL);
        assert!(ClassificationArray::from_bytes(b"imx").is_err());
        assert!(ClassificationArray::from_bytes(b"").is_err());
        assert_eq!(
            ClassificationArray::from_categories(Category::ALL.to_vec()).unwrap(),
            array
        );
        assert!(ClassificationArray::from_categories(Vec::new()).is_err());
    }
}
