//! Sorting point annotations (e.g. GWAS SNPs) by the category of the base
//! they sit on.

use std::collections::BTreeMap;

use lincs_core::{LincsError, Result};

use crate::array::ClassificationArray;
use crate::category::Category;

///
/// Points grouped by the category of their base. Every category is present,
/// possibly with no points, so counts can be reported for all five.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedPoints<T> {
    groups: BTreeMap<Category, Vec<T>>,
}

impl<T> Default for CategorizedPoints<T> {
    fn default() -> Self {
        CategorizedPoints {
            groups: Category::ALL.iter().map(|&c| (c, Vec::new())).collect(),
        }
    }
}

impl<T> CategorizedPoints<T> {
    pub fn get(&self, category: Category) -> &[T] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn count(&self, category: Category) -> usize {
        self.get(category).len()
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// `(category, count)` for all five categories.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        self.groups.iter().map(|(&c, v)| (c, v.len())).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[T])> + '_ {
        self.groups.iter().map(|(&c, v)| (c, v.as_slice()))
    }

    /// Append the points of another chromosome.
    pub fn absorb(&mut self, other: CategorizedPoints<T>) {
        for (category, values) in other.groups {
            self.groups.entry(category).or_default().extend(values);
        }
    }

    pub fn into_groups(self) -> BTreeMap<Category, Vec<T>> {
        self.groups
    }
}

///
/// Look up the category of each point's 1-based position in `array` and
/// group the payloads accordingly, keeping input order within a group.
///
/// # Errors
/// `OutOfRangeInterval` if a position lies outside the chromosome. Nothing is
/// returned for the chromosome in that case.
///
pub fn categorize_points<T>(
    array: &ClassificationArray,
    points: impl IntoIterator<Item = (i64, T)>,
) -> Result<CategorizedPoints<T>> {
    let mut out = CategorizedPoints::default();
    for (position, value) in points {
        let category = array
            .get(position)
            .ok_or(LincsError::OutOfRangeInterval {
                start: position,
                stop: position,
                size: array.len() as i64,
            })?;
        out.groups.entry(category).or_default().push(value);
    }
    Ok(out)
}
