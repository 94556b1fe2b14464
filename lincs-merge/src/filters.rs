//! Pre-merge filters on candidate features.

use std::collections::BTreeMap;

use log::info;

use lincs_core::{CHROM_X, CHROM_Y, Feature};

///
/// Remove features whose envelope spans fewer than `min_length` bases.
/// Returns the number removed.
///
pub fn retain_min_length(features: &mut Vec<Feature>, min_length: i64) -> usize {
    let before = features.len();
    features.retain(|f| f.envelope_length() >= min_length);
    let removed = before - features.len();
    if removed > 0 {
        info!(
            "Removed {} features shorter than {} bases ({} left)",
            removed,
            min_length,
            features.len()
        );
    }
    removed
}

/// Drop the X and Y buckets, returning the number of features removed.
pub fn drop_sex_chromosomes(by_chrom: &mut BTreeMap<u8, Vec<Feature>>) -> usize {
    [CHROM_X, CHROM_Y]
        .iter()
        .filter_map(|c| by_chrom.remove(c))
        .map(|fs| fs.len())
        .sum()
}
