use std::collections::BTreeMap;

use lincs_core::{Feature, Interval};

use crate::collapse::Collapse;

///
/// Bases of one chromosome covered by the envelopes of `features`.
///
/// Envelopes are collapsed first, so features that overlap without having
/// been merged are not counted twice.
///
pub fn chromosome_coverage(features: &[Feature]) -> i64 {
    let mut envelopes: Vec<Interval> = features.iter().map(|f| f.envelope()).collect();
    envelopes.collapse();
    envelopes.iter().map(|e| e.width()).sum()
}

/// Sum of [`chromosome_coverage`] over every chromosome.
pub fn genome_coverage(by_chrom: &BTreeMap<u8, Vec<Feature>>) -> i64 {
    by_chrom.values().map(|fs| chromosome_coverage(fs)).sum()
}
