//! Removal of candidate features that sit on or near reference features.
//!
//! Candidates (e.g. putative non-coding transcripts) are dropped when they
//! overlap a blacklisted feature, or when they lie too close to a coding
//! feature: within `distance` bases unless the two sit on definite opposite
//! strands, in which case they must overlap. `PlusOrUnknown` and
//! `MinusOrUnknown` count as unstranded here.

use std::collections::BTreeMap;

use log::info;

use lincs_core::{Feature, LincsError, MAX_MARGIN, Result, Strand};

/// How many candidates each rule removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionStats {
    pub blacklisted: usize,
    pub near_coding: usize,
}

impl ExclusionStats {
    pub fn total(&self) -> usize {
        self.blacklisted + self.near_coding
    }
}

fn by_chromosome(features: &[Feature]) -> BTreeMap<u8, Vec<&Feature>> {
    let mut map: BTreeMap<u8, Vec<&Feature>> = BTreeMap::new();
    for f in features {
        map.entry(f.chromosome()).or_default().push(f);
    }
    map
}

/// Only a definite `+`/`-` pair counts; partial tags are treated as unstranded.
fn opposite_strands(a: Strand, b: Strand) -> bool {
    matches!(
        (a, b),
        (Strand::Plus, Strand::Minus) | (Strand::Minus, Strand::Plus)
    )
}

fn near_coding(candidate: &Feature, coding: &Feature, half_distance: i64) -> bool {
    let (a, b) = (candidate.envelope(), coding.envelope());
    if opposite_strands(candidate.strand, coding.strand) {
        a.overlap(&b, 0) > 0
    } else {
        a.overlap(&b, half_distance) > 0
    }
}

///
/// Remove candidates that overlap a `blacklist` feature or lie near a
/// `coding` feature, in place.
///
/// Proximity is tested by extending both envelopes by `distance / 2`, so two
/// features on the same strand separated by a gap of at most `distance - 1`
/// bases (for even `distance`) count as near. Each removed candidate is
/// counted once, under the first rule that matched.
///
/// # Errors
/// `InvalidArgument` if `distance` is outside `0..=2 * MAX_MARGIN`.
///
pub fn exclude_near(
    candidates: &mut Vec<Feature>,
    coding: &[Feature],
    blacklist: &[Feature],
    distance: i64,
) -> Result<ExclusionStats> {
    if !(0..=2 * MAX_MARGIN).contains(&distance) {
        return Err(LincsError::InvalidArgument(format!(
            "exclusion distance must be between 0 and {}, got {}",
            2 * MAX_MARGIN,
            distance
        )));
    }
    let half_distance = distance / 2;
    let coding = by_chromosome(coding);
    let blacklist = by_chromosome(blacklist);
    let before = candidates.len();

    let mut stats = ExclusionStats::default();
    candidates.retain(|cand| {
        let chrom = cand.chromosome();
        let env = cand.envelope();

        let blacklisted = blacklist
            .get(&chrom)
            .is_some_and(|bl| bl.iter().any(|b| env.overlap(&b.envelope(), 0) > 0));
        if blacklisted {
            stats.blacklisted += 1;
            return false;
        }

        let near = coding
            .get(&chrom)
            .is_some_and(|cs| cs.iter().any(|c| near_coding(cand, c, half_distance)));
        if near {
            stats.near_coding += 1;
            return false;
        }
        true
    });

    info!(
        "Exclusion: {} -> {} candidates ({} blacklisted, {} near coding)",
        before,
        candidates.len(),
        stats.blacklisted,
        stats.near_coding
    );
    Ok(stats)
}
