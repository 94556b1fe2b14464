//! Exon-aware transcript merging.
//!
//! Two features on one chromosome are merged when their envelopes overlap,
//! their strands are compatible and at least one pair of exons (one from each)
//! overlaps by half or more of either exon's own length. Merging is repeated
//! until no mergeable pair is left.

use std::collections::{BTreeMap, VecDeque};

use log::{debug, info};
use rayon::prelude::*;

use lincs_core::{Feature, Interval, LincsError, Result, strand_compatible};

use crate::collapse::Collapse;

///
/// Bookkeeping for a single merge: `absorbed` was folded into `survivor`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEvent {
    pub absorbed: String,
    pub survivor: String,
    pub absorbed_exon_length: i64,
    pub survivor_exon_length: i64,
    /// Sum of overlaps over every exon pair of the two features.
    pub exonic_overlap: i64,
    pub absorbed_fraction: f64,
    pub survivor_fraction: f64,
    /// Overlap relative to the exonic length of the merged feature.
    pub merged_fraction: f64,
}

///
/// Counters and events gathered while merging one or more chromosomes.
///
/// The counters tally pairwise comparisons, so a pair revisited after one of
/// its members grew is counted again.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub envelope_overlaps: usize,
    pub exon_merges: usize,
    pub envelope_only: usize,
    pub disjoint: usize,
    pub events: Vec<MergeEvent>,
}

impl MergeReport {
    /// Fold another report into this one.
    pub fn absorb(&mut self, other: MergeReport) {
        self.envelope_overlaps += other.envelope_overlaps;
        self.exon_merges += other.exon_merges;
        self.envelope_only += other.envelope_only;
        self.disjoint += other.disjoint;
        self.events.extend(other.events);
    }
}

/// Merged features of one chromosome, with the report of how they came about.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedChromosome {
    pub features: Vec<Feature>,
    pub report: MergeReport,
}

enum PairOutcome {
    Disjoint,
    EnvelopeOnly,
    Mergeable,
}

fn compare(a: &Feature, b: &Feature) -> PairOutcome {
    if a.envelope().overlap(&b.envelope(), 0) == 0 || !strand_compatible(a.strand, b.strand) {
        return PairOutcome::Disjoint;
    }
    if exons_overlap(a, b) {
        PairOutcome::Mergeable
    } else {
        PairOutcome::EnvelopeOnly
    }
}

///
/// Whether some exon of `a` and some exon of `b` overlap by at least half of
/// either exon's length.
///
/// An exon of even length `L` qualifies from exactly `L/2` shared bases; for
/// odd lengths the integer half is rounded up.
///
pub fn exons_overlap(a: &Feature, b: &Feature) -> bool {
    a.exons().any(|ea| {
        b.exons().any(|eb| {
            let amount = ea.overlap(&eb, 0);
            amount > 0 && (2 * amount >= ea.width() || 2 * amount >= eb.width())
        })
    })
}

fn exonic_overlap(a: &Feature, b: &Feature) -> i64 {
    a.exons()
        .map(|ea| b.exons().map(|eb| ea.overlap(&eb, 0)).sum::<i64>())
        .sum()
}

fn fraction(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).min(1.0)
}

///
/// Collapse overlapping exons, sort them by start, renumber them 1..K and
/// refresh the envelope.
///
pub fn clean_up_exons(feature: &mut Feature) -> Result<()> {
    let mut exons: Vec<Interval> = feature.exons().collect();
    exons.collapse();
    feature.set_exons(&exons)?;
    feature.compute_envelope();
    Ok(())
}

///
/// Merge `absorbed` into `survivor`.
///
/// The survivor takes the combined strand, the shorter of the two names, the
/// union of both exon lists (cleaned) and the concatenated provenance and
/// aliases. Nothing is modified when the features cannot be merged.
///
/// # Errors
/// - `CrossChromosomeMerge` if the features lie on different chromosomes
/// - `InvalidArgument` if their strands are incompatible
///
pub fn merge_features(absorbed: Feature, survivor: &mut Feature) -> Result<MergeEvent> {
    if absorbed.chromosome() != survivor.chromosome() {
        return Err(LincsError::CrossChromosomeMerge {
            left: absorbed.chromosome(),
            right: survivor.chromosome(),
        });
    }
    let strand = survivor.strand.combine(&absorbed.strand).ok_or_else(|| {
        LincsError::InvalidArgument(format!(
            "cannot merge {} ({}) with {} ({}): incompatible strands",
            absorbed.name, absorbed.strand, survivor.name, survivor.strand
        ))
    })?;

    let absorbed_exon_length = absorbed.exon_length();
    let survivor_exon_length = survivor.exon_length();
    let overlap = exonic_overlap(&absorbed, survivor);
    let absorbed_name = absorbed.name.clone();
    let survivor_name = survivor.name.clone();

    survivor.extend_exons(&absorbed)?;
    clean_up_exons(survivor)?;

    survivor.strand = strand;
    if absorbed.name.len() < survivor.name.len() {
        survivor.name = absorbed.name;
    }
    survivor.provenance.push_str(&absorbed.provenance);
    survivor.aliases.extend(absorbed.aliases);

    let merged_exon_length = survivor.exon_length();
    Ok(MergeEvent {
        absorbed: absorbed_name,
        survivor: survivor_name,
        absorbed_exon_length,
        survivor_exon_length,
        exonic_overlap: overlap,
        absorbed_fraction: fraction(overlap, absorbed_exon_length),
        survivor_fraction: fraction(overlap, survivor_exon_length),
        merged_fraction: fraction(overlap, merged_exon_length),
    })
}

///
/// Merge every mergeable cluster of features on one chromosome.
///
/// Features are held in slots. Each queued slot is compared against every
/// other live slot; on the first mergeable pair the lower slot is absorbed
/// into the higher one, which goes back on the queue. The pass ends when the
/// queue is empty, at which point no two remaining features are mergeable.
/// Survivors are returned in their original relative order.
///
/// # Errors
/// Any error aborts the whole chromosome; no partial result is returned.
///
pub fn merge_transcripts(features: Vec<Feature>) -> Result<MergedChromosome> {
    let chrom = features.first().map(|f| f.chromosome()).unwrap_or_default();
    if let Some(stray) = features.iter().find(|f| f.chromosome() != chrom) {
        return Err(LincsError::CrossChromosomeMerge {
            left: chrom,
            right: stray.chromosome(),
        });
    }
    let n = features.len();

    let mut slots: Vec<Option<Feature>> = features.into_iter().map(Some).collect();
    let mut queue: VecDeque<usize> = (0..n).collect();
    let mut queued = vec![true; n];
    let mut report = MergeReport::default();

    while let Some(i) = queue.pop_front() {
        queued[i] = false;

        for j in 0..n {
            if i == j {
                continue;
            }
            let outcome = match (&slots[i], &slots[j]) {
                (Some(a), Some(b)) => compare(a, b),
                (None, _) => break,
                (_, None) => continue,
            };
            match outcome {
                PairOutcome::Disjoint => report.disjoint += 1,
                PairOutcome::EnvelopeOnly => {
                    report.envelope_overlaps += 1;
                    report.envelope_only += 1;
                }
                PairOutcome::Mergeable => {
                    report.envelope_overlaps += 1;
                    report.exon_merges += 1;

                    let (lo, hi) = (i.min(j), i.max(j));
                    if let (Some(absorbed), Some(survivor)) = take_pair(&mut slots, lo, hi) {
                        let event = merge_features(absorbed, survivor)?;
                        debug!(
                            "chr{}: merged {} into {} (overlap {}, {:.2}/{:.2})",
                            chrom,
                            event.absorbed,
                            event.survivor,
                            event.exonic_overlap,
                            event.absorbed_fraction,
                            event.survivor_fraction
                        );
                        report.events.push(event);
                    }
                    if !queued[hi] {
                        queue.push_back(hi);
                        queued[hi] = true;
                    }
                    break;
                }
            }
        }
    }

    let features: Vec<Feature> = slots.into_iter().flatten().collect();
    info!(
        "chr{}: {} features -> {} after {} merges ({} envelope overlaps, {} without exon overlap, {} disjoint)",
        chrom,
        n,
        features.len(),
        report.exon_merges,
        report.envelope_overlaps,
        report.envelope_only,
        report.disjoint
    );
    Ok(MergedChromosome { features, report })
}

/// Take the feature in slot `lo` and borrow the one in slot `hi` (`lo < hi`).
fn take_pair(
    slots: &mut [Option<Feature>],
    lo: usize,
    hi: usize,
) -> (Option<Feature>, Option<&mut Feature>) {
    let (head, tail) = slots.split_at_mut(hi);
    (head[lo].take(), tail[0].as_mut())
}

///
/// Run [`merge_transcripts`] on every chromosome bucket in parallel.
///
/// A failing chromosome yields its own `Err`; the others are unaffected.
///
pub fn merge_all(by_chrom: BTreeMap<u8, Vec<Feature>>) -> BTreeMap<u8, Result<MergedChromosome>> {
    by_chrom
        .into_par_iter()
        .map(|(chrom, features)| (chrom, merge_transcripts(features)))
        .collect()
}
