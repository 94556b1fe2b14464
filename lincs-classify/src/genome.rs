//! Genome-wide painting, one chromosome per rayon task.

use std::collections::BTreeMap;

use log::{debug, info};
use rayon::prelude::*;

use lincs_core::{ChromSizes, Feature, Interval, LincsError, Result};
use lincs_merge::Collapse;

use crate::array::ClassificationArray;
use crate::category::Category;

/// The three painting sources, keyed by chromosome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenomeIntervals {
    pub coding: BTreeMap<u8, Vec<Interval>>,
    pub noncoding: BTreeMap<u8, Vec<Interval>>,
    pub other: BTreeMap<u8, Vec<Interval>>,
}

///
/// Envelopes of `features`, bucketed by chromosome, in input order.
///
pub fn envelopes_by_chromosome(features: &[Feature]) -> BTreeMap<u8, Vec<Interval>> {
    let mut map: BTreeMap<u8, Vec<Interval>> = BTreeMap::new();
    for f in features {
        map.entry(f.chromosome()).or_default().push(f.envelope());
    }
    map
}

///
/// Collapsed envelopes of every feature in every set, per chromosome.
///
/// Used to derive the "other non-intergenic" source from annotation sets
/// such as full gene catalogues and pseudogene tables.
///
pub fn collect_loci(feature_sets: &[&[Feature]]) -> BTreeMap<u8, Vec<Interval>> {
    let mut loci: BTreeMap<u8, Vec<Interval>> = BTreeMap::new();
    for set in feature_sets {
        for f in set.iter() {
            loci.entry(f.chromosome()).or_default().push(f.envelope());
        }
    }
    for intervals in loci.values_mut() {
        intervals.collapse();
    }
    loci
}

fn bucket(map: &BTreeMap<u8, Vec<Interval>>, chrom: u8) -> &[Interval] {
    map.get(&chrom).map(Vec::as_slice).unwrap_or_default()
}

fn classify_chromosome(
    sizes: &ChromSizes,
    chrom: u8,
    sources: &GenomeIntervals,
    margin: i64,
) -> Result<ClassificationArray> {
    let size = sizes.get(chrom)?;
    let array = ClassificationArray::build(
        size,
        bucket(&sources.coding, chrom),
        bucket(&sources.noncoding, chrom),
        bucket(&sources.other, chrom),
        margin,
    )?;
    debug!(
        "chr{}: {} bases, {} coding, {} noncoding, {} both, {} other",
        chrom,
        array.len(),
        array.count(Category::CodingOnly),
        array.count(Category::NoncodingOnly),
        array.count(Category::Both),
        array.count(Category::NonIntergenicOther)
    );
    Ok(array)
}

///
/// Paint every chromosome in `chromosomes` in parallel and hand each finished
/// array to `sink`, so arrays can be written out and dropped one by one
/// instead of all being held at once.
///
/// Missing interval buckets are treated as empty. A failure on one
/// chromosome, whether painting or in `sink`, only affects that chromosome.
///
pub fn classify_genome_with<T, E, F>(
    sizes: &ChromSizes,
    chromosomes: &[u8],
    sources: &GenomeIntervals,
    margin: i64,
    sink: F,
) -> BTreeMap<u8, std::result::Result<T, E>>
where
    T: Send,
    E: From<LincsError> + Send,
    F: Fn(u8, ClassificationArray) -> std::result::Result<T, E> + Sync,
{
    info!(
        "Classifying {} chromosomes with margin {}",
        chromosomes.len(),
        margin
    );
    chromosomes
        .par_iter()
        .map(|&chrom| {
            let res = classify_chromosome(sizes, chrom, sources, margin)
                .map_err(E::from)
                .and_then(|array| sink(chrom, array));
            (chrom, res)
        })
        .collect()
}

///
/// Paint every chromosome in `chromosomes` in parallel, keeping all arrays.
///
pub fn classify_genome(
    sizes: &ChromSizes,
    chromosomes: &[u8],
    sources: &GenomeIntervals,
    margin: i64,
) -> BTreeMap<u8, Result<ClassificationArray>> {
    classify_genome_with(sizes, chromosomes, sources, margin, |_, array| Ok(array))
}
