//! Chromosome naming and chromosome length tables.
//!
//! Chromosomes are numbered 1-22 for autosomes, 23 for X, 24 for Y and 0 for
//! anything that cannot be placed.

use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::consts::{CHROM_UNPLACED, CHROM_X, CHROM_Y};
use crate::errors::{LincsError, Result};
use crate::models::Feature;

/// GRCh37 chromosome lengths (1-22, X, Y).
const HG19_SIZES: [i64; 24] = [
    249250621, 243199373, 198022430, 191154276, 180915260, 171115067, 159138663, 146364022,
    141213431, 135534747, 135006516, 133851895, 115169878, 107349540, 102531392, 90354753,
    81195210, 78077248, 59128983, 63025520, 48129895, 51304566, 155270560, 59373566,
];

///
/// Parse a chromosome name into its number.
///
/// Handles `chr`-prefixed and bare names, `X`/`Y`, and suffixed contigs such as
/// `chr6_random` (mapped to their parent chromosome). Everything else is 0.
///
pub fn parse_chromosome(name: &str) -> u8 {
    let name = name.trim();
    let bare = name.strip_prefix("chr").unwrap_or(name);
    let head = bare.split('_').next().unwrap_or(bare);
    match head {
        "X" | "x" => CHROM_X,
        "Y" | "y" => CHROM_Y,
        num => match num.parse::<u8>() {
            Ok(n) if (1..=22).contains(&n) => n,
            _ => CHROM_UNPLACED,
        },
    }
}

/// Inverse of [`parse_chromosome`] for placed chromosomes.
pub fn chromosome_name(chromosome: u8) -> String {
    match chromosome {
        CHROM_X => "chrX".to_string(),
        CHROM_Y => "chrY".to_string(),
        1..=22 => format!("chr{}", chromosome),
        _ => "chrUn".to_string(),
    }
}

///
/// Bucket features by chromosome. Unplaced features (chromosome 0) are dropped.
///
pub fn partition_by_chromosome(features: Vec<Feature>) -> BTreeMap<u8, Vec<Feature>> {
    let mut by_chrom: BTreeMap<u8, Vec<Feature>> = BTreeMap::new();
    let mut unplaced = 0usize;
    for feature in features {
        if feature.chromosome() == CHROM_UNPLACED {
            unplaced += 1;
            continue;
        }
        by_chrom.entry(feature.chromosome()).or_default().push(feature);
    }
    if unplaced > 0 {
        warn!("Dropped {} features with no chromosome placement", unplaced);
    }
    by_chrom
}

///
/// Chromosome length table, injected into the classification builder.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromSizes {
    sizes: BTreeMap<u8, i64>,
}

impl ChromSizes {
    /// GRCh37/hg19 lengths for chromosomes 1-22, X and Y.
    pub fn hg19() -> Self {
        let sizes = HG19_SIZES
            .iter()
            .enumerate()
            .map(|(i, &size)| (i as u8 + 1, size))
            .collect();
        ChromSizes { sizes }
    }

    /// The same size for every listed chromosome. Handy for tests.
    pub fn uniform(size: i64, chromosomes: impl IntoIterator<Item = u8>) -> Result<Self> {
        if size <= 0 {
            return Err(LincsError::InvalidArgument(format!(
                "chromosome size must be positive, got {}",
                size
            )));
        }
        Ok(ChromSizes {
            sizes: chromosomes.into_iter().map(|c| (c, size)).collect(),
        })
    }

    ///
    /// Build from a name-keyed table such as `{"chr1": 249250621}`.
    ///
    pub fn from_named(named: &HashMap<String, i64>) -> Result<Self> {
        let mut sizes = BTreeMap::new();
        for (name, &size) in named {
            let chrom = parse_chromosome(name);
            if chrom == CHROM_UNPLACED {
                return Err(LincsError::InvalidArgument(format!(
                    "unrecognised chromosome name in size table: {}",
                    name
                )));
            }
            if size <= 0 {
                return Err(LincsError::InvalidArgument(format!(
                    "chromosome size must be positive, got {} for {}",
                    size, name
                )));
            }
            sizes.insert(chrom, size);
        }
        Ok(ChromSizes { sizes })
    }

    pub fn get(&self, chromosome: u8) -> Result<i64> {
        self.sizes.get(&chromosome).copied().ok_or_else(|| {
            LincsError::InvalidArgument(format!(
                "no size known for {}",
                chromosome_name(chromosome)
            ))
        })
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = u8> + '_ {
        self.sizes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Strand;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("chr1", 1)]
    #[case("chr22", 22)]
    #[case("chrX", 23)]
    #[case("Y", 24)]
    #[case("7", 7)]
    #[case("chr6_random", 6)]
    #[case("chrUn_gl000220", 0)]
    #[case("chrM", 0)]
    #[case("chr23", 0)]
    fn test_parse_chromosome(#[case] name: &str, #[case] expected: u8) {
        assert_eq!(parse_chromosome(name), expected);
    }

    #[rstest]
    fn test_chromosome_name_round_trip() {
        for c in 1..=24u8 {
            assert_eq!(parse_chromosome(&chromosome_name(c)), c);
        }
        assert_eq!(chromosome_name(0), "chrUn");
    }

    #[rstest]
    fn test_hg19_sizes() {
        let sizes = ChromSizes::hg19();
        assert_eq!(sizes.len(), 24);
        assert_eq!(sizes.get(1).unwrap(), 249250621);
        assert_eq!(sizes.get(22).unwrap(), 51304566);
        assert!(sizes.get(0).is_err());
    }

    #[rstest]
    fn test_uniform_sizes() {
        let sizes = ChromSizes::uniform(300, 1..=22).unwrap();
        assert_eq!(sizes.len(), 22);
        assert_eq!(sizes.get(5).unwrap(), 300);
        assert!(ChromSizes::uniform(0, 1..=2).is_err());
    }

    #[rstest]
    fn test_from_named() {
        let named: HashMap<String, i64> =
            [("chr2".to_string(), 50), ("chrX".to_string(), 70)].into();
        let sizes = ChromSizes::from_named(&named).unwrap();
        assert_eq!(sizes.chromosomes().collect::<Vec<_>>(), vec![2, 23]);

        let bad: HashMap<String, i64> = [("chrM".to_string(), 50)].into();
        assert!(ChromSizes::from_named(&bad).is_err());
    }

    #[rstest]
    fn test_partition_by_chromosome() {
        let features = vec![
            Feature::new("a", Strand::Plus, 2, vec![1], vec![10]).unwrap(),
            Feature::new("b", Strand::Plus, 0, vec![1], vec![10]).unwrap(),
            Feature::new("c", Strand::Plus, 1, vec![1], vec![10]).unwrap(),
            Feature::new("d", Strand::Plus, 2, vec![1], vec![10]).unwrap(),
        ];
        let by_chrom = partition_by_chromosome(features);
        assert_eq!(by_chrom.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(by_chrom[&2].len(), 2);
        assert_eq!(by_chrom[&2][1].name, "d");
    }
}
