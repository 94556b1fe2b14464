//! Interval collapsing and transcript merging.
//!
//! This crate turns feature lists gathered from several annotation sources
//! into a deduplicated feature set:
//!
//! - [`collapse`]: reduce plain intervals to their minimal non-overlapping cover
//! - [`transcripts`]: merge whole features whose exons overlap by at least half
//!   of either exon, on compatible strands
//! - [`coverage`]: bases of the genome covered by a feature set
//! - [`filters`] and [`exclusion`]: pre-merge filtering of candidate features
//!
//! # Example
//!
//! ```
//! use lincs_core::{Feature, Strand};
//! use lincs_merge::merge_transcripts;
//!
//! let a = Feature::new("tx_a", Strand::Plus, 1, vec![100], vec![199]).unwrap();
//! let b = Feature::new("tx_b_long", Strand::Plus, 1, vec![150], vec![249]).unwrap();
//!
//! let merged = merge_transcripts(vec![a, b]).unwrap();
//! assert_eq!(merged.features.len(), 1);
//! assert_eq!(merged.features[0].name, "tx_a");
//! ```

pub mod collapse;
pub mod coverage;
pub mod exclusion;
pub mod filters;
pub mod transcripts;

// re-exports
pub use collapse::Collapse;
pub use coverage::{chromosome_coverage, genome_coverage};
pub use exclusion::{ExclusionStats, exclude_near};
pub use filters::{drop_sex_chromosomes, retain_min_length};
pub use transcripts::{
    MergeEvent, MergeReport, MergedChromosome, merge_all, merge_features, merge_transcripts,
};
