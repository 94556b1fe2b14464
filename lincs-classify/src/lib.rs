//! Per-base classification of chromosomes.
//!
//! Every base of a chromosome is labelled intergenic, coding only, noncoding
//! only, both, or other non-intergenic, by painting three interval sources
//! in a fixed order:
//!
//! ```
//! use lincs_classify::ClassificationArray;
//! use lincs_core::Interval;
//!
//! let coding = [Interval::from((1, 1)), Interval::from((5, 5))];
//! let noncoding = [Interval::from((2, 3))];
//! let other = [Interval::from((9, 9))];
//!
//! let array = ClassificationArray::build(10, &coding, &noncoding, &other, 0).unwrap();
//! let letters: Vec<u8> = array.bytes().collect();
//! assert_eq!(letters, b"mllimiiini");
//! ```
pub mod array;
pub mod category;
pub mod genome;
pub mod points;

// re-exports
pub use array::ClassificationArray;
pub use category::{Category, Pass};
pub use genome::{
    GenomeIntervals, classify_genome, classify_genome_with, collect_loci, envelopes_by_chromosome,
};
pub use points::{CategorizedPoints, categorize_points};
