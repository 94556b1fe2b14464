//! Core data model for the lincs feature merging engine.
//!
//! This crate holds the types every other lincs crate builds on:
//!
//! - [`Feature`]: a multi-exon genomic element and its envelope
//! - [`Interval`]: a closed, 1-based `(start, stop)` pair
//! - [`Strand`]: strand annotation including the partial-information tags
//!   produced when stranded and unstranded features are merged
//! - [`ChromSizes`]: injected chromosome length table
//! - [`predicates`]: the overlap and strand-compatibility predicates
//!
//! All coordinates are 1-based and inclusive on both ends.
pub mod chrom;
pub mod consts;
pub mod errors;
pub mod models;
pub mod predicates;

// re-exports
pub use chrom::{chromosome_name, parse_chromosome, partition_by_chromosome, ChromSizes};
pub use consts::*;
pub use errors::{LincsError, Result};
pub use models::{Feature, Interval, Strand};
pub use predicates::{overlaps, strand_compatible};
