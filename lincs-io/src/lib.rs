//! # Input/Output utilities for lincs.
//!
//! Thin readers and writers around the lincs data model: BED and GTF feature
//! readers, a BED12 writer, the merged-name audit table, the per-base
//! classification array files and the point tables classified against them.
//! Every reader transparently handles `.gz` input, and every writer gzips
//! when the target path ends in `.gz`.
//!
pub mod arrays;
pub mod bed;
pub mod error;
pub mod gtf;
pub mod points;
pub mod tables;
pub mod utils;

// re-expose core functions
pub use arrays::*;
pub use bed::*;
pub use error::*;
pub use gtf::*;
pub use points::*;
pub use tables::*;
pub use utils::*;
