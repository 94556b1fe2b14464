use std::fmt::{self, Display};

use crate::consts::{CHROM_Y, MAX_MARGIN};
use crate::errors::{LincsError, Result};
use crate::models::{Interval, Strand};

///
/// Feature struct, representation of one multi-exon genomic element
/// (e.g. a transcript) on a single chromosome.
///
/// Exons are held as index-aligned `exon_starts` / `exon_stops` /
/// `exon_numbers` vectors: exon *k* spans `[exon_starts[k], exon_stops[k]]`.
/// The vectors are never reordered implicitly.
///
/// The envelope is derived from the exons but is **not** kept in sync by the
/// exon mutators ([`Feature::extend_exons`], [`Feature::set_exons`]): callers
/// must invoke [`Feature::compute_envelope`] after changing the exon list.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub strand: Strand,
    /// Source dataset tags of everything merged into this feature, e.g. `"BG"`.
    pub provenance: String,
    /// Names of every original feature merged into this one.
    pub aliases: Vec<String>,
    chromosome: u8,
    exon_starts: Vec<i64>,
    exon_stops: Vec<i64>,
    exon_numbers: Vec<u32>,
    envelope: Interval,
}

impl Feature {
    ///
    /// Create a new feature, numbering the exons 1..N in the given order.
    ///
    /// # Arguments
    /// - name: feature identifier
    /// - strand: strand annotation
    /// - chromosome: 1-22, 23 (X), 24 (Y) or 0 (unplaced)
    /// - exon_starts, exon_stops: index-aligned 1-based inclusive exon bounds
    ///
    pub fn new(
        name: &str,
        strand: Strand,
        chromosome: u8,
        exon_starts: Vec<i64>,
        exon_stops: Vec<i64>,
    ) -> Result<Self> {
        let exon_numbers = (1..=exon_starts.len() as u32).collect();
        Feature::with_exon_numbers(
            name,
            strand,
            chromosome,
            exon_starts,
            exon_stops,
            exon_numbers,
        )
    }

    ///
    /// Create a new feature with caller-supplied exon labels.
    ///
    pub fn with_exon_numbers(
        name: &str,
        strand: Strand,
        chromosome: u8,
        exon_starts: Vec<i64>,
        exon_stops: Vec<i64>,
        exon_numbers: Vec<u32>,
    ) -> Result<Self> {
        if exon_starts.len() != exon_stops.len() || exon_starts.len() != exon_numbers.len() {
            return Err(LincsError::MalformedFeature(format!(
                "{}: exon arrays differ in length (starts={}, stops={}, numbers={})",
                name,
                exon_starts.len(),
                exon_stops.len(),
                exon_numbers.len()
            )));
        }
        if exon_starts.is_empty() {
            return Err(LincsError::MalformedFeature(format!(
                "{}: feature has no exons",
                name
            )));
        }
        if chromosome > CHROM_Y {
            return Err(LincsError::MalformedFeature(format!(
                "{}: chromosome {} is out of range 0-{}",
                name, chromosome, CHROM_Y
            )));
        }
        validate_exons(name, &exon_starts, &exon_stops)?;

        let mut feature = Feature {
            name: name.to_string(),
            strand,
            provenance: String::new(),
            aliases: vec![name.to_string()],
            chromosome,
            exon_starts,
            exon_stops,
            exon_numbers,
            envelope: Interval { start: 0, stop: 0 },
        };
        feature.compute_envelope();
        Ok(feature)
    }

    /// Builder-style setter for the provenance tag.
    pub fn with_provenance(mut self, provenance: &str) -> Self {
        self.provenance = provenance.to_string();
        self
    }

    pub fn chromosome(&self) -> u8 {
        self.chromosome
    }

    pub fn exon_starts(&self) -> &[i64] {
        &self.exon_starts
    }

    pub fn exon_stops(&self) -> &[i64] {
        &self.exon_stops
    }

    pub fn exon_numbers(&self) -> &[u32] {
        &self.exon_numbers
    }

    pub fn exon_count(&self) -> usize {
        self.exon_starts.len()
    }

    /// Exons as intervals, in stored order.
    pub fn exons(&self) -> impl Iterator<Item = Interval> + '_ {
        self.exon_starts
            .iter()
            .zip(self.exon_stops.iter())
            .map(|(&start, &stop)| Interval { start, stop })
    }

    ///
    /// The envelope ("ranger") as last computed: `[min(exon_starts), max(exon_stops)]`,
    /// possibly widened by [`Feature::expand_envelope`].
    ///
    pub fn envelope(&self) -> Interval {
        self.envelope
    }

    /// Inclusive length of the envelope.
    pub fn envelope_length(&self) -> i64 {
        self.envelope.width()
    }

    /// Total number of exonic bases, counting overlapping exons once per exon.
    pub fn exon_length(&self) -> i64 {
        self.exons().map(|e| e.width()).sum()
    }

    ///
    /// Recompute the envelope from the current exon lists.
    ///
    /// Only reads the exon vectors; their order is left untouched.
    ///
    pub fn compute_envelope(&mut self) {
        let start = self.exon_starts.iter().copied().min().unwrap_or(0);
        let stop = self.exon_stops.iter().copied().max().unwrap_or(0);
        self.envelope = Interval { start, stop };
    }

    ///
    /// Widen the envelope by `margin` bases on each side. The lower bound is
    /// clamped at 0. Exons are not touched.
    ///
    pub fn expand_envelope(&mut self, margin: i64) -> Result<()> {
        if !(0..=MAX_MARGIN).contains(&margin) {
            return Err(LincsError::InvalidArgument(format!(
                "margin must be between 0 and {}, got {}",
                MAX_MARGIN, margin
            )));
        }
        self.envelope = self.envelope.expand(margin);
        Ok(())
    }

    ///
    /// Append the exons of `other` after this feature's own exons.
    ///
    /// The combined list is left as-is (possibly overlapping, unsorted) and the
    /// envelope is stale until [`Feature::compute_envelope`] is called.
    ///
    pub fn extend_exons(&mut self, other: &Feature) -> Result<()> {
        if other.chromosome != self.chromosome {
            return Err(LincsError::CrossChromosomeMerge {
                left: other.chromosome,
                right: self.chromosome,
            });
        }
        self.exon_starts.extend_from_slice(&other.exon_starts);
        self.exon_stops.extend_from_slice(&other.exon_stops);
        self.exon_numbers.extend_from_slice(&other.exon_numbers);
        Ok(())
    }

    ///
    /// Replace the exon list with `exons`, in the given order, numbered 1..K.
    ///
    /// The envelope is stale until [`Feature::compute_envelope`] is called.
    ///
    pub fn set_exons(&mut self, exons: &[Interval]) -> Result<()> {
        if exons.is_empty() {
            return Err(LincsError::MalformedFeature(format!(
                "{}: feature has no exons",
                self.name
            )));
        }
        let starts: Vec<i64> = exons.iter().map(|e| e.start).collect();
        let stops: Vec<i64> = exons.iter().map(|e| e.stop).collect();
        validate_exons(&self.name, &starts, &stops)?;

        self.exon_starts = starts;
        self.exon_stops = stops;
        self.exon_numbers = (1..=exons.len() as u32).collect();
        Ok(())
    }

    ///
    /// Get the feature as a tab-separated summary line
    /// (chromosome, envelope, name, strand, exon count, provenance)
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chromosome,
            self.envelope.start,
            self.envelope.stop,
            self.name,
            self.strand,
            self.exon_count(),
            self.provenance
        )
    }
}

fn validate_exons(name: &str, starts: &[i64], stops: &[i64]) -> Result<()> {
    for (k, (&start, &stop)) in starts.iter().zip(stops.iter()).enumerate() {
        if start < 1 {
            return Err(LincsError::MalformedFeature(format!(
                "{}: exon {} starts at {}; positions are 1-based",
                name,
                k + 1,
                start
            )));
        }
        if start > stop {
            return Err(LincsError::MalformedFeature(format!(
                "{}: exon {} is inverted ({} > {})",
                name,
                k + 1,
                start,
                stop
            )));
        }
    }
    Ok(())
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
