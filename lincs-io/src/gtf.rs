//! GTF reader.
//!
//! GTF coordinates are already 1-based and inclusive. Consecutive `exon`
//! lines sharing a name, strand and chromosome are compressed into one
//! multi-exon feature.

use std::io::BufRead;
use std::path::Path;

use lincs_core::{Feature, Strand, parse_chromosome};

use crate::error::{LincsIoError, Result};
use crate::utils::get_dynamic_reader;

const UNNAMED: &str = "empty";

/// One parsed `exon` line.
#[derive(Debug, Clone, PartialEq)]
struct ExonRecord {
    name: String,
    chromosome: u8,
    strand: Strand,
    start: i64,
    stop: i64,
    exon_number: Option<u32>,
    gene_type: Option<String>,
}

/// Value of attribute `key` in a GTF attribute column, quotes stripped.
fn attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once(char::is_whitespace)?;
        (k == key).then(|| v.trim().trim_matches('"'))
    })
}

fn parse_exon_line(line: &str, line_no: usize) -> Result<Option<ExonRecord>> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return Err(LincsIoError::Parse {
            line: line_no,
            reason: format!("expected 9 tab-separated columns, found {}", fields.len()),
        });
    }
    if fields[2] != "exon" {
        return Ok(None);
    }
    let position = |field: &str, what: &str| {
        field.parse::<i64>().map_err(|_| LincsIoError::Parse {
            line: line_no,
            reason: format!("invalid {}: {:?}", what, field),
        })
    };
    let attrs = fields[8];
    let name = attribute(attrs, "gene_name")
        .or_else(|| attribute(attrs, "gene_id"))
        .unwrap_or(UNNAMED);

    Ok(Some(ExonRecord {
        name: name.to_string(),
        chromosome: parse_chromosome(fields[0]),
        strand: Strand::from_char(fields[6].chars().next().unwrap_or('.')),
        start: position(fields[3], "start")?,
        stop: position(fields[4], "end")?,
        exon_number: attribute(attrs, "exon_number").and_then(|n| n.parse().ok()),
        gene_type: attribute(attrs, "gene_type").map(str::to_string),
    }))
}

/// Exons of one feature under construction.
struct Pending {
    head: ExonRecord,
    starts: Vec<i64>,
    stops: Vec<i64>,
    numbers: Vec<u32>,
}

impl Pending {
    fn new(rec: ExonRecord) -> Self {
        let mut pending = Pending {
            starts: Vec::new(),
            stops: Vec::new(),
            numbers: Vec::new(),
            head: rec.clone(),
        };
        pending.push(rec);
        pending
    }

    fn continues(&self, rec: &ExonRecord) -> bool {
        rec.name == self.head.name
            && rec.strand == self.head.strand
            && rec.chromosome == self.head.chromosome
    }

    fn push(&mut self, rec: ExonRecord) {
        let number = rec.exon_number.unwrap_or(self.starts.len() as u32 + 1);
        self.starts.push(rec.start);
        self.stops.push(rec.stop);
        self.numbers.push(number);
    }

    fn finish(self, tag: &str) -> Result<Feature> {
        let feature = Feature::with_exon_numbers(
            &self.head.name,
            self.head.strand,
            self.head.chromosome,
            self.starts,
            self.stops,
            self.numbers,
        )?;
        Ok(feature.with_provenance(tag))
    }
}

///
/// Read the `exon` lines of a GTF file (optionally gzip'd) into features.
///
/// # Arguments
/// - path: GTF file
/// - tag: provenance tag given to every feature
/// - gene_type: when set, only exons whose `gene_type` attribute equals it are kept
///
pub fn read_gtf(path: &Path, tag: &str, gene_type: Option<&str>) -> Result<Vec<Feature>> {
    let reader = get_dynamic_reader(path)?;
    let mut features = Vec::new();
    let mut pending: Option<Pending> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let Some(rec) = parse_exon_line(&line, idx + 1)? else {
            continue;
        };
        if let Some(wanted) = gene_type {
            if rec.gene_type.as_deref() != Some(wanted) {
                continue;
            }
        }
        if let Some(p) = pending.as_mut().filter(|p| p.continues(&rec)) {
            p.push(rec);
            continue;
        }
        if let Some(done) = pending.replace(Pending::new(rec)) {
            features.push(done.finish(tag)?);
        }
    }
    if let Some(done) = pending {
        features.push(done.finish(tag)?);
    }

    log::info!("Read {} features from {}", features.len(), path.display());
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GTF: &str = "\
##description: test
chr1\tsrc\tgene\t100\t500\t.\t+\t.\tgene_id \"G1\"; gene_name \"LINC1\"; gene_type \"lincRNA\";
chr1\tsrc\texon\t100\t200\t.\t+\t.\tgene_id \"G1\"; gene_name \"LINC1\"; gene_type \"lincRNA\"; exon_number 1;
chr1\tsrc\texon\t300\t500\t.\t+\t.\tgene_id \"G1\"; gene_name \"LINC1\"; gene_type \"lincRNA\"; exon_number 2;
chr1\tsrc\texon\t900\t950\t.\t-\t.\tgene_id \"G1\"; gene_name \"LINC1\"; gene_type \"lincRNA\";
chr2_random\tsrc\texon\t10\t20\t.\t.\t.\tgene_id \"G2\"; gene_type \"protein_coding\";
chr2\tsrc\texon\t30\t40\t.\t+\t.\ttranscript_id \"T3\";
";

    #[fixture]
    fn gtf_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GTF.as_bytes()).unwrap();
        file
    }

    #[rstest]
    fn test_attribute() {
        let attrs = "gene_id \"G1\"; gene_name \"LINC1\"; exon_number 2;";
        assert_eq!(attribute(attrs, "gene_name"), Some("LINC1"));
        assert_eq!(attribute(attrs, "exon_number"), Some("2"));
        assert_eq!(attribute(attrs, "gene_type"), None);
    }

    #[rstest]
    fn test_read_gtf_groups_consecutive_exons(gtf_file: NamedTempFile) {
        let features = read_gtf(gtf_file.path(), "B", None).unwrap();
        assert_eq!(features.len(), 4);

        let linc = &features[0];
        assert_eq!(linc.name, "LINC1");
        assert_eq!(linc.exon_starts(), &[100, 300]);
        assert_eq!(linc.exon_numbers(), &[1, 2]);
        assert_eq!(linc.provenance, "B");

        // same name, other strand: a separate feature
        assert_eq!(features[1].strand, Strand::Minus);
        assert_eq!(features[1].exon_count(), 1);

        assert_eq!(features[2].name, "G2");
        assert_eq!(features[2].chromosome(), 2);
        assert_eq!(features[3].name, "empty");
    }

    #[rstest]
    fn test_read_gtf_gene_type_filter(gtf_file: NamedTempFile) {
        let features = read_gtf(gtf_file.path(), "G", Some("protein_coding")).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "G2");
    }

    #[rstest]
    fn test_bad_coordinates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\tsrc\texon\tone\t200\t.\t+\t.\tgene_id \"G\";").unwrap();
        assert!(matches!(
            read_gtf(file.path(), "", None),
            Err(LincsIoError::Parse { line: 1, .. })
        ));
    }
}
