use std::io::{BufRead, Write};
use std::path::Path;

use lincs_core::{Feature, Strand, chromosome_name, parse_chromosome};

use crate::error::{LincsIoError, Result};
use crate::utils::{get_dynamic_reader, get_dynamic_writer};

const BED_SCORE: u32 = 500;
const BED_RGB: &str = "255,0,0";

fn parse_err(line: usize, reason: impl Into<String>) -> LincsIoError {
    LincsIoError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_int(field: &str, what: &str, line: usize) -> Result<i64> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| parse_err(line, format!("invalid {}: {:?}", what, field)))
}

fn parse_list(field: &str, what: &str, line: usize) -> Result<Vec<i64>> {
    field
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_int(s, what, line))
        .collect()
}

///
/// Parse one BED record into a [`Feature`].
///
/// BED12 records give one exon per block. Shorter records (BED3 to BED6)
/// become a single exon spanning the record. Coordinates are converted from
/// 0-based half-open to 1-based inclusive.
///
/// # Arguments
/// - line: the raw record
/// - line_no: 1-based line number, used in error messages
///
pub fn parse_bed_line(line: &str, line_no: usize) -> Result<Feature> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(parse_err(
            line_no,
            format!("expected at least 3 columns, found {}", fields.len()),
        ));
    }
    let chrom = parse_chromosome(fields[0]);
    let chrom_start = parse_int(fields[1], "chromStart", line_no)?;
    let chrom_end = parse_int(fields[2], "chromEnd", line_no)?;

    let name = match fields.get(3) {
        Some(name) => name.to_string(),
        None => format!("{}:{}-{}", fields[0], chrom_start + 1, chrom_end),
    };
    let strand = match fields.get(5) {
        Some(s) => s
            .parse::<Strand>()
            .map_err(|e| parse_err(line_no, e.to_string()))?,
        None => Strand::Unknown,
    };

    let (starts, stops) = if fields.len() >= 12 {
        let block_count = parse_int(fields[9], "blockCount", line_no)?;
        let sizes = parse_list(fields[10], "blockSizes", line_no)?;
        let offsets = parse_list(fields[11], "blockStarts", line_no)?;
        if sizes.len() as i64 != block_count || offsets.len() as i64 != block_count {
            return Err(parse_err(
                line_no,
                format!(
                    "blockCount is {} but found {} sizes and {} starts",
                    block_count,
                    sizes.len(),
                    offsets.len()
                ),
            ));
        }
        offsets
            .iter()
            .zip(sizes.iter())
            .map(|(&offset, &size)| (chrom_start + offset + 1, chrom_start + offset + size))
            .unzip()
    } else {
        (vec![chrom_start + 1], vec![chrom_end])
    };

    Ok(Feature::new(&name, strand, chrom, starts, stops)?)
}

///
/// Read every record of a BED file (optionally gzip'd) into features tagged
/// with `tag` as their provenance.
///
/// `track`, `browser` and `#` lines are skipped.
///
pub fn read_bed(path: &Path, tag: &str) -> Result<Vec<Feature>> {
    let reader = get_dynamic_reader(path)?;
    let mut features = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with("track")
            || trimmed.starts_with("browser")
            || trimmed.starts_with('#')
        {
            continue;
        }
        features.push(parse_bed_line(trimmed, idx + 1)?.with_provenance(tag));
    }
    log::info!("Read {} features from {}", features.len(), path.display());
    Ok(features)
}

///
/// Format a feature as a BED12 record (without trailing newline).
///
/// Partial strand tags have no BED equivalent and are written as `.`.
///
pub fn to_bed_line(feature: &Feature) -> String {
    let env = feature.envelope();
    let chrom_start = env.start - 1;
    let sizes: String = feature.exons().map(|e| format!("{},", e.width())).collect();
    let offsets: String = feature
        .exons()
        .map(|e| format!("{},", e.start - 1 - chrom_start))
        .collect();

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        chromosome_name(feature.chromosome()),
        chrom_start,
        env.stop,
        feature.name,
        BED_SCORE,
        feature.strand.as_bed_char(),
        chrom_start,
        env.stop,
        BED_RGB,
        feature.exon_count(),
        sizes,
        offsets
    )
}

pub trait BedWrite {
    ///
    /// Write features to disk as BED12, gzip'd when the path ends in `.gz`
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> Result<()>;
}

impl BedWrite for [Feature] {
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let mut writer = get_dynamic_writer(path.as_ref())?;
        for feature in self {
            writeln!(writer, "{}", to_bed_line(feature))?;
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lincs_core::Interval;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[rstest]
    fn test_parse_bed12() {
        let line = "chr1\t999\t2300\tLINC01\t0\t+\t999\t2300\t0\t2\t401,301,\t0,1000,";
        let f = parse_bed_line(line, 1).unwrap();
        assert_eq!(f.chromosome(), 1);
        assert_eq!(f.strand, Strand::Plus);
        assert_eq!(f.exon_starts(), &[1000, 2000]);
        assert_eq!(f.exon_stops(), &[1400, 2300]);
        assert_eq!(f.envelope(), Interval::from((1000, 2300)));
    }

    #[rstest]
    #[case("chrX 99 200", 23, Strand::Unknown, "chrX:100-200")]
    #[case("chr6_random\t99\t200\tfoo", 6, Strand::Unknown, "foo")]
    #[case("chr2\t99\t200\tbar\t0\t-", 2, Strand::Minus, "bar")]
    fn test_parse_short_records(
        #[case] line: &str,
        #[case] chrom: u8,
        #[case] strand: Strand,
        #[case] name: &str,
    ) {
        let f = parse_bed_line(line, 1).unwrap();
        assert_eq!(f.chromosome(), chrom);
        assert_eq!(f.strand, strand);
        assert_eq!(f.name, name);
        assert_eq!(f.envelope(), Interval::from((100, 200)));
        assert_eq!(f.exon_count(), 1);
    }

    #[rstest]
    #[case("chr1\t10")]
    #[case("chr1\tten\t20")]
    #[case("chr1\t10\t20\tx\t0\t?")]
    #[case("chr1\t10\t20\tx\t0\t+\t10\t20\t0\t3\t5,5,\t0,5,")]
    fn test_parse_errors(#[case] line: &str) {
        assert!(matches!(
            parse_bed_line(line, 7),
            Err(LincsIoError::Parse { line: 7, .. })
        ));
    }

    #[rstest]
    fn test_parse_inverted_is_core_error() {
        assert!(matches!(
            parse_bed_line("chr1\t20\t10", 1),
            Err(LincsIoError::Core(_))
        ));
    }

    #[rstest]
    fn test_bed_line_partial_strand() {
        let mut f = Feature::new("m", Strand::Plus, 23, vec![2000, 1000], vec![2300, 1400]).unwrap();
        f.strand = Strand::PlusOrUnknown;
        assert_eq!(
            to_bed_line(&f),
            "chrX\t999\t2300\tm\t500\t.\t999\t2300\t255,0,0\t2\t301,401,\t1000,0,"
        );
    }

    #[rstest]
    #[case("merged.bed")]
    #[case("nested/merged.bed.gz")]
    fn test_write_then_read(#[case] file_name: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(file_name);

        let features = vec![
            Feature::new("a", Strand::Plus, 1, vec![1000, 2000], vec![1400, 2300]).unwrap(),
            Feature::new("b", Strand::Minus, 22, vec![5], vec![5]).unwrap(),
        ];
        features.write_bed(&path).unwrap();

        let back = read_bed(&path, "R").unwrap();
        assert_eq!(back.len(), 2);
        for (orig, read) in features.iter().zip(back.iter()) {
            assert_eq!(read.name, orig.name);
            assert_eq!(read.strand, orig.strand);
            assert_eq!(read.chromosome(), orig.chromosome());
            assert_eq!(read.exon_starts(), orig.exon_starts());
            assert_eq!(read.exon_stops(), orig.exon_stops());
            assert_eq!(read.provenance, "R");
        }
    }

    #[rstest]
    fn test_read_skips_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("with_header.bed");
        std::fs::write(
            &path,
            "track name=test\nbrowser position chr1\n# comment\n\nchr1\t0\t10\tx\n",
        )
        .unwrap();
        let features = read_bed(&path, "").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].envelope(), Interval::from((1, 10)));
    }
}
