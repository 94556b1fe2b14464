//! Point tables (GWAS/ANNOVAR style) and the per-category value files
//! written after classifying them.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use lincs_classify::CategorizedPoints;
use lincs_core::parse_chromosome;

use crate::error::{LincsIoError, Result};
use crate::utils::{get_dynamic_reader, get_dynamic_writer};

/// One annotated position, e.g. a SNP and its p-value.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub chromosome: u8,
    /// 1-based position.
    pub position: i64,
    pub id: String,
    pub value: f64,
}

///
/// Parse one tab-separated point record:
/// `CHR  POS  POS  REF  ALT  ID  VALUE`.
///
/// The chromosome may carry a `chr` prefix.
///
pub fn parse_point_line(line: &str, line_no: usize) -> Result<Point> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < 7 {
        return Err(LincsIoError::Parse {
            line: line_no,
            reason: format!("expected 7 tab-separated columns, found {}", fields.len()),
        });
    }
    let position = fields[1].parse::<i64>().map_err(|_| LincsIoError::Parse {
        line: line_no,
        reason: format!("invalid position: {:?}", fields[1]),
    })?;
    let value = fields[6].parse::<f64>().map_err(|_| LincsIoError::Parse {
        line: line_no,
        reason: format!("invalid value: {:?}", fields[6]),
    })?;

    Ok(Point {
        chromosome: parse_chromosome(fields[0]),
        position,
        id: fields[5].to_string(),
        value,
    })
}

///
/// Read a point table (optionally gzip'd). Empty and `#` lines are skipped.
///
pub fn read_points(path: &Path) -> Result<Vec<Point>> {
    let reader = get_dynamic_reader(path)?;
    let mut points = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        points.push(parse_point_line(&line, idx + 1)?);
    }
    log::info!("Read {} points from {}", points.len(), path.display());
    Ok(points)
}

///
/// Write one `<prefix>_<category>.txt` file per category holding the values
/// of its points, one per line, plus `<prefix>_counts.tsv` with the total
/// and per-category counts.
///
/// Returns the paths written, counts file last.
///
pub fn write_categorized_values(
    dir: &Path,
    prefix: &str,
    points: &CategorizedPoints<f64>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (category, values) in points.iter() {
        let path = dir.join(format!("{}_{}.txt", prefix, category.label()));
        let mut writer = get_dynamic_writer(&path)?;
        for value in values {
            writeln!(writer, "{}", value)?;
        }
        writer.finish()?;
        written.push(path);
    }

    let counts_path = dir.join(format!("{}_counts.tsv", prefix));
    let mut writer = get_dynamic_writer(&counts_path)?;
    writeln!(writer, "total\t{}", points.total())?;
    for (category, count) in points.counts() {
        writeln!(writer, "{}\t{}", category.label(), count)?;
    }
    writer.finish()?;
    written.push(counts_path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lincs_classify::{Category, ClassificationArray, categorize_points};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[rstest]
    #[case("1\t1234\t1234\t0\t0\t56789\t0.0031", 1, 1234, "56789", 0.0031)]
    #[case("chrX\t10\t10\tA\tG\trs1\t1e-8", 23, 10, "rs1", 1e-8)]
    fn test_parse_point_line(
        #[case] line: &str,
        #[case] chrom: u8,
        #[case] position: i64,
        #[case] id: &str,
        #[case] value: f64,
    ) {
        let p = parse_point_line(line, 1).unwrap();
        assert_eq!(
            p,
            Point {
                chromosome: chrom,
                position,
                id: id.to_string(),
                value
            }
        );
    }

    #[rstest]
    #[case("1\t10\t10\t0\t0\trs1")]
    #[case("1\tten\t10\t0\t0\trs1\t0.5")]
    #[case("1\t10\t10\t0\t0\trs1\tsmall")]
    fn test_parse_point_errors(#[case] line: &str) {
        assert!(matches!(
            parse_point_line(line, 4),
            Err(LincsIoError::Parse { line: 4, .. })
        ));
    }

    #[rstest]
    fn test_read_then_write_categories() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("study_clean.txt");
        std::fs::write(
            &table,
            "# chr pos pos ref alt id p\n1\t1\t1\t0\t0\t11\t0.5\n1\t2\t2\t0\t0\t12\t0.01\n\n1\t9\t9\t0\t0\t13\t0.7\n",
        )
        .unwrap();
        let points = read_points(&table).unwrap();
        assert_eq!(points.len(), 3);

        let array = ClassificationArray::from_bytes(b"mllimiiini").unwrap();
        let grouped =
            categorize_points(&array, points.iter().map(|p| (p.position, p.value))).unwrap();

        let out = dir.path().join("out");
        let written = write_categorized_values(&out, "study_ext0", &grouped).unwrap();
        assert_eq!(written.len(), 6);

        let coding = std::fs::read_to_string(out.join("study_ext0_coding_only.txt")).unwrap();
        assert_eq!(coding, "0.5\n");
        let both = std::fs::read_to_string(out.join("study_ext0_both.txt")).unwrap();
        assert_eq!(both, "");
        let counts = std::fs::read_to_string(out.join("study_ext0_counts.tsv")).unwrap();
        assert_eq!(
            counts,
            "total\t3\nboth\t0\nintergenic\t0\nnoncoding_only\t1\ncoding_only\t1\nnon_intergenic\t1\n"
        );
        assert_eq!(grouped.count(Category::NonIntergenicOther), 1);
    }
}
