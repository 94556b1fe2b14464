use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::{error, info, warn};

use lincs_classify::{
    CategorizedPoints, GenomeIntervals, categorize_points, classify_genome_with, collect_loci,
    envelopes_by_chromosome,
};
use lincs_core::{Feature, chromosome_name};
use lincs_io::{
    array_file_name, read_classification, read_points, write_categorized_values,
    write_classification,
};

use crate::config::{ClassifyConfig, DatasetFormat, PipelineConfig};
use crate::merge::handlers::load_features;

fn load(config: &PipelineConfig, path: &Path) -> Result<Vec<Feature>> {
    let path = config.resolve(path);
    load_features(&path, DatasetFormat::from_path(&path), "", None)
}

///
/// Paint the arrays of `chromosomes` and write each one to `output`.
/// Returns the names of the chromosomes that failed.
///
fn paint_arrays(
    config: &PipelineConfig,
    classify: &ClassifyConfig,
    chromosomes: &[u8],
    margin: i64,
    output: &Path,
) -> Result<Vec<String>> {
    let coding = load(config, &classify.coding)?;
    let noncoding = load(config, &classify.noncoding)?;
    let other = classify
        .other
        .iter()
        .map(|path| load(config, path))
        .collect::<Result<Vec<_>>>()?;
    let other_sets: Vec<&[Feature]> = other.iter().map(Vec::as_slice).collect();

    let sources = GenomeIntervals {
        coding: envelopes_by_chromosome(&coding),
        noncoding: envelopes_by_chromosome(&noncoding),
        other: collect_loci(&other_sets),
    };
    let sizes = config.chrom_sizes()?;

    let results = classify_genome_with(&sizes, chromosomes, &sources, margin, |chrom, array| {
        let path = output.join(array_file_name(chrom, margin));
        write_classification(&path, &array)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok::<_, anyhow::Error>(path)
    });

    let mut failed = Vec::new();
    for (chrom, result) in results {
        match result {
            Ok(path) => info!("Wrote {}", path.display()),
            Err(e) => {
                error!("Classifying {} failed: {:#}", chromosome_name(chrom), e);
                failed.push(chromosome_name(chrom));
            }
        }
    }
    Ok(failed)
}

/// `study_clean.txt.gz` -> `study_clean`
fn table_stem(path: &Path) -> String {
    let mut stem = PathBuf::from(path.file_name().unwrap_or_default());
    if stem.extension().is_some_and(|ext| ext == "gz") {
        stem.set_extension("");
    }
    stem.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "points".to_string())
}

///
/// Sort the points of one table by the category of their base, reading the
/// arrays written to `output`, and write the per-category value files.
///
fn categorize_table(
    table: &Path,
    chromosomes: &[u8],
    margin: i64,
    output: &Path,
) -> Result<CategorizedPoints<f64>> {
    let points =
        read_points(table).with_context(|| format!("Failed to read {}", table.display()))?;

    let mut by_chrom: BTreeMap<u8, Vec<(i64, f64)>> = BTreeMap::new();
    let mut skipped = 0;
    for p in points {
        if chromosomes.contains(&p.chromosome) {
            by_chrom
                .entry(p.chromosome)
                .or_default()
                .push((p.position, p.value));
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        warn!(
            "{}: skipped {} points on chromosomes that were not classified",
            table.display(),
            skipped
        );
    }

    let mut total = CategorizedPoints::default();
    for (chrom, points) in by_chrom {
        let path = output.join(array_file_name(chrom, margin));
        let array = read_classification(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let grouped = categorize_points(&array, points)
            .with_context(|| format!("Point outside {}", chromosome_name(chrom)))?;
        total.absorb(grouped);
    }

    let prefix = format!("{}_ext{}", table_stem(table), margin);
    write_categorized_values(output, &prefix, &total)
        .with_context(|| format!("Failed to write category files for {}", prefix))?;
    let counts: Vec<String> = total
        .counts()
        .iter()
        .map(|(c, n)| format!("{} {}", c.label(), n))
        .collect();
    info!(
        "{}: {} points ({})",
        table.display(),
        total.total(),
        counts.join(", ")
    );
    Ok(total)
}

pub fn run_classify(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .context("A path to a pipeline config is required.")?;
    let config = PipelineConfig::try_from(Path::new(config_path))
        .with_context(|| format!("Failed to load config {}", config_path))?;
    let classify = config.require_classify()?;
    let margin = matches
        .get_one::<i64>("margin")
        .copied()
        .unwrap_or(config.margin);
    let force = matches.get_flag("force");

    let chromosomes = classify.chromosomes();
    let output = config.output_dir();

    let (reused, missing): (Vec<u8>, Vec<u8>) = chromosomes
        .iter()
        .copied()
        .partition(|&c| !force && output.join(array_file_name(c, margin)).exists());
    if !reused.is_empty() {
        info!(
            "Reusing {} existing arrays in {}",
            reused.len(),
            output.display()
        );
    }

    if !missing.is_empty() {
        let failed = paint_arrays(&config, classify, &missing, margin, &output)?;
        if !failed.is_empty() {
            bail!("Classification failed on {}", failed.join(", "));
        }
    }

    for table in &classify.points {
        categorize_table(&config.resolve(table), &chromosomes, margin, &output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::cli::create_classify_cli;

    use lincs_classify::Category;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::{TempDir, tempdir};

    const CONFIG: &str = r#"
output = "out"
genome = "uniform"
uniform_size = 10

[classify]
coding = "coding.bed"
noncoding = "noncoding.bed"
other = ["other.bed"]
chromosomes = [1]
points = ["study_clean.txt"]
"#;

    #[fixture]
    fn workspace() -> TempDir {
        let dir = tempdir().unwrap();
        let write = |name: &str, text: &str| std::fs::write(dir.path().join(name), text).unwrap();
        write("pipeline.toml", CONFIG);
        write("coding.bed", "chr1\t0\t1\tm1\nchr1\t4\t5\tm2\n");
        write("noncoding.bed", "chr1\t1\t3\tl1\n");
        write("other.bed", "chr1\t8\t9\tn1\n");
        write(
            "study_clean.txt",
            "1\t1\t1\t0\t0\t11\t0.5\n1\t3\t3\t0\t0\t12\t0.25\n1\t7\t7\t0\t0\t13\t0.125\n2\t5\t5\t0\t0\t14\t0.1\n",
        );
        dir
    }

    fn run(dir: &TempDir, extra: &[&str]) -> Result<()> {
        let config = dir.path().join("pipeline.toml");
        let mut args = vec!["classify", "--config", config.to_str().unwrap()];
        args.extend_from_slice(extra);
        let matches = create_classify_cli().try_get_matches_from(args).unwrap();
        run_classify(&matches)
    }

    fn read(dir: &TempDir, name: &str) -> String {
        std::fs::read_to_string(dir.path().join("out").join(name)).unwrap()
    }

    #[rstest]
    fn test_paints_then_categorizes(workspace: TempDir) {
        run(&workspace, &[]).unwrap();

        let array = std::fs::read(workspace.path().join("out/chromosome1_ext0_array.bin")).unwrap();
        assert_eq!(array, b"mllimiiini");
        assert_eq!(read(&workspace, "study_clean_ext0_coding_only.txt"), "0.5\n");
        assert_eq!(read(&workspace, "study_clean_ext0_noncoding_only.txt"), "0.25\n");
        assert_eq!(read(&workspace, "study_clean_ext0_intergenic.txt"), "0.125\n");
        assert!(read(&workspace, "study_clean_ext0_counts.tsv").starts_with("total\t3\n"));
    }

    #[rstest]
    fn test_existing_array_is_reused_unless_forced(workspace: TempDir) {
        let out = workspace.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join(array_file_name(1, 0)), b"bbbbbbbbbb").unwrap();

        run(&workspace, &[]).unwrap();
        assert_eq!(read(&workspace, "study_clean_ext0_both.txt"), "0.5\n0.25\n0.125\n");

        run(&workspace, &["--force"]).unwrap();
        assert_eq!(read(&workspace, "study_clean_ext0_both.txt"), "");
        let array = read_classification(&out.join(array_file_name(1, 0))).unwrap();
        assert_eq!(array.get(1), Some(Category::CodingOnly));
    }

    #[rstest]
    fn test_margin_selects_its_own_array(workspace: TempDir) {
        run(&workspace, &["--margin", "1"]).unwrap();
        let array = std::fs::read(workspace.path().join("out/chromosome1_ext1_array.bin")).unwrap();
        // coding widened to [1,2] and [4,6], noncoding to [1,4]
        assert_eq!(array, b"bblbmmiini");
        assert_eq!(read(&workspace, "study_clean_ext1_both.txt"), "0.5\n");
        assert_eq!(read(&workspace, "study_clean_ext1_noncoding_only.txt"), "0.25\n");
    }

    #[rstest]
    #[case("study.txt.gz", "study")]
    #[case("dir/study_clean.txt", "study_clean")]
    #[case("noext", "noext")]
    fn test_table_stem(#[case] path: &str, #[case] stem: &str) {
        assert_eq!(table_stem(Path::new(path)), stem);
    }
}
