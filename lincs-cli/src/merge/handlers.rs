use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::{error, info};

use lincs_core::{Feature, chromosome_name, partition_by_chromosome};
use lincs_io::{BedWrite, read_bed, read_gtf, write_name_table};
use lincs_merge::{
    MergeReport, drop_sex_chromosomes, exclude_near, genome_coverage, merge_all,
    retain_min_length,
};

use crate::config::{DatasetFormat, PipelineConfig};
use crate::consts::{MERGED_BED, MERGED_NAMES};

///
/// Read an annotation file in the given format, tagging every feature.
///
pub fn load_features(
    path: &Path,
    format: DatasetFormat,
    tag: &str,
    gene_type: Option<&str>,
) -> Result<Vec<Feature>> {
    let features = match format {
        DatasetFormat::Gtf => read_gtf(path, tag, gene_type),
        DatasetFormat::Bed => read_bed(path, tag),
    }
    .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(features)
}

fn load_reference(config: &PipelineConfig, path: Option<&Path>) -> Result<Vec<Feature>> {
    match path {
        Some(path) => {
            let path = config.resolve(path);
            load_features(&path, DatasetFormat::from_path(&path), "", None)
        }
        None => Ok(Vec::new()),
    }
}

///
/// Run the exclusion filter chromosome by chromosome. Reference features are
/// bucketed once, so each chromosome only scans its own references.
///
fn apply_exclusion(
    by_chrom: &mut BTreeMap<u8, Vec<Feature>>,
    coding: Vec<Feature>,
    blacklist: Vec<Feature>,
    distance: i64,
) -> Result<usize> {
    let coding = partition_by_chromosome(coding);
    let blacklist = partition_by_chromosome(blacklist);
    let mut excluded = 0;
    for (chrom, features) in by_chrom.iter_mut() {
        let coding = coding.get(chrom).map(Vec::as_slice).unwrap_or_default();
        let blacklist = blacklist.get(chrom).map(Vec::as_slice).unwrap_or_default();
        excluded += exclude_near(features, coding, blacklist, distance)?.total();
    }
    Ok(excluded)
}

pub fn run_merge(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .context("A path to a pipeline config is required.")?;
    let config = PipelineConfig::try_from(Path::new(config_path))
        .with_context(|| format!("Failed to load config {}", config_path))?;

    let mut features = Vec::new();
    for dataset in config.require_datasets()? {
        let path = config.resolve(&dataset.path);
        let loaded = load_features(
            &path,
            dataset.format,
            &dataset.tag,
            dataset.gene_type.as_deref(),
        )?;
        info!("Dataset {}: {} features", dataset.tag, loaded.len());
        features.extend(loaded);
    }
    info!("Loaded {} features in total", features.len());

    let mut by_chrom = partition_by_chromosome(features);
    if config.autosomes_only {
        let dropped = drop_sex_chromosomes(&mut by_chrom);
        info!("Dropped {} features on X/Y", dropped);
    }

    let (coding, blacklist) = match &config.exclusion {
        Some(exclusion) => (
            load_reference(&config, exclusion.coding.as_deref())?,
            load_reference(&config, exclusion.blacklist.as_deref())?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    let mut too_short = 0;
    for features in by_chrom.values_mut() {
        too_short += retain_min_length(features, config.min_length);
    }
    let excluded = match config.exclusion {
        Some(_) => apply_exclusion(&mut by_chrom, coding, blacklist, config.exclusion_distance)?,
        None => 0,
    };
    info!(
        "Removed {} features shorter than {} bases and {} near reference features",
        too_short, config.min_length, excluded
    );

    let mut report = MergeReport::default();
    let mut merged: BTreeMap<u8, Vec<Feature>> = BTreeMap::new();
    let mut failed = Vec::new();
    for (chrom, result) in merge_all(by_chrom) {
        match result {
            Ok(chromosome) => {
                report.absorb(chromosome.report);
                merged.insert(chrom, chromosome.features);
            }
            Err(e) => {
                error!("Merging {} failed: {}", chromosome_name(chrom), e);
                failed.push(chromosome_name(chrom));
            }
        }
    }
    info!(
        "Envelope overlaps checked: {}; exon-overlap merges: {}; envelope-only overlaps: {}; disjoint pairs: {}",
        report.envelope_overlaps, report.exon_merges, report.envelope_only, report.disjoint
    );

    let all: Vec<Feature> = merged.values().flatten().cloned().collect();
    info!("{} merged features", all.len());

    let output = config.output_dir();
    let bed_path = output.join(MERGED_BED);
    all.write_bed(&bed_path)
        .with_context(|| format!("Failed to write {}", bed_path.display()))?;
    let names_path = output.join(MERGED_NAMES);
    write_name_table(&names_path, &all)
        .with_context(|| format!("Failed to write {}", names_path.display()))?;
    info!("Genome coverage: {} bases", genome_coverage(&merged));

    if !failed.is_empty() {
        bail!("Merging failed on {}", failed.join(", "));
    }
    Ok(())
}
