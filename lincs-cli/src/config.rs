use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lincs_core::{ChromSizes, LincsError, MAX_MARGIN};

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Gtf,
    Bed,
}

impl DatasetFormat {
    ///
    /// Guess the format of an annotation file from its extension,
    /// looking through a trailing `.gz`. Anything not GTF is read as BED.
    ///
    pub fn from_path(path: &Path) -> Self {
        let mut ext = path.extension().and_then(OsStr::to_str);
        if ext == Some("gz") {
            ext = path
                .file_stem()
                .and_then(|stem| Path::new(stem).extension())
                .and_then(OsStr::to_str);
        }
        match ext {
            Some("gtf") | Some("gff") => DatasetFormat::Gtf,
            _ => DatasetFormat::Bed,
        }
    }
}

/// One annotation source to merge.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct DatasetConfig {
    /// Provenance tag, e.g. `"B"`.
    pub tag: String,
    pub path: PathBuf,
    pub format: DatasetFormat,
    pub gene_type: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct ExclusionConfig {
    pub coding: Option<PathBuf>,
    pub blacklist: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ClassifyConfig {
    pub coding: PathBuf,
    pub noncoding: PathBuf,
    #[serde(default)]
    pub other: Vec<PathBuf>,
    pub chromosomes: Option<Vec<u8>>,
    /// Point tables (chromosome, position, id, value) sorted by category.
    #[serde(default)]
    pub points: Vec<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenomeBuild {
    #[default]
    Hg19,
    Uniform,
}

fn default_min_length() -> i64 {
    200
}

fn default_autosomes_only() -> bool {
    true
}

fn default_exclusion_distance() -> i64 {
    1000
}

fn default_uniform_size() -> i64 {
    300
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct PipelineConfig {
    pub output: PathBuf,
    #[serde(default)]
    pub margin: i64,
    #[serde(default = "default_min_length")]
    pub min_length: i64,
    #[serde(default = "default_autosomes_only")]
    pub autosomes_only: bool,
    #[serde(default = "default_exclusion_distance")]
    pub exclusion_distance: i64,
    #[serde(default)]
    pub genome: GenomeBuild,
    #[serde(default = "default_uniform_size")]
    pub uniform_size: i64,
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
    pub exclusion: Option<ExclusionConfig>,
    pub classify: Option<ClassifyConfig>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Error, Debug)]
pub enum PipelineConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("No [[datasets]] given in the pipeline config")]
    MissingDataset,
    #[error("Missing [{0}] section in the pipeline config")]
    MissingSection(&'static str),
    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub type PipelineConfigResult<T> = std::result::Result<T, PipelineConfigError>;

impl PipelineConfig {
    fn validate(&self) -> PipelineConfigResult<()> {
        if !(0..=MAX_MARGIN).contains(&self.margin) {
            return Err(PipelineConfigError::InvalidValue {
                key: "margin",
                reason: format!("must be between 0 and {}, got {}", MAX_MARGIN, self.margin),
            });
        }
        if !(0..=2 * MAX_MARGIN).contains(&self.exclusion_distance) {
            return Err(PipelineConfigError::InvalidValue {
                key: "exclusion_distance",
                reason: format!(
                    "must be between 0 and {}, got {}",
                    2 * MAX_MARGIN,
                    self.exclusion_distance
                ),
            });
        }
        if self.min_length < 0 {
            return Err(PipelineConfigError::InvalidValue {
                key: "min_length",
                reason: format!("must not be negative, got {}", self.min_length),
            });
        }
        Ok(())
    }

    /// Resolve `path` against the directory holding the config file.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output)
    }

    pub fn require_datasets(&self) -> PipelineConfigResult<&[DatasetConfig]> {
        if self.datasets.is_empty() {
            return Err(PipelineConfigError::MissingDataset);
        }
        Ok(&self.datasets)
    }

    pub fn require_classify(&self) -> PipelineConfigResult<&ClassifyConfig> {
        self.classify
            .as_ref()
            .ok_or(PipelineConfigError::MissingSection("classify"))
    }

    pub fn chrom_sizes(&self) -> Result<ChromSizes, LincsError> {
        match self.genome {
            GenomeBuild::Hg19 => Ok(ChromSizes::hg19()),
            GenomeBuild::Uniform => ChromSizes::uniform(self.uniform_size, 1..=24),
        }
    }
}

impl ClassifyConfig {
    /// Chromosomes to paint; autosomes 1-22 unless listed.
    pub fn chromosomes(&self) -> Vec<u8> {
        self.chromosomes
            .clone()
            .unwrap_or_else(|| (1..=22).collect())
    }
}

impl TryFrom<&Path> for PipelineConfig {
    type Error = PipelineConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let mut config: PipelineConfig = toml::from_str(&toml_str)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}
