//! Loading of precomputed per-cluster models.
//!
//! A GenePS result directory holds one `*.GenePS` file per group, next to the
//! per-cluster artifacts (`<cluster>.hmmGenePS`, `<cluster>.TN.hmmGenePS`,
//! `<cluster>.fa_GenePS`). A group file looks like:
//!
//! ```text
//! #group: Kinases
//! #group_size: 2
//! #single_copy_ortholog: yes
//! #name: cluster_1
//! #score: 310.5,12.25
//! #length: 280,340
//! MKKLLVAAGGSTRE...
//! #name: cluster_2
//! #score: 150
//! #length: 90,120
//! MSTNPKPQRK...
//! ```
//!
//! The score line is either `mean,std` (cutoff `mean - std_factor * std`) or
//! a flat cutoff.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{FASTA_SUFFIX, GROUP_FILE_EXTENSION, HMM_SUFFIX, TN_HMM_SUFFIX};
use crate::types::{GenePsError, LengthConfidence};

/// Paths of the artifacts trained for one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterArtifacts {
    pub hmm: PathBuf,
    pub true_negative_hmm: PathBuf,
    pub fasta: PathBuf,
}

impl ClusterArtifacts {
    fn in_directory(dir: &Path, cluster: &str) -> Self {
        Self {
            hmm: dir.join(format!("{cluster}{HMM_SUFFIX}")),
            true_negative_hmm: dir.join(format!("{cluster}{TN_HMM_SUFFIX}")),
            fasta: dir.join(format!("{cluster}{FASTA_SUFFIX}")),
        }
    }

    fn missing(&self) -> Vec<&Path> {
        [&self.hmm, &self.true_negative_hmm, &self.fasta]
            .into_iter()
            .filter(|path| !path.exists())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Reference model of one gene cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterModel {
    pub name: String,
    /// Minimal score a prediction needs to be accepted
    pub score_cutoff: f64,
    /// Expected protein length interval
    pub length_confidence: LengthConfidence,
    /// Representative protein of the cluster
    pub consensus_sequence: String,
    pub artifacts: ClusterArtifacts,
}

impl ClusterModel {
    #[must_use]
    pub fn consensus_length(&self) -> usize {
        self.consensus_sequence.len()
    }
}

/// A group of clusters loaded from one `*.GenePS` file.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupModel {
    pub name: String,
    /// Number of clusters the group declares
    pub group_size: usize,
    pub single_copy_ortholog: String,
    /// File the group was read from
    pub source: PathBuf,
    /// Clusters in file order
    pub clusters: Vec<ClusterModel>,
}

impl GroupModel {
    #[must_use]
    pub fn cluster(&self, name: &str) -> Option<&ClusterModel> {
        self.clusters.iter().find(|cluster| cluster.name == name)
    }
}

/// Every group found in a result directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCatalog {
    /// Groups in discovery order
    pub groups: Vec<GroupModel>,
    /// Sum of the declared group sizes
    pub cluster_scope: usize,
}

impl ModelCatalog {
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.groups.iter().map(|group| group.clusters.len()).sum()
    }
}

/// Source of cluster models.
pub trait ModelLoader {
    /// Loads every group below `result_dir`.
    ///
    /// # Errors
    ///
    /// Fails when no cluster is found, when per-cluster artifacts are
    /// missing or when a model file is malformed.
    fn load(&self, result_dir: &Path) -> Result<ModelCatalog, GenePsError>;
}

/// Reads `*.GenePS` group files as written by the model builder.
#[derive(Debug, Clone, Copy)]
pub struct GenePsFileLoader {
    /// Multiplier of the score standard deviation
    pub std_factor: f64,
}

impl GenePsFileLoader {
    #[must_use]
    pub const fn new(std_factor: f64) -> Self {
        Self { std_factor }
    }

    fn parse_group_file(
        &self,
        path: &Path,
        result_dir: &Path,
        errors: &mut Vec<String>,
    ) -> Result<GroupModel, GenePsError> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        let name = header_value(lines.next(), path, "group")?.to_string();
        let group_size = header_value(lines.next(), path, "group_size")?
            .parse::<usize>()
            .map_err(|e| parse_error(path, &format!("group size: {e}")))?;
        let single_copy_ortholog = header_value(lines.next(), path, "single_copy_ortholog")?.to_string();

        let mut clusters = Vec::new();
        while let Some(line) = lines.next() {
            let Some(cluster) = line.strip_prefix("#name:") else {
                continue;
            };
            let cluster = cluster.trim().to_string();
            let score_cutoff = self.parse_cutoff(header_value(lines.next(), path, "score")?, path)?;
            let length_confidence = parse_length(header_value(lines.next(), path, "length")?, path)?;
            let consensus_sequence = lines
                .next()
                .map(|l| l.split(':').next().unwrap_or_default().trim().to_string())
                .ok_or_else(|| parse_error(path, &format!("missing consensus of {cluster}")))?;

            let artifacts = ClusterArtifacts::in_directory(result_dir, &cluster);
            errors.extend(
                artifacts
                    .missing()
                    .into_iter()
                    .map(|missing| format!("[!]\t{} does not exist", missing.display())),
            );

            clusters.push(ClusterModel {
                name: cluster,
                score_cutoff,
                length_confidence,
                consensus_sequence,
                artifacts,
            });
        }

        Ok(GroupModel {
            name,
            group_size,
            single_copy_ortholog,
            source: path.to_path_buf(),
            clusters,
        })
    }

    fn parse_cutoff(&self, value: &str, path: &Path) -> Result<f64, GenePsError> {
        let numbers = parse_numbers(value, path)?;
        match numbers.as_slice() {
            [flat] => Ok(*flat),
            [mean, std, ..] => Ok(mean - self.std_factor * std),
            [] => Err(parse_error(path, "empty score line")),
        }
    }
}

impl Default for GenePsFileLoader {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_STD_FACTOR)
    }
}

impl ModelLoader for GenePsFileLoader {
    fn load(&self, result_dir: &Path) -> Result<ModelCatalog, GenePsError> {
        let mut files = Vec::new();
        collect_group_files(result_dir, &mut files)?;
        files.sort();

        let mut errors = Vec::new();
        let mut catalog = ModelCatalog::default();
        for file in &files {
            match self.parse_group_file(file, result_dir, &mut errors) {
                Ok(group) => {
                    catalog.cluster_scope += group.group_size;
                    catalog.groups.push(group);
                }
                Err(e) => errors.push(format!("[!]\t{e}")),
            }
        }

        let cluster_count = catalog.cluster_count();
        if cluster_count != catalog.cluster_scope {
            errors.push(format!(
                "\t[!] Supposed number of cluster ({}) != counted amount of cluster ({})",
                catalog.cluster_scope, cluster_count
            ));
        }
        if cluster_count == 0 {
            errors.push(
                "\t[!] No GenePS files found - please check your input directory in terms of path and file style"
                    .to_string(),
            );
        }

        if errors.is_empty() {
            Ok(catalog)
        } else {
            Err(GenePsError::InvalidModelData(errors))
        }
    }
}

fn collect_group_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), GenePsError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_group_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == GROUP_FILE_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

fn header_value<'a>(line: Option<&'a str>, path: &Path, key: &str) -> Result<&'a str, GenePsError> {
    line.and_then(|l| l.split_once(':'))
        .map(|(_, value)| value.trim())
        .ok_or_else(|| parse_error(path, &format!("missing '{key}' line")))
}

fn parse_numbers(value: &str, path: &Path) -> Result<Vec<f64>, GenePsError> {
    value
        .split(',')
        .filter(|field| !field.trim().is_empty())
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|e| parse_error(path, &format!("'{field}': {e}")))
        })
        .collect()
}

fn parse_length(value: &str, path: &Path) -> Result<LengthConfidence, GenePsError> {
    match parse_numbers(value, path)?.as_slice() {
        [min, max] => Ok(LengthConfidence::new(*min, *max)),
        _ => Err(parse_error(path, &format!("length interval '{value}'"))),
    }
}

fn parse_error(path: &Path, message: &str) -> GenePsError {
    GenePsError::ParseError(format!("{}: {message}", path.display()))
}
