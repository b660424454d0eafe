//! Output files of a genome run.
//!
//! Every genome writes into its own directory below `Predictions/`:
//!
//! ```text
//! Predictions/
//! ├── LOG.txt
//! └── <genome>/
//!     ├── summary.txt
//!     └── <genome>_<group>/
//!         ├── <genome>_<group>_VALID_protein.fa
//!         ├── <genome>_<group>_VALID_dna.fa
//!         ├── <genome>_<group>_VALID.gff
//!         ├── <genome>_<group>_FILTERED_protein.fa
//!         ├── <genome>_<group>_FILTERED_dna.fa
//!         └── <genome>_<group>_FILTERED.gff
//! ```
//!
//! With `--keep` each group folder also holds the merged regions and the
//! concatenated aligner output.
//!
//! A single genome given without a genome list writes directly into
//! `Predictions/`, and its group folders carry the bare group name.
//!
//! The writers take any [`Write`] implementation:
//!
//! ```rust
//! use geneps_core::output::write_summary;
//! use geneps_core::model::ModelCatalog;
//! use geneps_core::results::GenomeRunResult;
//! use std::io::stdout;
//!
//! let catalog = ModelCatalog::default();
//! let result = GenomeRunResult::new("single_genome");
//! write_summary(&mut stdout(), &result, &catalog)?;
//! # Ok::<(), geneps_core::types::GenePsError>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::constants::SINGLE_GENOME_PREFIX;
use crate::model::ModelCatalog;
use crate::results::{GenomeRunResult, PredictionTable};
use crate::types::GenePsError;

mod formats {
    pub mod fasta;
    pub mod gff;
    pub mod regions;
    pub mod summary;
}

pub use formats::{
    fasta::{fasta_header, write_dna_records, write_protein_records},
    gff::write_gff_records,
    regions::write_merged_regions,
    summary::write_summary,
};

pub const SUMMARY_FILE: &str = "summary.txt";
pub const LOG_FILE: &str = "LOG.txt";
pub const PREDICTION_DIR: &str = "Predictions";

/// Which of the two prediction tables a file set holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    Valid,
    Filtered,
}

impl PredictionKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Filtered => "FILTERED",
        }
    }
}

/// Output directory of a genome below `prediction_dir`.
#[must_use]
pub fn genome_directory(prediction_dir: &Path, genome: &str) -> PathBuf {
    if genome == SINGLE_GENOME_PREFIX {
        prediction_dir.to_path_buf()
    } else {
        prediction_dir.join(genome)
    }
}

/// File and folder prefix of a group's outputs.
#[must_use]
pub fn group_prefix(genome: &str, group: &str) -> String {
    if genome == SINGLE_GENOME_PREFIX {
        group.to_string()
    } else {
        format!("{genome}_{group}")
    }
}

/// Creates `path`, reusing it with a warning if it already exists.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn prepare_directory(path: &Path) -> Result<(), GenePsError> {
    if path.is_dir() {
        warn!("{} already exists - files may be overwritten", path.display());
        return Ok(());
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Writes the protein, DNA and GFF files of one group and one kind.
///
/// Returns the number of predictions written.
///
/// # Errors
///
/// Returns an I/O error if a file cannot be written.
pub fn write_prediction_files(
    group_dir: &Path,
    prefix: &str,
    genome: &str,
    group: &str,
    table: &PredictionTable,
    kind: PredictionKind,
) -> Result<usize, GenePsError> {
    let label = kind.label();
    let predictions = || table.group(group).flat_map(|(_, candidates)| candidates);

    let mut proteins = create(&group_dir.join(format!("{prefix}_{label}_protein.fa")))?;
    let written = write_protein_records(&mut proteins, genome, predictions())?;
    proteins.flush()?;

    let mut dna = create(&group_dir.join(format!("{prefix}_{label}_dna.fa")))?;
    write_dna_records(&mut dna, genome, predictions())?;
    dna.flush()?;

    let mut gff = create(&group_dir.join(format!("{prefix}_{label}.gff")))?;
    write_gff_records(&mut gff, predictions())?;
    gff.flush()?;

    Ok(written)
}

/// Writes every output file of a genome run and returns the number of
/// valid predictions written.
///
/// Groups without regions get no folder. With `keep_intermediate` the
/// merged regions and the raw aligner output of each group are written
/// next to its predictions.
///
/// # Errors
///
/// Returns an I/O error if a directory or file cannot be written.
pub fn write_genome_outputs(
    prediction_dir: &Path,
    result: &GenomeRunResult,
    catalog: &ModelCatalog,
    keep_intermediate: bool,
) -> Result<usize, GenePsError> {
    let genome_dir = genome_directory(prediction_dir, &result.genome);
    fs::create_dir_all(&genome_dir)?;

    let mut written_valid = 0;
    for (group, regions) in &result.merged_regions {
        let prefix = group_prefix(&result.genome, group);
        let group_dir = genome_dir.join(&prefix);
        prepare_directory(&group_dir)?;

        written_valid += write_prediction_files(
            &group_dir,
            &prefix,
            &result.genome,
            group,
            &result.valid,
            PredictionKind::Valid,
        )?;
        write_prediction_files(
            &group_dir,
            &prefix,
            &result.genome,
            group,
            &result.filtered,
            PredictionKind::Filtered,
        )?;

        if keep_intermediate {
            let path = group_dir.join(format!("{prefix}_intermediate_merged_blast_regions.txt"));
            let mut writer = create(&path)?;
            write_merged_regions(&mut writer, regions)?;
            writer.flush()?;

            let path = group_dir.join(format!("{prefix}_intermediate_exonerate.txt"));
            let mut writer = create(&path)?;
            if let Some(report) = result.aligner_reports.get(group) {
                writer.write_all(report.as_bytes())?;
            }
            writer.flush()?;
        }
    }

    let mut summary = create(&genome_dir.join(SUMMARY_FILE))?;
    write_summary(&mut summary, result, catalog)?;
    summary.flush()?;

    Ok(written_valid)
}

fn create(path: &Path) -> Result<BufWriter<File>, GenePsError> {
    Ok(BufWriter::new(File::create(path)?))
}
