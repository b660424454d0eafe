use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

use super::{collaborator_error, LabelledProtein, Scorer};
use crate::model::ClusterModel;
use crate::types::GenePsError;

const TOOL: &str = "hmmsearch";

/// Scores proteins with `hmmsearch` against the cluster's profile model.
#[derive(Debug, Clone)]
pub struct HmmsearchScorer {
    program: PathBuf,
}

impl HmmsearchScorer {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self { program: program.into() }
    }
}

impl Default for HmmsearchScorer {
    fn default() -> Self {
        Self::new(TOOL)
    }
}

impl Scorer for HmmsearchScorer {
    fn score(
        &self,
        proteins: &[LabelledProtein],
        model: &ClusterModel,
    ) -> Result<Option<HashMap<String, f64>>, GenePsError> {
        if proteins.is_empty() {
            return Ok(None);
        }

        let mut fasta = NamedTempFile::new()?;
        for protein in proteins {
            writeln!(fasta, ">{}\n{}", protein.label, protein.sequence)?;
        }
        fasta.flush()?;
        let table = NamedTempFile::new()?;

        let output = Command::new(&self.program)
            .arg("--noali")
            .arg("--tblout")
            .arg(table.path())
            .arg(&model.artifacts.hmm)
            .arg(fasta.path())
            .stdout(Stdio::null())
            .output()
            .map_err(|e| collaborator_error(TOOL, format!("{}: {e}", self.program.display())))?;

        if !output.status.success() {
            return Err(collaborator_error(
                TOOL,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let scores = parse_tblout(&fs::read_to_string(table.path())?)?;
        Ok((!scores.is_empty()).then_some(scores))
    }
}

/// Best full-sequence score per target in a `--tblout` table.
///
/// # Errors
///
/// Returns [`GenePsError::ParseError`] for rows with a non-numeric score.
pub fn parse_tblout(table: &str) -> Result<HashMap<String, f64>, GenePsError> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    for line in table.lines().filter(|l| !l.starts_with('#') && !l.trim().is_empty()) {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 6 {
            return Err(GenePsError::ParseError(format!("hmmsearch row '{line}'")));
        }
        let score: f64 = columns[5]
            .parse()
            .map_err(|e| GenePsError::ParseError(format!("hmmsearch score '{}': {e}", columns[5])))?;
        scores
            .entry(columns[0].to_string())
            .and_modify(|best| *best = best.max(score))
            .or_insert(score);
    }
    Ok(scores)
}
