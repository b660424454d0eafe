use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tempfile::NamedTempFile;

use super::{collaborator_error, Aligner};
use crate::model::ClusterModel;
use crate::types::{AlignmentResult, Coordinate, GenePsError, Region};

const TOOL: &str = "exonerate";

const RYO_START: &str = "##geneps";
const RYO_END: &str = "##end";
const GFF_START: &str = "# --- START OF GFF DUMP ---";
const GFF_END: &str = "# --- END OF GFF DUMP ---";

/// Output template: target alignment span, then the coding sequence.
const RYO_FORMAT: &str = "##geneps\t%tab\t%tae\n%tcs\n##end\n";

/// Standard genetic code, codons ordered TCAG.
const CODON_TABLE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Runs `exonerate --model protein2genome` for every region.
///
/// Region and consensus are written to private scratch files, so
/// concurrent genome runs never share inputs.
#[derive(Debug, Clone)]
pub struct ExonerateAligner {
    program: PathBuf,
}

impl ExonerateAligner {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self { program: program.into() }
    }
}

impl Default for ExonerateAligner {
    fn default() -> Self {
        Self::new(TOOL)
    }
}

impl Aligner for ExonerateAligner {
    fn align(
        &self,
        region: &Region,
        region_sequence: &[u8],
        model: &ClusterModel,
    ) -> Result<Option<AlignmentResult>, GenePsError> {
        let mut target = NamedTempFile::new()?;
        writeln!(target, ">{}_{}_{}", region.contig, region.start, region.end)?;
        target.write_all(region_sequence)?;
        writeln!(target)?;
        target.flush()?;

        let mut query = NamedTempFile::new()?;
        writeln!(query, ">{}\n{}", model.name, model.consensus_sequence)?;
        query.flush()?;

        let output = Command::new(&self.program)
            .args(["--model", "protein2genome", "--bestn", "1"])
            .args(["--showvulgar", "no", "--showalignment", "no", "--showtargetgff", "yes"])
            .arg("--ryo")
            .arg(RYO_FORMAT)
            .arg("--query")
            .arg(query.path())
            .arg("--target")
            .arg(target.path())
            .output()
            .map_err(|e| collaborator_error(TOOL, format!("{}: {e}", self.program.display())))?;

        if !output.status.success() {
            return Err(collaborator_error(
                TOOL,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        parse_exonerate_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extracts the first prediction from exonerate output.
///
/// Returns `None` when the output holds no prediction block.
///
/// # Errors
///
/// Returns [`GenePsError::ParseError`] for a malformed prediction block.
pub fn parse_exonerate_output(output: &str) -> Result<Option<AlignmentResult>, GenePsError> {
    let mut lines = output.lines();
    let mut local_coordinates = None;
    let mut dna = String::new();
    let mut annotation = Vec::new();

    while let Some(line) = lines.next() {
        if let Some(span) = line.strip_prefix(RYO_START) {
            if local_coordinates.is_some() {
                continue;
            }
            local_coordinates = Some(parse_span(span)?);
            for sequence_line in lines.by_ref() {
                if sequence_line.starts_with(RYO_END) {
                    break;
                }
                dna.push_str(sequence_line.trim());
            }
        } else if line.starts_with(GFF_START) && annotation.is_empty() {
            annotation = lines
                .by_ref()
                .take_while(|l| !l.starts_with(GFF_END))
                .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    Ok(local_coordinates.map(|local_coordinates| AlignmentResult {
        protein: translate(&dna),
        dna,
        annotation,
        local_coordinates,
        report: output.to_string(),
    }))
}

fn parse_span(span: &str) -> Result<(Coordinate, Coordinate), GenePsError> {
    let values: Vec<&str> = span.split_whitespace().collect();
    let [begin, end] = values.as_slice() else {
        return Err(GenePsError::ParseError(format!("exonerate span '{span}'")));
    };
    let parse = |value: &str| {
        value
            .parse::<Coordinate>()
            .map_err(|e| GenePsError::ParseError(format!("exonerate coordinate '{value}': {e}")))
    };
    Ok((parse(begin)?, parse(end)?))
}

/// Translates a coding sequence with the standard genetic code.
///
/// A trailing stop codon is dropped; codons with ambiguous bases become `X`.
#[must_use]
pub fn translate(dna: &str) -> String {
    let mut protein: String = dna
        .as_bytes()
        .chunks_exact(3)
        .map(translate_codon)
        .collect();
    if protein.ends_with('*') {
        protein.pop();
    }
    protein
}

fn translate_codon(codon: &[u8]) -> char {
    let mut index = 0;
    for base in codon {
        let value = match base.to_ascii_uppercase() {
            b'T' | b'U' => 0,
            b'C' => 1,
            b'A' => 2,
            b'G' => 3,
            _ => return 'X',
        };
        index = index * 4 + value;
    }
    char::from(CODON_TABLE[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "Command line: [exonerate --model protein2genome]\n\
                          Hostname: [localhost]\n\
                          # --- START OF GFF DUMP ---\n\
                          #\n\
                          ctg1_100_500\texonerate:protein2genome:local\tgene\t11\t28\t90\t+\t.\tgene_id 1\n\
                          ctg1_100_500\texonerate:protein2genome:local\tcds\t11\t28\t.\t+\t.\t\n\
                          # --- END OF GFF DUMP ---\n\
                          #\n\
                          ##geneps\t10\t28\n\
                          ATGGCTAAA\n\
                          TGGTAA\n\
                          ##end\n\
                          -- completed exonerate analysis\n";

    #[test]
    fn test_parse_exonerate_output() {
        let result = parse_exonerate_output(OUTPUT).unwrap().unwrap();
        assert_eq!(result.local_coordinates, (10, 28));
        assert_eq!(result.dna, "ATGGCTAAATGGTAA");
        assert_eq!(result.protein, "MAKW");
        assert_eq!(result.annotation.len(), 2);
        assert!(result.annotation[0].contains("\tgene\t"));
        assert_eq!(result.report, OUTPUT);
    }

    #[test]
    fn test_parse_reverse_span() {
        let output = "##geneps\t22\t16\nATGAAA\n##end\n";
        let result = parse_exonerate_output(output).unwrap().unwrap();
        assert_eq!(result.local_coordinates, (22, 16));
        assert_eq!(result.protein, "MK");

        let region = Region {
            contig: "ctg1".to_string(),
            cluster: "c1".to_string(),
            strand: "-".to_string(),
            start: 1,
            end: 26,
            chunk_coverage: 80.0,
            query_coverage: 80.0,
            query_length: 2,
        };
        let placement =
            crate::prediction::GenePlacement::from_local(&region, result.local_coordinates).unwrap();
        assert_eq!((placement.start, placement.end, placement.length), (10, 4, 6));
    }

    #[test]
    fn test_parse_output_without_prediction() {
        let output = "Command line: [exonerate]\n-- completed exonerate analysis\n";
        assert!(parse_exonerate_output(output).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_span() {
        let output = "##geneps\tten\t28\nATG\n##end\n";
        assert!(parse_exonerate_output(output).is_err());
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate("ATGTTTGGGTGA"), "MFG");
        assert_eq!(translate("atgtaaatg"), "M*M");
        assert_eq!(translate("ATGNNNCC"), "MX");
        assert_eq!(translate(""), "");
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let aligner = ExonerateAligner::new("/nonexistent/exonerate");
        let region = Region {
            contig: "ctg1".to_string(),
            cluster: "c1".to_string(),
            strand: "+".to_string(),
            start: 1,
            end: 10,
            chunk_coverage: 80.0,
            query_coverage: 80.0,
            query_length: 10,
        };
        let model = ClusterModel {
            name: "c1".to_string(),
            score_cutoff: 0.0,
            length_confidence: crate::types::LengthConfidence::new(1.0, 10.0),
            consensus_sequence: "MK".to_string(),
            artifacts: crate::model::ClusterArtifacts {
                hmm: PathBuf::new(),
                true_negative_hmm: PathBuf::new(),
                fasta: PathBuf::new(),
            },
        };
        let err = aligner.align(&region, b"ACGT", &model).unwrap_err();
        assert!(matches!(err, GenePsError::CollaboratorFailure { .. }));
    }
}
