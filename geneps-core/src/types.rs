use std::fmt;

use bio::bio_types::strand::Strand;
use thiserror::Error;

/// Genomic coordinate as reported by the region and alignment tools.
///
/// Signed, because minus-strand placement subtracts local offsets from a
/// region bound.
pub type Coordinate = i64;

/// Candidate genomic span reported by the region-discovery tool.
///
/// `start` and `end` are an unordered pair: depending on the strand
/// convention of the upstream tool `start` may exceed `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Contig (sequence identifier) of the target genome
    pub contig: String,
    /// Cluster whose consensus sequence produced the hit
    pub cluster: String,
    /// Strand symbol as reported upstream (`+` or `-`)
    pub strand: String,
    /// First subject coordinate
    pub start: Coordinate,
    /// Second subject coordinate
    pub end: Coordinate,
    /// Merged alignment length relative to the reference (%)
    pub chunk_coverage: f64,
    /// Share of the reference covered by the merged alignment (%)
    pub query_coverage: f64,
    /// Length of the reference (query) sequence
    pub query_length: usize,
}

impl Region {
    /// Region bounds ordered as `(lower, upper)`.
    #[must_use]
    pub fn bounds(&self) -> (Coordinate, Coordinate) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// Inclusive protein length interval expected for a cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthConfidence {
    /// Shortest expected protein length
    pub min: f64,
    /// Longest expected protein length
    pub max: f64,
}

impl LengthConfidence {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether a protein of `length` residues lies inside the interval.
    #[must_use]
    pub fn contains(&self, length: usize) -> bool {
        let length = length as f64;
        self.min <= length && length <= self.max
    }
}

/// Raw prediction returned by the alignment tool for one region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentResult {
    /// Predicted protein sequence
    pub protein: String,
    /// Predicted coding DNA sequence
    pub dna: String,
    /// Annotation (GFF) lines describing the gene model
    pub annotation: Vec<String>,
    /// Exon span relative to the excised region sequence
    pub local_coordinates: (Coordinate, Coordinate),
    /// Unprocessed aligner output
    pub report: String,
}

/// Final fate of a region or prediction.
///
/// Every record carries exactly one label. Only overlap resolution may
/// change a label after construction, and only from `Valid` to
/// `OverlapLoser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    /// Passed the score cutoff, has the expected length and owns its locus
    Valid,
    /// Passed the score cutoff but the protein length is outside the interval
    Fragmented,
    /// Scored below the cluster cutoff
    ScoreFiltered,
    /// Rejected by the coverage pre-filter
    CoverageFiltered,
    /// The aligner produced no prediction
    NoAlignment,
    /// Lost the overlap election against a better candidate
    OverlapLoser,
}

impl Classification {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Valid => "valid",
            Self::Fragmented => "fragmented",
            Self::ScoreFiltered => "score_filtered",
            Self::CoverageFiltered => "coverage_filtered",
            Self::NoAlignment => "no_alignment",
            Self::OverlapLoser => "overlap_loser",
        };
        f.write_str(label)
    }
}

/// Region rejected before a prediction could be built.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRegion {
    pub group: String,
    pub region: Region,
    /// Either [`Classification::CoverageFiltered`] or [`Classification::NoAlignment`]
    pub classification: Classification,
}

/// Parses an upstream strand symbol.
///
/// # Errors
///
/// Returns [`GenePsError::InvalidStrand`] for anything but `+` and `-`.
pub fn parse_strand(symbol: &str) -> Result<Strand, GenePsError> {
    match symbol.trim() {
        "+" => Ok(Strand::Forward),
        "-" => Ok(Strand::Reverse),
        other => Err(GenePsError::InvalidStrand(other.to_string())),
    }
}

/// Strand symbol used in headers, reports and logs.
#[must_use]
pub const fn strand_symbol(strand: Strand) -> char {
    match strand {
        Strand::Forward => '+',
        Strand::Reverse => '-',
        Strand::Unknown => '.',
    }
}

/// Error types that can occur while validating predictions
#[derive(Error, Debug)]
pub enum GenePsError {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Model directory content is unusable; every problem found is listed
    #[error("Invalid GenePS data:\n{}", .0.join("\n"))]
    InvalidModelData(Vec<String>),
    /// Command-line or genome list problems; every problem found is listed
    #[error("{} argument error(s):\n{}", .0.len(), .0.join("\n"))]
    InvalidArguments(Vec<String>),
    /// Strand symbol other than `+` or `-`
    #[error("Invalid strand: '{0}' can not be identified as + or - strand")]
    InvalidStrand(String),
    /// Region refers to a contig the genome does not contain
    #[error("Unknown contig '{contig}' in genome {genome}")]
    UnknownContig { genome: String, contig: String },
    /// Region refers to a cluster the group does not contain
    #[error("Unknown cluster '{cluster}' in group {group}")]
    UnknownCluster { group: String, cluster: String },
    /// An external tool could not be run or returned garbage
    #[error("{tool} failed: {message}")]
    CollaboratorFailure { tool: String, message: String },
    /// Post-run counts do not add up
    #[error("Unexpected proportions in genome {genome}: {message}")]
    ConsistencyFailure { genome: String, message: String },
    /// Worker pool could not be built
    #[error("Failed to configure thread pool: {0}")]
    ThreadPoolError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: Coordinate, end: Coordinate) -> Region {
        Region {
            contig: "ctg".to_string(),
            cluster: "c1".to_string(),
            strand: "+".to_string(),
            start,
            end,
            chunk_coverage: 80.0,
            query_coverage: 90.0,
            query_length: 300,
        }
    }

    #[test]
    fn test_region_bounds_are_ordered() {
        assert_eq!(region(100, 500).bounds(), (100, 500));
        assert_eq!(region(500, 100).bounds(), (100, 500));
    }

    #[test]
    fn test_length_confidence_inclusive() {
        let confidence = LengthConfidence::new(100.0, 200.0);
        assert!(confidence.contains(100));
        assert!(confidence.contains(150));
        assert!(confidence.contains(200));
        assert!(!confidence.contains(99));
        assert!(!confidence.contains(201));
    }

    #[test]
    fn test_parse_strand() {
        assert_eq!(parse_strand("+").unwrap(), Strand::Forward);
        assert_eq!(parse_strand("-").unwrap(), Strand::Reverse);
        assert!(matches!(
            parse_strand("."),
            Err(GenePsError::InvalidStrand(s)) if s == "."
        ));
        assert!(parse_strand("forward").is_err());
    }

    #[test]
    fn test_strand_symbol() {
        assert_eq!(strand_symbol(Strand::Forward), '+');
        assert_eq!(strand_symbol(Strand::Reverse), '-');
        assert_eq!(strand_symbol(Strand::Unknown), '.');
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(Classification::Valid.to_string(), "valid");
        assert_eq!(Classification::OverlapLoser.to_string(), "overlap_loser");
        assert!(Classification::Valid.is_valid());
        assert!(!Classification::Fragmented.is_valid());
    }

    #[test]
    fn test_aggregated_error_display() {
        let err = GenePsError::InvalidModelData(vec![
            "[!]\ta.hmmGenePS does not exist".to_string(),
            "[!]\tb.hmmGenePS does not exist".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("a.hmmGenePS"));
        assert!(text.contains("b.hmmGenePS"));
    }
}
