//! Prediction candidates and their classification.
//!
//! A [`PredictionCandidate`] is built in one step from the region, the raw
//! alignment, the cluster model and the score. Construction maps the local
//! exon coordinates onto the genome, checks fragmentation and assigns the
//! classification; afterwards only overlap resolution may demote a valid
//! candidate.
//!
//! ```rust
//! use geneps_core::prediction::PredictionCandidate;
//! use geneps_core::types::{AlignmentResult, Classification, LengthConfidence, Region};
//!
//! let region = Region {
//!     contig: "chrI".to_string(),
//!     cluster: "c1".to_string(),
//!     strand: "+".to_string(),
//!     start: 100,
//!     end: 500,
//!     chunk_coverage: 85.0,
//!     query_coverage: 90.0,
//!     query_length: 120,
//! };
//! let alignment = AlignmentResult {
//!     protein: "M".repeat(150),
//!     local_coordinates: (10, 50),
//!     ..Default::default()
//! };
//!
//! let candidate = PredictionCandidate::new(
//!     "kinases",
//!     "c1",
//!     region,
//!     alignment,
//!     42.0,
//!     30.0,
//!     LengthConfidence::new(100.0, 200.0),
//! )?;
//! assert_eq!(candidate.classification(), Classification::Valid);
//! assert_eq!(candidate.placement.start, 110);
//! # Ok::<(), geneps_core::types::GenePsError>(())
//! ```

pub mod classification;
pub mod placement;

use bio::bio_types::strand::Strand;

pub use classification::{classify, is_fragmented, passes_coverage_filter};
pub use placement::GenePlacement;

use crate::model::ClusterModel;
use crate::types::{AlignmentResult, Classification, GenePsError, LengthConfidence, Region};

/// A scored prediction for one region and one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionCandidate {
    pub group: String,
    pub cluster: String,
    pub region: Region,
    pub alignment: AlignmentResult,
    pub score: f64,
    /// Cluster cutoff at construction time
    pub cutoff: f64,
    /// Cluster length interval at construction time
    pub length_confidence: LengthConfidence,
    pub placement: GenePlacement,
    fragmented: bool,
    classification: Classification,
}

impl PredictionCandidate {
    /// Builds and classifies a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`GenePsError::InvalidStrand`] when the region strand is not
    /// `+` or `-`.
    pub fn new(
        group: &str,
        cluster: &str,
        region: Region,
        alignment: AlignmentResult,
        score: f64,
        cutoff: f64,
        length_confidence: LengthConfidence,
    ) -> Result<Self, GenePsError> {
        let placement = GenePlacement::from_local(&region, alignment.local_coordinates)?;
        let fragmented = is_fragmented(alignment.protein.len(), &length_confidence);

        Ok(Self {
            group: group.to_string(),
            cluster: cluster.to_string(),
            region,
            alignment,
            score,
            cutoff,
            length_confidence,
            placement,
            fragmented,
            classification: classify(score, cutoff, fragmented),
        })
    }

    /// Builds a candidate with the cutoff and length interval of `model`.
    ///
    /// # Errors
    ///
    /// See [`PredictionCandidate::new`].
    pub fn from_model(
        group: &str,
        model: &ClusterModel,
        region: Region,
        alignment: AlignmentResult,
        score: f64,
    ) -> Result<Self, GenePsError> {
        Self::new(
            group,
            &model.name,
            region,
            alignment,
            score,
            model.score_cutoff,
            model.length_confidence,
        )
    }

    #[must_use]
    pub fn contig(&self) -> &str {
        &self.region.contig
    }

    #[must_use]
    pub const fn strand(&self) -> Strand {
        self.placement.strand
    }

    #[must_use]
    pub fn protein(&self) -> &str {
        &self.alignment.protein
    }

    #[must_use]
    pub fn dna(&self) -> &str {
        &self.alignment.dna
    }

    #[must_use]
    pub fn annotation(&self) -> &[String] {
        &self.alignment.annotation
    }

    #[must_use]
    pub fn protein_length(&self) -> usize {
        self.alignment.protein.len()
    }

    #[must_use]
    pub const fn is_fragmented(&self) -> bool {
        self.fragmented
    }

    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    /// Recomputes the classification from the stored fields.
    ///
    /// Always equals the classification assigned at construction, unless
    /// overlap resolution demoted the candidate.
    #[must_use]
    pub fn classify(&self) -> Classification {
        classify(self.score, self.cutoff, self.fragmented)
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.placement.overlaps(&other.placement)
    }

    /// Marks a valid candidate as the loser of an overlap election.
    ///
    /// Returns `false` and leaves the candidate untouched if it is not
    /// valid.
    pub(crate) fn demote(&mut self) -> bool {
        if self.classification.is_valid() {
            self.classification = Classification::OverlapLoser;
            true
        } else {
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::candidate;
    use super::*;
    use crate::model::ClusterArtifacts;
    use std::path::PathBuf;

    fn build(protein_length: usize, score: f64) -> PredictionCandidate {
        let region = Region {
            contig: "ctg1".to_string(),
            cluster: "c1".to_string(),
            strand: "-".to_string(),
            start: 100,
            end: 500,
            chunk_coverage: 80.0,
            query_coverage: 90.0,
            query_length: 150,
        };
        let alignment = AlignmentResult {
            protein: "A".repeat(protein_length),
            local_coordinates: (10, 50),
            ..Default::default()
        };
        PredictionCandidate::new(
            "kinases",
            "c1",
            region,
            alignment,
            score,
            10.0,
            LengthConfidence::new(100.0, 200.0),
        )
        .unwrap()
    }

    #[test]
    fn test_construction_computes_placement() {
        let c = build(150, 20.0);
        assert_eq!(c.strand(), Strand::Reverse);
        assert_eq!(c.placement.start, 490);
        assert_eq!(c.placement.end, 450);
        assert_eq!(c.placement.length, 40);
        assert_eq!(c.contig(), "ctg1");
    }

    #[test]
    fn test_valid_candidate() {
        let c = build(150, 20.0);
        assert!(!c.is_fragmented());
        assert_eq!(c.classification(), Classification::Valid);
    }

    #[test]
    fn test_fragmented_candidate() {
        assert_eq!(build(99, 20.0).classification(), Classification::Fragmented);
        assert_eq!(build(201, 20.0).classification(), Classification::Fragmented);
    }

    #[test]
    fn test_low_score_fragmented_candidate_is_score_filtered() {
        let c = build(99, 5.0);
        assert!(c.is_fragmented());
        assert_eq!(c.classification(), Classification::ScoreFiltered);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for c in [build(150, 20.0), build(99, 20.0), build(150, 5.0)] {
            let first = c.classify();
            let second = c.classify();
            assert_eq!(first, second);
            assert_eq!(first, c.classification());
        }
    }

    #[test]
    fn test_invalid_strand_fails_construction() {
        let mut region = build(150, 20.0).region;
        region.strand = "?".to_string();
        let result = PredictionCandidate::new(
            "kinases",
            "c1",
            region,
            AlignmentResult::default(),
            1.0,
            0.0,
            LengthConfidence::new(0.0, 10.0),
        );
        assert!(matches!(result, Err(GenePsError::InvalidStrand(_))));
    }

    #[test]
    fn test_from_model_copies_cutoff_and_length() {
        let model = ClusterModel {
            name: "c7".to_string(),
            score_cutoff: 55.0,
            length_confidence: LengthConfidence::new(1.0, 2.0),
            consensus_sequence: "MK".to_string(),
            artifacts: ClusterArtifacts {
                hmm: PathBuf::from("c7.hmmGenePS"),
                true_negative_hmm: PathBuf::from("c7.TN.hmmGenePS"),
                fasta: PathBuf::from("c7.fa_GenePS"),
            },
        };
        let region = build(1, 0.0).region;
        let alignment = AlignmentResult {
            protein: "MK".to_string(),
            local_coordinates: (0, 6),
            ..Default::default()
        };
        let c = PredictionCandidate::from_model("kinases", &model, region, alignment, 60.0).unwrap();
        assert_eq!(c.cluster, "c7");
        assert_eq!(c.cutoff, 55.0);
        assert_eq!(c.length_confidence, LengthConfidence::new(1.0, 2.0));
        assert_eq!(c.classification(), Classification::Valid);
    }

    #[test]
    fn test_demote_only_valid() {
        let mut valid = candidate("c1", "+", 0, 40, 9.0);
        assert!(valid.demote());
        assert_eq!(valid.classification(), Classification::OverlapLoser);
        assert!(!valid.demote());

        let mut filtered = build(150, 5.0);
        assert!(!filtered.demote());
        assert_eq!(filtered.classification(), Classification::ScoreFiltered);
    }
}
