use crate::constants::{FULL_CHUNK_COVERAGE, MIN_FULL_CHUNK_QUERY_COVERAGE};
use crate::types::{Classification, LengthConfidence, Region};

/// Decides whether a region is worth an alignment attempt.
///
/// A region whose merged hit spans the whole chunk but covers less than 40%
/// of the reference is a short paralogous match and is rejected. Otherwise
/// the chunk coverage has to exceed `coverage_min`.
#[must_use]
pub fn passes_coverage_filter(region: &Region, coverage_min: u32) -> bool {
    if region.chunk_coverage == FULL_CHUNK_COVERAGE
        && region.query_coverage < MIN_FULL_CHUNK_QUERY_COVERAGE
    {
        return false;
    }
    region.chunk_coverage > f64::from(coverage_min)
}

/// A prediction is fragmented when its protein length lies outside the
/// cluster's length interval.
#[must_use]
pub fn is_fragmented(protein_length: usize, confidence: &LengthConfidence) -> bool {
    !confidence.contains(protein_length)
}

/// Score gate followed by the fragmentation check.
///
/// Scoring below the cutoff wins over fragmentation.
#[must_use]
pub fn classify(score: f64, cutoff: f64, fragmented: bool) -> Classification {
    if score < cutoff {
        Classification::ScoreFiltered
    } else if fragmented {
        Classification::Fragmented
    } else {
        Classification::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(chunk_coverage: f64, query_coverage: f64) -> Region {
        Region {
            contig: "ctg1".to_string(),
            cluster: "c1".to_string(),
            strand: "+".to_string(),
            start: 1,
            end: 100,
            chunk_coverage,
            query_coverage,
            query_length: 100,
        }
    }

    #[test]
    fn test_full_chunk_with_low_query_coverage_is_rejected() {
        assert!(!passes_coverage_filter(&region(100.0, 39.9), 30));
        assert!(!passes_coverage_filter(&region(100.0, 0.0), 0));
    }

    #[test]
    fn test_full_chunk_with_enough_query_coverage_passes() {
        assert!(passes_coverage_filter(&region(100.0, 40.0), 30));
    }

    #[test]
    fn test_chunk_coverage_above_minimum_passes() {
        assert!(passes_coverage_filter(&region(31.0, 10.0), 30));
        assert!(passes_coverage_filter(&region(30.5, 10.0), 30));
    }

    #[test]
    fn test_chunk_coverage_at_minimum_is_rejected() {
        assert!(!passes_coverage_filter(&region(30.0, 90.0), 30));
        assert!(!passes_coverage_filter(&region(12.0, 90.0), 30));
    }

    #[test]
    fn test_configured_minimum_is_respected() {
        assert!(!passes_coverage_filter(&region(45.0, 90.0), 50));
        assert!(passes_coverage_filter(&region(51.0, 90.0), 50));
    }

    #[test]
    fn test_fragmentation_bounds() {
        let confidence = LengthConfidence::new(100.0, 200.0);
        assert!(!is_fragmented(150, &confidence));
        assert!(!is_fragmented(100, &confidence));
        assert!(!is_fragmented(200, &confidence));
        assert!(is_fragmented(99, &confidence));
        assert!(is_fragmented(201, &confidence));
    }

    #[test]
    fn test_score_gate_precedes_fragmentation() {
        assert_eq!(classify(5.0, 10.0, true), Classification::ScoreFiltered);
        assert_eq!(classify(5.0, 10.0, false), Classification::ScoreFiltered);
    }

    #[test]
    fn test_passing_score() {
        assert_eq!(classify(10.0, 10.0, false), Classification::Valid);
        assert_eq!(classify(12.0, 10.0, true), Classification::Fragmented);
    }

    #[test]
    fn test_unscored_prediction_is_filtered() {
        assert_eq!(
            classify(f64::NEG_INFINITY, -1000.0, false),
            Classification::ScoreFiltered
        );
    }
}
