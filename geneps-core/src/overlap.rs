//! Election of a single owner among overlapping valid predictions.
//!
//! Several clusters (or repeated alignments of one cluster) can call a valid
//! prediction on the same locus. Candidates of one `(group, contig)` are
//! compared pairwise, and every candidate is the pivot of its own
//! comparisons: it keeps its locus unless a candidate it overlaps directly
//! beats it. Overlap is not chained, so two loci that only touch through a
//! weaker third candidate keep one owner each.
//!
//! A challenger beats a rival with a higher score, or with an equal score
//! when it comes later in discovery order. Demoted candidates become
//! [`Classification::OverlapLoser`](crate::types::Classification).

use std::cmp::Ordering;

use crate::prediction::PredictionCandidate;

/// Outcome of resolving one `(group, contig)`.
#[derive(Debug, Default)]
pub struct OverlapResolution {
    /// Owners in discovery order
    pub owners: Vec<PredictionCandidate>,
    /// Demoted candidates in discovery order
    pub losers: Vec<PredictionCandidate>,
}

/// Owner comparator over `(discovery index, candidate)` pairs.
///
/// The challenger wins with a higher score; on a tie the candidate examined
/// later wins.
#[must_use]
pub fn challenger_wins(
    current: (usize, &PredictionCandidate),
    challenger: (usize, &PredictionCandidate),
) -> bool {
    match challenger.1.score.partial_cmp(&current.1.score) {
        Some(Ordering::Greater) => true,
        Some(Ordering::Equal) => challenger.0 > current.0,
        _ => false,
    }
}

/// For every candidate, the strongest directly overlapping rival that
/// beats it; `None` marks an owner.
#[must_use]
pub fn strongest_rivals(candidates: &[PredictionCandidate]) -> Vec<Option<usize>> {
    candidates
        .iter()
        .enumerate()
        .map(|(pivot, candidate)| {
            let mut best: Option<usize> = None;
            for (index, other) in candidates.iter().enumerate() {
                if index == pivot || !candidate.overlaps(other) {
                    continue;
                }
                let current = best.unwrap_or(pivot);
                if challenger_wins((current, &candidates[current]), (index, other)) {
                    best = Some(index);
                }
            }
            best
        })
        .collect()
}

/// Resolves the valid candidates of one `(group, contig)`.
///
/// Non-owners are demoted and returned as losers; every candidate ends up
/// in exactly one of the two lists.
#[must_use]
pub fn resolve_overlaps(candidates: Vec<PredictionCandidate>) -> OverlapResolution {
    let rivals = strongest_rivals(&candidates);
    let mut resolution = OverlapResolution::default();
    for (mut candidate, rival) in candidates.into_iter().zip(rivals) {
        if rival.is_some() {
            candidate.demote();
            resolution.losers.push(candidate);
        } else {
            resolution.owners.push(candidate);
        }
    }
    resolution
}
