use bio::bio_types::strand::Strand;

use crate::types::{parse_strand, Coordinate, GenePsError, Region};

/// Genome-space position of a predicted gene.
///
/// On the minus strand `start` is larger than `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenePlacement {
    pub strand: Strand,
    pub start: Coordinate,
    pub end: Coordinate,
    pub length: Coordinate,
}

impl GenePlacement {
    /// Maps local exon coordinates (relative to the excised region) onto
    /// the genome.
    ///
    /// Minus-strand coordinates are reported relative to the upper region
    /// bound, so they are subtracted from it; plus-strand coordinates are
    /// added to the lower bound.
    ///
    /// # Errors
    ///
    /// Returns [`GenePsError::InvalidStrand`] if the region strand is
    /// neither `+` nor `-`.
    pub fn from_local(
        region: &Region,
        local: (Coordinate, Coordinate),
    ) -> Result<Self, GenePsError> {
        let strand = parse_strand(&region.strand)?;
        let (region_lower, region_upper) = region.bounds();
        let local_lower = local.0.min(local.1);
        let local_upper = local.0.max(local.1);

        let (start, end) = match strand {
            Strand::Reverse => (region_upper - local_lower, region_upper - local_upper),
            _ => (region_lower + local_lower, region_lower + local_upper),
        };

        Ok(Self {
            strand,
            start,
            end,
            length: local_upper - local_lower,
        })
    }

    /// Whether two placements claim the same locus.
    ///
    /// Placements on different strands never overlap. On the same strand
    /// they overlap when their combined length reaches the span they cover
    /// together.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.strand != other.strand {
            return false;
        }
        let coordinates = [self.start, self.end, other.start, other.end];
        let lowest = coordinates.iter().min().copied().unwrap_or_default();
        let highest = coordinates.iter().max().copied().unwrap_or_default();
        self.length + other.length >= highest - lowest
    }
}
