//! Boundaries to the external tools the engine relies on.
//!
//! - [`RegionFinder`]: candidate regions per contig and cluster
//! - [`Aligner`]: one prediction per region, or nothing
//! - [`Scorer`]: one score per predicted protein, or nothing
//!
//! "Nothing" is an ordinary outcome and is reported as `Ok(None)`; errors
//! are reserved for tools that cannot be run at all.
//!
//! Implementations backed by precomputed tables and by the usual command
//! line tools live in the submodules.

pub mod exonerate;
pub mod hmmsearch;
pub mod region_table;

use std::collections::{BTreeMap, HashMap};

pub use exonerate::ExonerateAligner;
pub use hmmsearch::HmmsearchScorer;
pub use region_table::RegionTableFinder;

use crate::genome::Genome;
use crate::model::{ClusterModel, GroupModel};
use crate::types::{AlignmentResult, GenePsError, Region};

/// Regions of one group keyed contig → cluster, both in lexical order.
///
/// Regions of one contig/cluster keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSet {
    contigs: BTreeMap<String, BTreeMap<String, Vec<Region>>>,
}

impl RegionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: Region) {
        self.contigs
            .entry(region.contig.clone())
            .or_default()
            .entry(region.cluster.clone())
            .or_default()
            .push(region);
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.contigs
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region_count() == 0
    }

    /// Contigs with their per-cluster regions.
    pub fn contigs(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<Region>>)> {
        self.contigs.iter().map(|(contig, clusters)| (contig.as_str(), clusters))
    }

    /// Every region, contig by contig and cluster by cluster.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.contigs.values().flat_map(BTreeMap::values).flatten()
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut set = Self::new();
        for region in iter {
            set.push(region);
        }
        set
    }
}

/// Protein sent to the scorer under a batch-local label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledProtein {
    pub label: String,
    pub sequence: String,
}

/// Finds candidate regions of a group's clusters in a genome.
pub trait RegionFinder: Send + Sync {
    /// Returns `None` when the genome has no candidate region for the group.
    ///
    /// # Errors
    ///
    /// Fails if the underlying tool or table cannot be used.
    fn find(&self, genome: &Genome, group: &GroupModel) -> Result<Option<RegionSet>, GenePsError>;
}

/// Aligns a cluster's consensus against one region.
pub trait Aligner: Send + Sync {
    /// Returns `None` when no alignment was found.
    ///
    /// # Errors
    ///
    /// Fails if the aligner cannot be run.
    fn align(
        &self,
        region: &Region,
        region_sequence: &[u8],
        model: &ClusterModel,
    ) -> Result<Option<AlignmentResult>, GenePsError>;
}

/// Scores predicted proteins against a cluster model.
pub trait Scorer: Send + Sync {
    /// Returns `None` when none of the proteins scored.
    ///
    /// # Errors
    ///
    /// Fails if the scorer cannot be run.
    fn score(
        &self,
        proteins: &[LabelledProtein],
        model: &ClusterModel,
    ) -> Result<Option<HashMap<String, f64>>, GenePsError>;
}

pub(crate) fn collaborator_error(tool: &str, message: impl Into<String>) -> GenePsError {
    GenePsError::CollaboratorFailure {
        tool: tool.to_string(),
        message: message.into(),
    }
}
