use std::collections::BTreeMap;

use crate::collaborators::RegionSet;
use crate::model::{GroupModel, ModelCatalog};
use crate::prediction::PredictionCandidate;
use crate::types::{Classification, Coordinate, FilteredRegion, GenePsError};

/// Key of a prediction table entry, ordered group → cluster → contig.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredictionKey {
    pub group: String,
    pub cluster: String,
    pub contig: String,
}

impl PredictionKey {
    #[must_use]
    pub fn of(candidate: &PredictionCandidate) -> Self {
        Self {
            group: candidate.group.clone(),
            cluster: candidate.cluster.clone(),
            contig: candidate.contig().to_string(),
        }
    }
}

/// Predictions keyed by `(group, cluster, contig)`.
///
/// Entries are only created on insertion; lookups never create empty
/// buckets.
#[derive(Debug, Clone, Default)]
pub struct PredictionTable {
    entries: BTreeMap<PredictionKey, Vec<PredictionCandidate>>,
}

impl PredictionTable {
    pub fn insert(&mut self, candidate: PredictionCandidate) {
        self.entries
            .entry(PredictionKey::of(&candidate))
            .or_default()
            .push(candidate);
    }

    /// Number of predictions in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All predictions, ordered by key and then by insertion.
    pub fn iter(&self) -> impl Iterator<Item = &PredictionCandidate> {
        self.entries.values().flatten()
    }

    /// Entries of one group in key order.
    pub fn group<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = (&'a PredictionKey, &'a [PredictionCandidate])> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.group == group)
            .map(|(key, candidates)| (key, candidates.as_slice()))
    }

    /// Predictions of one cluster in one group, contig by contig.
    pub fn cluster<'a>(
        &'a self,
        group: &'a str,
        cluster: &'a str,
    ) -> impl Iterator<Item = &'a PredictionCandidate> + 'a {
        self.group(group)
            .filter(move |(key, _)| key.cluster == cluster)
            .flat_map(|(_, candidates)| candidates)
    }
}

/// Statistics of one group in one genome.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    /// Number of clusters the group declares
    pub group_size: usize,
    /// Clusters with at least one valid prediction
    pub found: usize,
    /// Share of clusters without a valid prediction (%)
    pub missing_percent: f64,
    /// Fragmented predictions
    pub fragmented: usize,
    /// Clusters owning more than one locus
    pub duplicated: usize,
}

/// One line of the cluster table; `None` marks a cluster without a valid
/// prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRow {
    pub group: String,
    pub cluster: String,
    pub location: Option<ClusterLocation>,
}

/// Placement and score of a valid prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLocation {
    pub contig: String,
    pub start: Coordinate,
    pub end: Coordinate,
    pub strand: char,
    pub score: f64,
}

/// Percentage of a group's clusters without a valid prediction, rounded to
/// two decimals.
#[must_use]
pub fn missing_percentage(group_size: usize, found: usize) -> f64 {
    if group_size == 0 {
        return 0.0;
    }
    let missing = group_size.saturating_sub(found) as f64 * 100.0 / group_size as f64;
    (missing * 100.0).round() / 100.0
}

/// Everything one genome run produced.
///
/// Built by the analyzer and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct GenomeRunResult {
    pub genome: String,
    /// Regions reported by the region finder over all groups
    pub regions_merged: usize,
    /// Owners after overlap resolution
    pub valid: PredictionTable,
    /// Score-filtered, fragmented and overlap-losing predictions
    pub filtered: PredictionTable,
    /// Regions rejected before a prediction existed
    pub filtered_regions: Vec<FilteredRegion>,
    /// Fragmented predictions per group
    pub fragmented_by_group: BTreeMap<String, usize>,
    /// Elected owners per `(group, cluster)`
    pub owners_by_cluster: BTreeMap<(String, String), usize>,
    /// Region sets per group, kept for intermediate output
    pub merged_regions: BTreeMap<String, RegionSet>,
    /// Concatenated aligner output per group, kept for intermediate output
    pub aligner_reports: BTreeMap<String, String>,
}

impl GenomeRunResult {
    #[must_use]
    pub fn new(genome: &str) -> Self {
        Self {
            genome: genome.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn record_owner(&mut self, candidate: PredictionCandidate) {
        *self
            .owners_by_cluster
            .entry((candidate.group.clone(), candidate.cluster.clone()))
            .or_default() += 1;
        self.valid.insert(candidate);
    }

    pub(crate) fn record_filtered(&mut self, candidate: PredictionCandidate) {
        if candidate.classification() == Classification::Fragmented {
            *self
                .fragmented_by_group
                .entry(candidate.group.clone())
                .or_default() += 1;
        }
        self.filtered.insert(candidate);
    }

    pub(crate) fn record_aligner_report(&mut self, group: &str, report: &str) {
        self.aligner_reports.entry(group.to_string()).or_default().push_str(report);
    }

    pub(crate) fn record_filtered_region(&mut self, filtered: FilteredRegion) {
        self.filtered_regions.push(filtered);
    }

    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    /// Filtered predictions plus regions filtered before prediction.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered.len() + self.filtered_regions.len()
    }

    /// Records carrying `classification`, regions and predictions alike.
    #[must_use]
    pub fn count(&self, classification: Classification) -> usize {
        let regions = self
            .filtered_regions
            .iter()
            .filter(|r| r.classification == classification)
            .count();
        let predictions = self
            .valid
            .iter()
            .chain(self.filtered.iter())
            .filter(|c| c.classification() == classification)
            .count();
        regions + predictions
    }

    #[must_use]
    pub fn fragmented(&self, group: &str) -> usize {
        self.fragmented_by_group.get(group).copied().unwrap_or(0)
    }

    /// Clusters of `group` that own more than one locus.
    #[must_use]
    pub fn duplicated_clusters(&self, group: &str) -> usize {
        self.owners_by_cluster
            .iter()
            .filter(|((g, _), &owners)| g == group && owners > 1)
            .count()
    }

    /// Checks `regions_merged == valid + filtered`.
    ///
    /// # Errors
    ///
    /// Returns [`GenePsError::ConsistencyFailure`] when the counts differ.
    pub fn check_proportions(&self) -> Result<(), GenePsError> {
        let (valid, filtered) = (self.valid_count(), self.filtered_count());
        if valid + filtered == self.regions_merged {
            Ok(())
        } else {
            Err(GenePsError::ConsistencyFailure {
                genome: self.genome.clone(),
                message: format!(
                    "{} merged regions but {valid} valid and {filtered} filtered predictions",
                    self.regions_merged
                ),
            })
        }
    }

    /// Checks that every valid prediction made it into the output files.
    ///
    /// # Errors
    ///
    /// Returns [`GenePsError::ConsistencyFailure`] when `written_valid`
    /// differs from the number of valid predictions.
    pub fn check_written(&self, written_valid: usize) -> Result<(), GenePsError> {
        if written_valid == self.valid_count() {
            self.check_proportions()
        } else {
            Err(GenePsError::ConsistencyFailure {
                genome: self.genome.clone(),
                message: format!(
                    "number of clusters written to files ({written_valid}) is not in line with the expectations ({})",
                    self.valid_count()
                ),
            })
        }
    }

    #[must_use]
    pub fn group_summary(&self, group: &GroupModel) -> GroupSummary {
        let found = group
            .clusters
            .iter()
            .filter(|cluster| self.valid.cluster(&group.name, &cluster.name).next().is_some())
            .count();
        GroupSummary {
            group: group.name.clone(),
            group_size: group.group_size,
            found,
            missing_percent: missing_percentage(group.group_size, found),
            fragmented: self.fragmented(&group.name),
            duplicated: self.duplicated_clusters(&group.name),
        }
    }

    #[must_use]
    pub fn group_summaries(&self, catalog: &ModelCatalog) -> Vec<GroupSummary> {
        catalog.groups.iter().map(|group| self.group_summary(group)).collect()
    }

    /// Cluster table rows, groups and clusters in catalog order.
    #[must_use]
    pub fn cluster_rows(&self, catalog: &ModelCatalog) -> Vec<ClusterRow> {
        let mut rows = Vec::new();
        for group in &catalog.groups {
            for cluster in &group.clusters {
                let mut predictions = self.valid.cluster(&group.name, &cluster.name).peekable();
                if predictions.peek().is_none() {
                    rows.push(ClusterRow {
                        group: group.name.clone(),
                        cluster: cluster.name.clone(),
                        location: None,
                    });
                }
                rows.extend(predictions.map(|prediction| ClusterRow {
                    group: group.name.clone(),
                    cluster: cluster.name.clone(),
                    location: Some(ClusterLocation {
                        contig: prediction.contig().to_string(),
                        start: prediction.placement.start,
                        end: prediction.placement.end,
                        strand: crate::types::strand_symbol(prediction.strand()),
                        score: prediction.score,
                    }),
                }));
            }
        }
        rows
    }
}
