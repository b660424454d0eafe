use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};
use rayon::prelude::*;

use crate::collaborators::{Aligner, LabelledProtein, RegionFinder, Scorer};
use crate::config::GenePsConfig;
use crate::constants::{LOG_ALIGNMENT, LOG_FILTERING, LOG_REGIONS};
use crate::genome::{Genome, GenomeInput};
use crate::model::{ClusterModel, GroupModel, ModelCatalog};
use crate::output::write_genome_outputs;
use crate::overlap::resolve_overlaps;
use crate::prediction::{passes_coverage_filter, PredictionCandidate};
use crate::results::GenomeRunResult;
use crate::types::{strand_symbol, AlignmentResult, Classification, FilteredRegion, GenePsError, Region};

/// The external tools a run talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub regions: &'a dyn RegionFinder,
    pub aligner: &'a dyn Aligner,
    pub scorer: &'a dyn Scorer,
}

/// Validates region predictions of every group against one or more genomes.
///
/// The analyzer holds no mutable state: every genome run builds its own
/// [`GenomeRunResult`], so genomes can be processed in parallel.
///
/// # Examples
///
/// ```rust,no_run
/// use geneps_core::collaborators::{ExonerateAligner, HmmsearchScorer, RegionTableFinder};
/// use geneps_core::config::GenePsConfig;
/// use geneps_core::engine::{Collaborators, GenePsAnalyzer};
/// use geneps_core::genome::resolve_genome_inputs;
/// use geneps_core::model::{GenePsFileLoader, ModelLoader};
/// use std::path::Path;
///
/// let config = GenePsConfig::default();
/// let catalog = GenePsFileLoader::new(config.std_factor).load(Path::new("results"))?;
///
/// let regions = RegionTableFinder::new("regions");
/// let aligner = ExonerateAligner::default();
/// let scorer = HmmsearchScorer::default();
/// let collaborators = Collaborators {
///     regions: &regions,
///     aligner: &aligner,
///     scorer: &scorer,
/// };
///
/// let analyzer = GenePsAnalyzer::new(config, &catalog, collaborators);
/// let genomes = resolve_genome_inputs(Path::new("genomes.txt"))?;
/// for outcome in analyzer.process_genomes(&genomes, Path::new("Predictions"))? {
///     let result = outcome?;
///     println!("{}: {} valid predictions", result.genome, result.valid_count());
/// }
/// # Ok::<(), geneps_core::types::GenePsError>(())
/// ```
pub struct GenePsAnalyzer<'a> {
    config: GenePsConfig,
    catalog: &'a ModelCatalog,
    collaborators: Collaborators<'a>,
}

impl<'a> GenePsAnalyzer<'a> {
    #[must_use]
    pub const fn new(
        config: GenePsConfig,
        catalog: &'a ModelCatalog,
        collaborators: Collaborators<'a>,
    ) -> Self {
        Self {
            config,
            catalog,
            collaborators,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GenePsConfig {
        &self.config
    }

    /// Processes every genome and writes its outputs below `prediction_dir`.
    ///
    /// Genomes run in parallel; outcomes are returned in input order. A
    /// failing genome does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`GenePsError::ThreadPoolError`] if a dedicated pool was
    /// requested and could not be built.
    pub fn process_genomes(
        &self,
        inputs: &[GenomeInput],
        prediction_dir: &Path,
    ) -> Result<Vec<Result<GenomeRunResult, GenePsError>>, GenePsError> {
        let run = || -> Vec<Result<GenomeRunResult, GenePsError>> {
            inputs
                .par_iter()
                .map(|input| self.process_genome(input, prediction_dir))
                .collect()
        };

        match self.config.num_threads {
            Some(num_threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| GenePsError::ThreadPoolError(e.to_string()))?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }

    /// Loads, validates and writes one genome.
    ///
    /// # Errors
    ///
    /// Fails if the genome cannot be read, a collaborator cannot be run,
    /// an output file cannot be written or the final counts do not add up.
    pub fn process_genome(
        &self,
        input: &GenomeInput,
        prediction_dir: &Path,
    ) -> Result<GenomeRunResult, GenePsError> {
        let genome = Genome::load(input)?;
        if !self.config.quiet {
            eprintln!(
                "Analyzing genome {} ({} contigs)...",
                genome.prefix,
                genome.contig_count()
            );
        }

        let result = self.run_genome(&genome)?;
        let written = write_genome_outputs(
            prediction_dir,
            &result,
            self.catalog,
            self.config.keep_intermediate,
        )?;
        result.check_written(written)?;

        if !self.config.quiet {
            eprintln!(
                "Finished genome {}: {} valid, {} filtered",
                result.genome,
                result.valid_count(),
                result.filtered_count()
            );
        }
        Ok(result)
    }

    /// Validates every group of the catalog against `genome`.
    ///
    /// Groups, contigs and clusters are visited in catalog and lexical
    /// order. Overlap resolution for a contig starts once all of its
    /// clusters are aligned and scored.
    ///
    /// # Errors
    ///
    /// Fails on collaborator failures, regions pointing to unknown contigs
    /// or clusters, invalid strands and inconsistent final counts.
    pub fn run_genome(&self, genome: &Genome) -> Result<GenomeRunResult, GenePsError> {
        let mut result = GenomeRunResult::new(&genome.prefix);

        for group in &self.catalog.groups {
            let Some(regions) = self.collaborators.regions.find(genome, group)? else {
                warn!(
                    target: LOG_REGIONS,
                    "No regions found - genome: {} group: {}", genome.prefix, group.name
                );
                continue;
            };
            info!(
                target: LOG_REGIONS,
                "{} merged regions - genome: {} group: {}",
                regions.region_count(),
                genome.prefix,
                group.name
            );
            result.regions_merged += regions.region_count();

            for (contig, clusters) in regions.contigs() {
                let mut valid = Vec::new();
                for (cluster, cluster_regions) in clusters {
                    let model = group.cluster(cluster).ok_or_else(|| GenePsError::UnknownCluster {
                        group: group.name.clone(),
                        cluster: cluster.clone(),
                    })?;
                    for candidate in self.predict_cluster(genome, group, model, cluster_regions, &mut result)? {
                        if candidate.classification().is_valid() {
                            valid.push(candidate);
                        } else {
                            log_filtered(&genome.prefix, &candidate, "");
                            result.record_filtered(candidate);
                        }
                    }
                }

                let resolution = resolve_overlaps(valid);
                for loser in resolution.losers {
                    log_filtered(&genome.prefix, &loser, " (overlapping predictions)");
                    result.record_filtered(loser);
                }
                for owner in resolution.owners {
                    info!(
                        target: LOG_FILTERING,
                        "VALID PREDICTION - genome: {} group: {} cluster: {} contig: {} location: {}-{} strand: {} score: {:.3}",
                        genome.prefix,
                        owner.group,
                        owner.cluster,
                        contig,
                        owner.placement.start,
                        owner.placement.end,
                        strand_symbol(owner.strand()),
                        owner.score
                    );
                    result.record_owner(owner);
                }
            }

            result.merged_regions.insert(group.name.clone(), regions);
        }

        result.check_proportions()?;
        Ok(result)
    }

    /// Aligns and scores the regions of one cluster on one contig.
    ///
    /// Regions that never become a candidate are recorded in `result`.
    fn predict_cluster(
        &self,
        genome: &Genome,
        group: &GroupModel,
        model: &ClusterModel,
        regions: &[Region],
        result: &mut GenomeRunResult,
    ) -> Result<Vec<PredictionCandidate>, GenePsError> {
        let mut aligned: Vec<(String, &Region, AlignmentResult)> = Vec::new();

        for (index, region) in regions.iter().enumerate() {
            if !passes_coverage_filter(region, self.config.coverage_min) {
                info!(
                    target: LOG_REGIONS,
                    "Coverage filtered - genome: {} group: {} cluster: {} contig: {} region: {}-{} chunk coverage: {} query coverage: {}",
                    genome.prefix,
                    group.name,
                    model.name,
                    region.contig,
                    region.start,
                    region.end,
                    region.chunk_coverage,
                    region.query_coverage
                );
                result.record_filtered_region(filtered_region(group, region, Classification::CoverageFiltered));
                continue;
            }

            let sequence = genome.region_sequence(region)?;
            match self.collaborators.aligner.align(region, &sequence, model)? {
                Some(mut alignment) => {
                    let report = std::mem::take(&mut alignment.report);
                    result.record_aligner_report(&group.name, &report);
                    aligned.push(((index + 1).to_string(), region, alignment));
                }
                None => {
                    info!(
                        target: LOG_ALIGNMENT,
                        "No alignment - genome: {} group: {} cluster: {} contig: {} region: {}-{} strand: {}",
                        genome.prefix,
                        group.name,
                        model.name,
                        region.contig,
                        region.start,
                        region.end,
                        region.strand
                    );
                    result.record_filtered_region(filtered_region(group, region, Classification::NoAlignment));
                }
            }
        }

        if aligned.is_empty() {
            return Ok(Vec::new());
        }

        let proteins: Vec<LabelledProtein> = aligned
            .iter()
            .map(|(label, _, alignment)| LabelledProtein {
                label: label.clone(),
                sequence: alignment.protein.clone(),
            })
            .collect();
        let scores: HashMap<String, f64> = self
            .collaborators
            .scorer
            .score(&proteins, model)?
            .unwrap_or_default();

        aligned
            .into_iter()
            .map(|(label, region, alignment)| {
                let score = scores.get(&label).copied().unwrap_or_else(|| {
                    info!(
                        target: LOG_FILTERING,
                        "No score - genome: {} group: {} cluster: {} contig: {} region: {}-{}",
                        genome.prefix,
                        group.name,
                        model.name,
                        region.contig,
                        region.start,
                        region.end
                    );
                    f64::NEG_INFINITY
                });
                PredictionCandidate::from_model(&group.name, model, region.clone(), alignment, score)
            })
            .collect()
    }
}

fn filtered_region(group: &GroupModel, region: &Region, classification: Classification) -> FilteredRegion {
    FilteredRegion {
        group: group.name.clone(),
        region: region.clone(),
        classification,
    }
}

fn log_filtered(genome: &str, candidate: &PredictionCandidate, note: &str) {
    info!(
        target: LOG_FILTERING,
        "{}{} - genome: {} group: {} cluster: {} contig: {} location: {}-{} strand: {} score: {:.3} cutoff: {:.3} length: {} expected: {}-{}",
        candidate.classification(),
        note,
        genome,
        candidate.group,
        candidate.cluster,
        candidate.contig(),
        candidate.placement.start,
        candidate.placement.end,
        strand_symbol(candidate.strand()),
        candidate.score,
        candidate.cutoff,
        candidate.protein_length(),
        candidate.length_confidence.min,
        candidate.length_confidence.max
    );
}
