//! # GenePS - prediction validation and overlap resolution
//!
//! Validates gene predictions for groups of orthologous protein clusters in
//! one or more target genomes. Each cluster brings a profile model, a score
//! cutoff, an expected protein length interval and a consensus sequence.
//!
//! ## Overview
//!
//! For every genome and every group the engine
//!
//! 1. asks a [`RegionFinder`](collaborators::RegionFinder) for candidate
//!    regions (contig → cluster → regions),
//! 2. drops regions with poor coverage,
//! 3. aligns the cluster consensus against each remaining region,
//! 4. scores the predicted proteins of a cluster in one batch,
//! 5. classifies each prediction as valid, fragmented or score filtered,
//! 6. elects one owner among overlapping valid predictions on a contig,
//! 7. writes FASTA/GFF files and a summary report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geneps_core::collaborators::{ExonerateAligner, HmmsearchScorer, RegionTableFinder};
//! use geneps_core::config::GenePsConfig;
//! use geneps_core::engine::Collaborators;
//! use geneps_core::genome::{Genome, GenomeInput};
//! use geneps_core::model::{GenePsFileLoader, ModelLoader};
//! use geneps_core::GenePsAnalyzer;
//! use std::path::Path;
//!
//! let config = GenePsConfig::default();
//! let catalog = GenePsFileLoader::new(config.std_factor).load(Path::new("results"))?;
//!
//! let regions = RegionTableFinder::new("regions");
//! let aligner = ExonerateAligner::default();
//! let scorer = HmmsearchScorer::default();
//! let analyzer = GenePsAnalyzer::new(
//!     config,
//!     &catalog,
//!     Collaborators { regions: &regions, aligner: &aligner, scorer: &scorer },
//! );
//!
//! let genome = Genome::load(&GenomeInput {
//!     path: "genome.fa".into(),
//!     prefix: "cel".to_string(),
//! })?;
//! let result = analyzer.run_genome(&genome)?;
//! println!("{} valid predictions", result.valid_count());
//! # Ok::<(), geneps_core::types::GenePsError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Run configuration
//! - [`model`]: Group and cluster models and their loader
//! - [`genome`]: Genome inputs and contig sequences
//! - [`collaborators`]: Region finder, aligner and scorer boundaries
//! - [`prediction`]: Candidate construction and classification
//! - [`overlap`]: Owner election among overlapping predictions
//! - [`results`]: Per-genome tables and statistics
//! - [`engine`]: Orchestration of a genome run
//! - [`output`]: FASTA, GFF and summary writers
//! - [`types`]: Shared data types and errors
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, GenePsError>`](types::GenePsError).
//! Problems with the model directory or the genome list are collected and
//! reported together; problems inside a genome run stop that genome only.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod engine;
pub mod genome;
pub mod model;
pub mod output;
pub mod overlap;
pub mod prediction;
pub mod results;
pub mod types;

pub use engine::GenePsAnalyzer;
pub use types::GenePsError;
