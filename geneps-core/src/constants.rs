// =============================================================================
// =============================================================================

/// Version string for GenePS
pub const VERSION: &str = "0.2.0";

// =============================================================================
// =============================================================================

/// Default minimal chunk coverage (%) a region needs before alignment
pub const DEFAULT_COVERAGE_MIN: u32 = 30;

/// Default multiple of the score standard deviation subtracted from the mean
pub const DEFAULT_STD_FACTOR: f64 = 2.0;

/// Chunk coverage of a region whose merged alignment spans the whole chunk
pub const FULL_CHUNK_COVERAGE: f64 = 100.0;

/// Query coverage below which a full-chunk region is treated as a paralogous hit
pub const MIN_FULL_CHUNK_QUERY_COVERAGE: f64 = 40.0;

// =============================================================================
// =============================================================================

/// Extension of a group model file
pub const GROUP_FILE_EXTENSION: &str = "GenePS";

/// Per-cluster profile model
pub const HMM_SUFFIX: &str = ".hmmGenePS";

/// Per-cluster true-negative profile model
pub const TN_HMM_SUFFIX: &str = ".TN.hmmGenePS";

/// Per-cluster reference FASTA
pub const FASTA_SUFFIX: &str = ".fa_GenePS";

/// Prefix used when a single genome FASTA is given instead of a genome list
pub const SINGLE_GENOME_PREFIX: &str = "single_genome";

/// Extension marking a genome list file
pub const GENOME_LIST_EXTENSION: &str = "txt";

/// Suffix of a precomputed merged-region table
pub const REGION_TABLE_SUFFIX: &str = ".regions.tsv";

// =============================================================================
// =============================================================================

/// Log target for region discovery messages
pub const LOG_REGIONS: &str = "regions";

/// Log target for alignment messages
pub const LOG_ALIGNMENT: &str = "alignment";

/// Log target for validation and filtering messages
pub const LOG_FILTERING: &str = "filtering";

/// Width of the dashed separator between the summary tables
pub const SUMMARY_SEPARATOR_WIDTH: usize = 100;
