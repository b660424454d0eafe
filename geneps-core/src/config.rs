use crate::constants::{DEFAULT_COVERAGE_MIN, DEFAULT_STD_FACTOR};

/// Configuration settings for a GenePS validation run.
///
/// The value is threaded explicitly through the model loader and the
/// analyzer, so independent genome runs never share mutable state.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use geneps_core::config::GenePsConfig;
///
/// let config = GenePsConfig::default();
/// assert_eq!(config.coverage_min, 30);
/// assert_eq!(config.std_factor, 2.0);
/// ```
///
/// ## Stricter filtering on four threads
///
/// ```rust
/// use geneps_core::config::GenePsConfig;
///
/// let config = GenePsConfig {
///     coverage_min: 50,
///     std_factor: 1.5,
///     num_threads: Some(4),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GenePsConfig {
    /// Minimal chunk coverage (%) a region needs to be sent to the aligner.
    ///
    /// The comparison is strict: a region with exactly this coverage is
    /// rejected.
    ///
    /// **Default**: `30`
    pub coverage_min: u32,

    /// Factor applied to the standard deviation of a cluster's score
    /// distribution when deriving its score cutoff (`mean - factor * std`).
    ///
    /// **Default**: `2.0`
    pub std_factor: f64,

    /// Write intermediate files (merged region tables) next to the results.
    ///
    /// **Default**: `false`
    pub keep_intermediate: bool,

    /// Suppress progress messages on stderr.
    ///
    /// **Default**: `false`
    pub quiet: bool,

    /// Number of worker threads used to process genomes in parallel.
    ///
    /// **Default**: `None` (use all available cores)
    pub num_threads: Option<usize>,
}

impl Default for GenePsConfig {
    fn default() -> Self {
        Self {
            coverage_min: DEFAULT_COVERAGE_MIN,
            std_factor: DEFAULT_STD_FACTOR,
            keep_intermediate: false,
            quiet: false,
            num_threads: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GenePsConfig::default();
        assert_eq!(config.coverage_min, 30);
        assert_eq!(config.std_factor, 2.0);
        assert!(!config.keep_intermediate);
        assert!(!config.quiet);
        assert!(config.num_threads.is_none());
    }

    #[test]
    fn test_struct_update_syntax() {
        let config = GenePsConfig {
            coverage_min: 45,
            ..Default::default()
        };
        assert_eq!(config.coverage_min, 45);
        assert_eq!(config.std_factor, DEFAULT_STD_FACTOR);
    }
}
