use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{RegionFinder, RegionSet};
use crate::constants::{LOG_REGIONS, REGION_TABLE_SUFFIX};
use crate::genome::Genome;
use crate::model::GroupModel;
use crate::types::{GenePsError, Region};

/// Reads precomputed merged-region tables.
///
/// The table of a group lives at `<root>/<genome prefix>/<group>.regions.tsv`
/// and uses the layout of the intermediate region files:
///
/// ```text
/// # Fields: contig, subject, subject_start, subject_end, strand, chunk_coverage, total_coverage, query_length
/// chrI    cluster_1    10200    11950    +    87.5    92.0    412
/// ```
#[derive(Debug, Clone)]
pub struct RegionTableFinder {
    root: PathBuf,
}

impl RegionTableFinder {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn table_path(&self, genome: &str, group: &str) -> PathBuf {
        self.root.join(genome).join(format!("{group}{REGION_TABLE_SUFFIX}"))
    }
}

impl RegionFinder for RegionTableFinder {
    fn find(&self, genome: &Genome, group: &GroupModel) -> Result<Option<RegionSet>, GenePsError> {
        let path = self.table_path(&genome.prefix, &group.name);
        if !path.exists() {
            debug!(target: LOG_REGIONS, "No region table at {}", path.display());
            return Ok(None);
        }

        let mut set = RegionSet::new();
        for region in read_region_table(&path)? {
            if group.cluster(&region.cluster).is_some() {
                set.push(region);
            } else {
                warn!(
                    target: LOG_REGIONS,
                    "Skipping region of unknown cluster {} - genome: {} group: {}",
                    region.cluster, genome.prefix, group.name
                );
            }
        }
        Ok((!set.is_empty()).then_some(set))
    }
}

/// Parses a region table file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read and a parse error for
/// lines without eight valid columns.
pub fn read_region_table(path: &Path) -> Result<Vec<Region>, GenePsError> {
    let reader = BufReader::new(File::open(path)?);
    let mut regions = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        regions.push(parse_region_line(&line).map_err(|message| {
            GenePsError::ParseError(format!("{}:{}: {message}", path.display(), number + 1))
        })?);
    }
    Ok(regions)
}

fn parse_region_line(line: &str) -> Result<Region, String> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    let [contig, cluster, start, end, strand, chunk, query, query_length] = fields.as_slice() else {
        return Err(format!("expected 8 columns, found {}", fields.len()));
    };
    Ok(Region {
        contig: (*contig).to_string(),
        cluster: (*cluster).to_string(),
        strand: (*strand).to_string(),
        start: start.parse().map_err(|e| format!("start '{start}': {e}"))?,
        end: end.parse().map_err(|e| format!("end '{end}': {e}"))?,
        chunk_coverage: chunk.parse().map_err(|e| format!("chunk coverage '{chunk}': {e}"))?,
        query_coverage: query.parse().map_err(|e| format!("query coverage '{query}': {e}"))?,
        query_length: query_length
            .parse()
            .map_err(|e| format!("query length '{query_length}': {e}"))?,
    })
}
