use std::io::Write;

use crate::constants::SUMMARY_SEPARATOR_WIDTH;
use crate::model::ModelCatalog;
use crate::results::GenomeRunResult;
use crate::types::GenePsError;

const GROUP_COLUMNS: &str = "group\t#proteins\t#found\t%missing\t#fragmented\t#>1";
const CLUSTER_COLUMNS: &str = "group\tprotein\tcontig\tstart\tend\tstrand\tscore";
/// Placeholder cells of a cluster without a valid prediction
const MISSING_LOCATION: &str = "-\t-\t-\t-\t-";

/// Write the per-genome summary: group statistics, then one row per cluster
pub fn write_summary<W: Write>(
    writer: &mut W,
    result: &GenomeRunResult,
    catalog: &ModelCatalog,
) -> Result<(), GenePsError> {
    writeln!(writer, "{GROUP_COLUMNS}")?;
    for summary in result.group_summaries(catalog) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.2}\t{}\t{}",
            summary.group,
            summary.group_size,
            summary.found,
            summary.missing_percent,
            summary.fragmented,
            summary.duplicated
        )?;
    }

    writeln!(writer, "{}", "-".repeat(SUMMARY_SEPARATOR_WIDTH))?;

    writeln!(writer, "{CLUSTER_COLUMNS}")?;
    for row in result.cluster_rows(catalog) {
        match row.location {
            Some(location) => writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{:.3}",
                row.group,
                row.cluster,
                location.contig,
                location.start,
                location.end,
                location.strand,
                location.score
            )?,
            None => writeln!(writer, "{}\t{}\t{MISSING_LOCATION}", row.group, row.cluster)?,
        }
    }
    Ok(())
}
