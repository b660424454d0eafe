use std::io::Write;

use crate::collaborators::RegionSet;
use crate::types::GenePsError;

pub const REGION_FIELDS: &str = "# Fields: contig, subject, subject_start, subject_end, strand, chunk_coverage, total_coverage, query_length";

/// Write merged regions in the region table layout
///
/// The output can be read back by
/// [`RegionTableFinder`](crate::collaborators::RegionTableFinder).
pub fn write_merged_regions<W: Write>(writer: &mut W, regions: &RegionSet) -> Result<(), GenePsError> {
    writeln!(writer, "{REGION_FIELDS}")?;
    for region in regions.regions() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            region.contig,
            region.cluster,
            region.start,
            region.end,
            region.strand,
            region.chunk_coverage,
            region.query_coverage,
            region.query_length
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::region_table::read_region_table;
    use crate::types::Region;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_merged_regions_read_back() {
        let regions: RegionSet = [
            Region {
                contig: "chrI".to_string(),
                cluster: "c1".to_string(),
                strand: "+".to_string(),
                start: 100,
                end: 500,
                chunk_coverage: 87.5,
                query_coverage: 92.0,
                query_length: 412,
            },
            Region {
                contig: "chrII".to_string(),
                cluster: "c2".to_string(),
                strand: "-".to_string(),
                start: 900,
                end: 300,
                chunk_coverage: 100.0,
                query_coverage: 20.0,
                query_length: 80,
            },
        ]
        .into_iter()
        .collect();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regions.txt");
        write_merged_regions(&mut File::create(&path).unwrap(), &regions).unwrap();

        let read: RegionSet = read_region_table(&path).unwrap().into_iter().collect();
        assert_eq!(read, regions);
    }
}
