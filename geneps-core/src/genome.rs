use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use bio::alphabets::dna;
use bio::bio_types::strand::Strand;
use bio::io::fasta;

use crate::constants::{GENOME_LIST_EXTENSION, SINGLE_GENOME_PREFIX};
use crate::types::{parse_strand, GenePsError, Region};

/// A genome FASTA together with the prefix used for its outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeInput {
    pub path: PathBuf,
    pub prefix: String,
}

/// Resolves the `--genome` argument.
///
/// A `.txt` file is read as a genome list (see [`read_genome_list`]);
/// anything else is taken as a single genome FASTA with the prefix
/// `single_genome`.
///
/// # Errors
///
/// Returns [`GenePsError::InvalidArguments`] listing every missing genome
/// or malformed list line.
pub fn resolve_genome_inputs(path: &Path) -> Result<Vec<GenomeInput>, GenePsError> {
    if path.extension().is_some_and(|ext| ext == GENOME_LIST_EXTENSION) {
        return read_genome_list(path);
    }
    if !path.exists() {
        return Err(GenePsError::InvalidArguments(vec![format!(
            "[!]\t ERROR: genome {} does not exist",
            path.display()
        )]));
    }
    Ok(vec![GenomeInput {
        path: path.to_path_buf(),
        prefix: SINGLE_GENOME_PREFIX.to_string(),
    }])
}

/// Reads a TAB-separated genome list of `path<TAB>prefix` lines.
///
/// Blank lines are skipped. Relative paths are taken as they are.
///
/// # Errors
///
/// Returns [`GenePsError::InvalidArguments`] with one entry per problem, or
/// an I/O error when the list itself cannot be read.
pub fn read_genome_list(path: &Path) -> Result<Vec<GenomeInput>, GenePsError> {
    let content = fs::read_to_string(path)?;
    let mut genomes = Vec::new();
    let mut errors = Vec::new();

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.split('\t').collect();
        let [genome_path, prefix] = fields.as_slice() else {
            errors.push(format!(
                "[!]\t ERROR: genome file is not a TAB-SEPARATED 2-column file: '{line}'"
            ));
            continue;
        };
        let genome_path = PathBuf::from(genome_path.trim());
        if genome_path.exists() {
            genomes.push(GenomeInput {
                path: genome_path,
                prefix: prefix.trim().to_string(),
            });
        } else {
            errors.push(format!(
                "[!]\t ERROR: {} does not exist or was specified wrongly",
                genome_path.display()
            ));
        }
    }

    if errors.is_empty() {
        Ok(genomes)
    } else {
        Err(GenePsError::InvalidArguments(errors))
    }
}

/// Contig sequences of one target genome.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    pub prefix: String,
    contigs: HashMap<String, Vec<u8>>,
}

impl Genome {
    /// Reads every contig of the genome FASTA.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened and a parse error
    /// for malformed FASTA records.
    pub fn load(input: &GenomeInput) -> Result<Self, GenePsError> {
        let reader = fasta::Reader::new(File::open(&input.path)?);
        let mut contigs = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(|e| GenePsError::ParseError(e.to_string()))?;
            contigs.insert(record.id().to_string(), record.seq().to_vec());
        }
        Ok(Self {
            prefix: input.prefix.clone(),
            contigs,
        })
    }

    /// Builds a genome from in-memory contigs.
    pub fn from_contigs<I, S>(prefix: &str, contigs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.to_string(),
            contigs: contigs.into_iter().map(|(id, seq)| (id.into(), seq)).collect(),
        }
    }

    #[must_use]
    pub fn contig(&self, id: &str) -> Option<&[u8]> {
        self.contigs.get(id).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contig_count(&self) -> usize {
        self.contigs.len()
    }

    /// Sequence spanned by a region (1-based, inclusive, clamped to the contig).
    ///
    /// Minus-strand regions are returned reverse complemented, so local
    /// offsets count from the upper region bound.
    ///
    /// # Errors
    ///
    /// Returns [`GenePsError::UnknownContig`] when the region points to a
    /// contig the genome does not have and [`GenePsError::InvalidStrand`]
    /// for a strand other than `+` or `-`.
    pub fn region_sequence(&self, region: &Region) -> Result<Cow<'_, [u8]>, GenePsError> {
        let strand = parse_strand(&region.strand)?;
        let sequence = self.contig(&region.contig).ok_or_else(|| GenePsError::UnknownContig {
            genome: self.prefix.clone(),
            contig: region.contig.clone(),
        })?;
        let (lower, upper) = region.bounds();
        let begin = usize::try_from(lower.max(1) - 1).unwrap_or(0).min(sequence.len());
        let end = usize::try_from(upper.max(0)).unwrap_or(0).min(sequence.len());
        let slice = &sequence[begin..end.max(begin)];
        Ok(match strand {
            Strand::Reverse => Cow::Owned(dna::revcomp(slice)),
            _ => Cow::Borrowed(slice),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn region(contig: &str, start: i64, end: i64) -> Region {
        stranded_region(contig, start, end, "+")
    }

    fn stranded_region(contig: &str, start: i64, end: i64, strand: &str) -> Region {
        Region {
            contig: contig.to_string(),
            cluster: "c1".to_string(),
            strand: strand.to_string(),
            start,
            end,
            chunk_coverage: 80.0,
            query_coverage: 80.0,
            query_length: 100,
        }
    }

    #[test]
    fn test_single_genome_input() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("genome.fa");
        fs::write(&fasta, ">ctg1\nACGT\n").unwrap();

        let inputs = resolve_genome_inputs(&fasta).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].prefix, SINGLE_GENOME_PREFIX);
    }

    #[test]
    fn test_missing_single_genome() {
        let err = resolve_genome_inputs(Path::new("does/not/exist.fa")).unwrap_err();
        assert!(matches!(err, GenePsError::InvalidArguments(_)));
    }

    #[test]
    fn test_genome_list() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.fa");
        let b = dir.path().join("b.fa");
        fs::write(&a, ">x\nA\n").unwrap();
        fs::write(&b, ">y\nC\n").unwrap();
        let list = dir.path().join("genomes.txt");
        fs::write(
            &list,
            format!("{}\tcel\n\n{}\tcbr\n", a.display(), b.display()),
        )
        .unwrap();

        let inputs = resolve_genome_inputs(&list).unwrap();
        assert_eq!(
            inputs,
            vec![
                GenomeInput { path: a, prefix: "cel".to_string() },
                GenomeInput { path: b, prefix: "cbr".to_string() },
            ]
        );
    }

    #[test]
    fn test_genome_list_errors_are_aggregated() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("genomes.txt");
        fs::write(&list, "missing.fa\tcel\nno_tab_here\n").unwrap();

        match read_genome_list(&list).unwrap_err() {
            GenePsError::InvalidArguments(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].contains("missing.fa"));
                assert!(errors[1].contains("TAB-SEPARATED"));
            }
            other => panic!("Expected InvalidArguments, got {other:?}"),
        }
    }

    #[test]
    fn test_load_genome() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("genome.fa");
        fs::write(&fasta, ">ctg1 first\nACGTACGT\n>ctg2\nTTTT\n").unwrap();
        let input = GenomeInput { path: fasta, prefix: "g".to_string() };

        let genome = Genome::load(&input).unwrap();
        assert_eq!(genome.contig_count(), 2);
        assert_eq!(genome.contig("ctg1"), Some(&b"ACGTACGT"[..]));
        assert_eq!(genome.prefix, "g");
    }

    #[test]
    fn test_region_sequence_is_one_based_inclusive() {
        let genome = Genome::from_contigs("g", [("ctg1", b"ACGTACGTAA".to_vec())]);
        assert_eq!(&*genome.region_sequence(&region("ctg1", 2, 5)).unwrap(), b"CGTA");
        assert_eq!(&*genome.region_sequence(&region("ctg1", 5, 2)).unwrap(), b"CGTA");
    }

    #[test]
    fn test_region_sequence_is_clamped() {
        let genome = Genome::from_contigs("g", [("ctg1", b"ACGT".to_vec())]);
        assert_eq!(&*genome.region_sequence(&region("ctg1", 0, 100)).unwrap(), b"ACGT");
    }

    #[test]
    fn test_minus_strand_region_is_reverse_complemented() {
        let genome = Genome::from_contigs("g", [("ctg1", b"AACGTTTG".to_vec())]);
        let sequence = genome.region_sequence(&stranded_region("ctg1", 2, 6, "-")).unwrap();
        assert!(matches!(sequence, Cow::Owned(_)));
        assert_eq!(&*sequence, b"AACGT");
    }

    #[test]
    fn test_minus_strand_gene_maps_back_onto_the_contig() {
        use crate::prediction::GenePlacement;

        // ATGAAA on the minus strand; its reverse complement TTTCAT sits at 5..10
        let contig = b"GGGGTTTCATGGGGGGGGGGGGGGGG";
        let genome = Genome::from_contigs("g", [("ctg1", contig.to_vec())]);
        let minus = stranded_region("ctg1", 1, 26, "-");

        let sequence = genome.region_sequence(&minus).unwrap();
        let offset = sequence
            .windows(6)
            .position(|w| w == b"ATGAAA")
            .unwrap() as i64;
        assert_eq!(offset, 16);

        let placement = GenePlacement::from_local(&minus, (offset, offset + 6)).unwrap();
        assert_eq!((placement.start, placement.end), (10, 4));
        assert_eq!(&contig[4..10], b"TTTCAT");
    }

    #[test]
    fn test_region_sequence_invalid_strand() {
        let genome = Genome::from_contigs("g", [("ctg1", b"ACGT".to_vec())]);
        let err = genome.region_sequence(&stranded_region("ctg1", 1, 2, ".")).unwrap_err();
        assert!(matches!(err, GenePsError::InvalidStrand(_)));
    }

    #[test]
    fn test_region_sequence_unknown_contig() {
        let genome = Genome::from_contigs("g", [("ctg1", b"ACGT".to_vec())]);
        let err = genome.region_sequence(&region("ctg9", 1, 2)).unwrap_err();
        assert!(matches!(err, GenePsError::UnknownContig { .. }));
    }
}
