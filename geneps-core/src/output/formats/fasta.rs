use std::io::Write;

use crate::prediction::PredictionCandidate;
use crate::types::{strand_symbol, GenePsError};

/// FASTA header shared by the protein and DNA records of a prediction.
#[must_use]
pub fn fasta_header(genome: &str, candidate: &PredictionCandidate) -> String {
    format!(
        ">{} Cluster:{} Location:{};{}-{} HMM_score:{:.3} Strand:{}",
        genome,
        candidate.cluster,
        candidate.contig(),
        candidate.placement.start,
        candidate.placement.end,
        candidate.score,
        strand_symbol(candidate.strand())
    )
}

/// Write predicted proteins in FASTA format
pub fn write_protein_records<'a, W, I>(
    writer: &mut W,
    genome: &str,
    candidates: I,
) -> Result<usize, GenePsError>
where
    W: Write,
    I: IntoIterator<Item = &'a PredictionCandidate>,
{
    write_records(writer, genome, candidates, PredictionCandidate::protein)
}

/// Write predicted coding sequences in FASTA format
pub fn write_dna_records<'a, W, I>(
    writer: &mut W,
    genome: &str,
    candidates: I,
) -> Result<usize, GenePsError>
where
    W: Write,
    I: IntoIterator<Item = &'a PredictionCandidate>,
{
    write_records(writer, genome, candidates, PredictionCandidate::dna)
}

fn write_records<'a, W, I, F>(
    writer: &mut W,
    genome: &str,
    candidates: I,
    sequence: F,
) -> Result<usize, GenePsError>
where
    W: Write,
    I: IntoIterator<Item = &'a PredictionCandidate>,
    F: Fn(&PredictionCandidate) -> &str,
{
    let mut written = 0;
    for candidate in candidates {
        writeln!(writer, "{}", fasta_header(genome, candidate))?;
        writeln!(writer, "{}", sequence(candidate))?;
        written += 1;
    }
    Ok(written)
}
