use std::io::Write;

use crate::prediction::PredictionCandidate;
use crate::types::GenePsError;

/// Write the aligner's gene model lines of every prediction
///
/// Lines are copied as reported by the aligner, predictions one after the
/// other.
pub fn write_gff_records<'a, W, I>(writer: &mut W, candidates: I) -> Result<usize, GenePsError>
where
    W: Write,
    I: IntoIterator<Item = &'a PredictionCandidate>,
{
    let mut written = 0;
    for candidate in candidates {
        for line in candidate.annotation() {
            writeln!(writer, "{line}")?;
        }
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::test_support::candidate;
    use std::io::Cursor;

    #[test]
    fn test_write_gff_records() {
        let records = vec![candidate("c1", "+", 100, 40, 1.0), candidate("c2", "+", 900, 40, 2.0)];
        let mut output = Cursor::new(Vec::new());
        assert_eq!(write_gff_records(&mut output, &records).unwrap(), 2);

        let text = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(text, "ctg1\ttest\tgene\t100\t140\nctg1\ttest\tgene\t900\t940\n");
    }
}
