#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub const GROUP_FILE: &str = "#group: groupA\n\
                              #group_size: 2\n\
                              #single_copy_ortholog: yes\n\
                              #name: c1\n\
                              #score: 200,10\n\
                              #length: 10,20\n\
                              MAAAAAAAAAAAAAAA\n\
                              #name: c2\n\
                              #score: 200,10\n\
                              #length: 10,20\n\
                              MKKKKKKKKKKKKKKK\n";

/// The `geneps` binary under test
pub fn geneps() -> Command {
    Command::cargo_bin("geneps").unwrap()
}

/// Writes a result directory with one group of two clusters.
pub fn write_model_dir(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("groupA.GenePS"), GROUP_FILE).unwrap();
    for cluster in ["c1", "c2"] {
        for suffix in [".hmmGenePS", ".TN.hmmGenePS", ".fa_GenePS"] {
            fs::write(dir.join(format!("{cluster}{suffix}")), "").unwrap();
        }
    }
}

/// Writes a one-contig genome and returns its path.
pub fn write_genome(dir: &Path) -> PathBuf {
    let path = dir.join("genome.fa");
    fs::write(&path, format!(">ctg1\n{}\n", "ACGT".repeat(250))).unwrap();
    path
}

/// Writes the merged region table of `groupA` for `genome`.
pub fn write_regions(root: &Path, genome: &str, table: &str) {
    let dir = root.join(genome);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("groupA.regions.tsv"), table).unwrap();
}

/// Stand-ins for exonerate and hmmsearch.
///
/// The aligner predicts a 16 residue protein at local offsets 10-58 for
/// every region; the scorer gives every protein 250.
#[cfg(unix)]
pub fn write_fake_tools(dir: &Path) -> (PathBuf, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let exonerate = dir.join("exonerate");
    let coding = format!("ATG{}", "GCT".repeat(15));
    fs::write(
        &exonerate,
        format!(
            "#!/bin/sh\n\
             printf '# --- START OF GFF DUMP ---\\n'\n\
             printf 'target\\texonerate:protein2genome:local\\tgene\\t11\\t58\\t250\\t+\\t.\\tgene_id 1\\n'\n\
             printf '# --- END OF GFF DUMP ---\\n'\n\
             printf '##geneps\\t10\\t58\\n{coding}\\n##end\\n'\n"
        ),
    )
    .unwrap();

    let hmmsearch = dir.join("hmmsearch");
    fs::write(
        &hmmsearch,
        "#!/bin/sh\n\
         grep '^>' \"$5\" | sed 's/^>//' | while read -r label; do\n\
         echo \"$label - c1 - 1e-50 250.0 0.0\"\n\
         done > \"$3\"\n",
    )
    .unwrap();

    for tool in [&exonerate, &hmmsearch] {
        fs::set_permissions(tool, fs::Permissions::from_mode(0o755)).unwrap();
    }
    (exonerate, hmmsearch)
}
