//! # GenePS CLI - prediction validation driver
//!
//! Validates region predictions of every GenePS group against one or more
//! genomes and writes FASTA, GFF and summary files.
//!
//! ## Usage
//!
//! ```bash
//! # One genome, output next to the result directory
//! geneps -m results/ -g genome.fa -r regions/
//!
//! # A list of genomes (path<TAB>prefix), four genomes at a time
//! geneps -m results/ -g genomes.txt -r regions/ -o out/ -t 4
//!
//! # Stricter coverage filter, keep merged region tables
//! geneps -m results/ -g genomes.txt -r regions/ -c 50 --keep
//! ```
//!
//! ## Options
//!
//! - `-m, --result-dir <DIR>`: Directory with `*.GenePS` files and cluster models
//! - `-g, --genome <FILE>`: Genome FASTA or `.txt` genome list
//! - `-r, --regions <DIR>`: Merged region tables (`<genome>/<group>.regions.tsv`)
//! - `-o, --out-dir <DIR>`: Output directory (default: parent of the result directory)
//! - `-c, --coverage-filter <INT>`: Minimal chunk coverage (default: 30)
//! - `-s, --hmm-filter <FLOAT>`: Score cutoff standard deviation factor (default: 2)
//! - `-t, --threads <INT>`: Genomes processed in parallel (default: all cores)
//! - `--keep`: Keep intermediate files
//! - `--verbose`: Echo the log to stderr
//! - `-q, --quiet`: Suppress progress messages

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use env_logger::{Builder, Target};
use log::{error, info, LevelFilter};

use geneps_core::collaborators::{ExonerateAligner, HmmsearchScorer, RegionTableFinder};
use geneps_core::config::GenePsConfig;
use geneps_core::constants::{DEFAULT_COVERAGE_MIN, DEFAULT_STD_FACTOR, VERSION};
use geneps_core::engine::Collaborators;
use geneps_core::genome::{resolve_genome_inputs, GenomeInput};
use geneps_core::model::{GenePsFileLoader, ModelLoader};
use geneps_core::output::{LOG_FILE, PREDICTION_DIR};
use geneps_core::{GenePsAnalyzer, GenePsError};

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn command() -> Command {
    Command::new("geneps")
        .version(VERSION)
        .about("Validates GenePS gene predictions and resolves overlapping loci")
        .arg(
            Arg::new("result-dir")
                .short('m')
                .long("result-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Directory with GenePS group files and cluster models"),
        )
        .arg(
            Arg::new("genome")
                .short('g')
                .long("genome")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Genome FASTA or .txt list of path<TAB>prefix lines"),
        )
        .arg(
            Arg::new("regions")
                .short('r')
                .long("regions")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Directory with merged region tables"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Output directory (default: parent of the result directory)"),
        )
        .arg(
            Arg::new("coverage-filter")
                .short('c')
                .long("coverage-filter")
                .value_name("INT")
                .value_parser(value_parser!(u32))
                .default_value("30")
                .help("Minimal chunk coverage of a region (%)"),
        )
        .arg(
            Arg::new("hmm-filter")
                .short('s')
                .long("hmm-filter")
                .value_name("FLOAT")
                .value_parser(value_parser!(f64))
                .default_value("2")
                .help("Standard deviation factor of the score cutoff"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("INT")
                .value_parser(value_parser!(usize))
                .help("Number of genomes processed in parallel"),
        )
        .arg(
            Arg::new("keep")
                .long("keep")
                .action(ArgAction::SetTrue)
                .help("Keep intermediate files"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Print the log to stderr as well"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Quiet mode"),
        )
        .arg(
            Arg::new("exonerate")
                .long("exonerate")
                .value_name("PATH")
                .default_value("exonerate")
                .help("exonerate executable"),
        )
        .arg(
            Arg::new("hmmsearch")
                .long("hmmsearch")
                .value_name("PATH")
                .default_value("hmmsearch")
                .help("hmmsearch executable"),
        )
}

/// Checked paths of a run.
struct RunPaths {
    result_dir: PathBuf,
    out_dir: PathBuf,
    regions_dir: PathBuf,
    genomes: Vec<GenomeInput>,
}

/// Checks every path argument and reports all problems at once.
fn check_arguments(matches: &ArgMatches) -> Result<RunPaths, GenePsError> {
    let mut errors = Vec::new();

    let result_dir = path_arg(matches, "result-dir");
    if !result_dir.is_dir() {
        errors.push(format!(
            "[!]\t ERROR: {} does not exist or is not a directory",
            result_dir.display()
        ));
    }

    let regions_dir = path_arg(matches, "regions");
    if !regions_dir.is_dir() {
        errors.push(format!(
            "[!]\t ERROR: {} does not exist or is not a directory",
            regions_dir.display()
        ));
    }

    let out_dir = match matches.get_one::<PathBuf>("out-dir") {
        Some(out_dir) => {
            if !out_dir.is_dir() {
                errors.push(format!("[!]\t ERROR: {} does not exist", out_dir.display()));
            }
            out_dir.clone()
        }
        None => default_out_dir(&result_dir),
    };

    let genomes = match resolve_genome_inputs(&path_arg(matches, "genome")) {
        Ok(genomes) => genomes,
        Err(GenePsError::InvalidArguments(genome_errors)) => {
            errors.extend(genome_errors);
            Vec::new()
        }
        Err(e) => {
            errors.push(format!("[!]\t ERROR: {e}"));
            Vec::new()
        }
    };

    if errors.is_empty() {
        Ok(RunPaths {
            result_dir,
            out_dir,
            regions_dir,
            genomes,
        })
    } else {
        Err(GenePsError::InvalidArguments(errors))
    }
}

fn path_arg(matches: &ArgMatches, id: &str) -> PathBuf {
    matches.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn default_out_dir(result_dir: &Path) -> PathBuf {
    fs::canonicalize(result_dir)
        .ok()
        .and_then(|dir| dir.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Log sink writing to `LOG.txt` and optionally echoing to stderr.
struct LogSink {
    file: File,
    echo: bool,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        if self.echo {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

fn init_logging(log_path: &Path, verbose: bool) -> Result<(), Box<dyn Error>> {
    let sink = LogSink {
        file: File::create(log_path)?,
        echo: verbose,
    };
    Builder::new()
        .filter_level(LevelFilter::Info)
        .format(|buf, record| writeln!(buf, "[{}] {} {}", record.target(), record.level(), record.args()))
        .target(Target::Pipe(Box::new(sink)))
        .try_init()?;
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = command().get_matches();

    let config = GenePsConfig {
        coverage_min: matches
            .get_one::<u32>("coverage-filter")
            .copied()
            .unwrap_or(DEFAULT_COVERAGE_MIN),
        std_factor: matches
            .get_one::<f64>("hmm-filter")
            .copied()
            .unwrap_or(DEFAULT_STD_FACTOR),
        keep_intermediate: matches.get_flag("keep"),
        quiet: matches.get_flag("quiet"),
        num_threads: matches.get_one::<usize>("threads").copied(),
    };

    let paths = check_arguments(&matches)?;
    let catalog = GenePsFileLoader::new(config.std_factor).load(&paths.result_dir)?;

    let prediction_dir = paths.out_dir.join(PREDICTION_DIR);
    fs::create_dir_all(&prediction_dir)?;
    init_logging(&prediction_dir.join(LOG_FILE), matches.get_flag("verbose"))?;

    let banner = format!(
        "# {} Genome(s) - {} Group(s) - {} Cluster(s)",
        paths.genomes.len(),
        catalog.groups.len(),
        catalog.cluster_count()
    );
    info!("{banner}");
    if !config.quiet {
        eprintln!("{banner}");
    }

    let regions = RegionTableFinder::new(&paths.regions_dir);
    let aligner = ExonerateAligner::new(matches.get_one::<String>("exonerate").map_or("exonerate", String::as_str));
    let scorer = HmmsearchScorer::new(matches.get_one::<String>("hmmsearch").map_or("hmmsearch", String::as_str));
    let analyzer = GenePsAnalyzer::new(
        config,
        &catalog,
        Collaborators {
            regions: &regions,
            aligner: &aligner,
            scorer: &scorer,
        },
    );

    let outcomes = analyzer.process_genomes(&paths.genomes, &prediction_dir)?;
    let mut failed = 0;
    for (input, outcome) in paths.genomes.iter().zip(outcomes) {
        match outcome {
            Ok(result) => info!(
                "Genome {} done: {} valid, {} filtered",
                result.genome,
                result.valid_count(),
                result.filtered_count()
            ),
            Err(e) => {
                error!("Genome {} failed: {e}", input.prefix);
                eprintln!("[!] Genome {} failed: {e}", input.prefix);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} genome(s) failed", paths.genomes.len()).into());
    }
    if !analyzer.config().quiet {
        eprintln!("Analysis complete! Results in {}", prediction_dir.display());
    }
    Ok(())
}
