mod bench;

use std::{fs, path::PathBuf, sync::atomic::AtomicBool};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rtforge_core::{
    ChainWalkerCtxBuilder, Charset, GenerateConfig, HashRoutine, RtError, TableGenerator,
};

/// Rainbow table precomputation.
///
/// Generates a table of compressed hash chains for the given hash routine
/// and plaintext space, resuming a partially-written table when the file
/// already exists.
#[derive(Parser)]
#[command(name = "rtforge", version, about, long_about = None)]
struct Cli {
    /// The hash algorithm of the table (md5 or sha1).
    #[arg(long, required_unless_present = "benchmark")]
    hashtype: Option<String>,

    /// The charset of the plaintext space.
    #[arg(long, required_unless_present = "benchmark")]
    charset: Option<String>,

    /// The minimum plaintext length.
    #[arg(long, required_unless_present = "benchmark")]
    minlength: Option<u8>,

    /// The maximum plaintext length.
    #[arg(long, required_unless_present = "benchmark")]
    maxlength: Option<u8>,

    /// The table index, selecting the family of reduction functions.
    #[arg(long, required_unless_present = "benchmark")]
    tableindex: Option<u32>,

    /// The number of reduction columns in each chain.
    #[arg(long, required_unless_present = "benchmark")]
    chainlength: Option<u64>,

    /// The number of chains to generate.
    #[arg(long, required_unless_present = "benchmark")]
    numchains: Option<u64>,

    /// Free-form suffix embedded in the table filename.
    #[arg(long, default_value = "")]
    part: String,

    /// The directory where the table file is written.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// The number of worker threads. Defaults to the logical CPU count.
    #[arg(long)]
    threads: Option<usize>,

    /// Seed the start index generator for reproducible tables.
    #[arg(long)]
    seed: Option<u64>,

    /// Measure chain stepping throughput instead of generating a table.
    #[arg(long)]
    benchmark: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.benchmark {
        return bench::run();
    }

    let hashtype = cli.hashtype.context("--hashtype is required")?;
    let charset = cli.charset.context("--charset is required")?;
    let minlength = cli.minlength.context("--minlength is required")?;
    let maxlength = cli.maxlength.context("--maxlength is required")?;
    let tableindex = cli.tableindex.context("--tableindex is required")?;
    let chainlength = cli.chainlength.context("--chainlength is required")?;
    let numchains = cli.numchains.context("--numchains is required")?;

    let ctx = ChainWalkerCtxBuilder::new()
        .hash_routine(HashRoutine::from_name(&hashtype)?)
        .charset(Charset::from_name(&charset)?)
        .min_length(minlength)
        .max_length(maxlength)
        .table_index(tableindex)
        .chain_length(chainlength)
        .num_chains(numchains)
        .build()?;

    fs::create_dir_all(&cli.out_dir)
        .context("unable to create the directory to store the rainbow table")?;

    let config = GenerateConfig {
        out_dir: cli.out_dir,
        part: cli.part,
        workers: cli.threads.unwrap_or_else(num_cpus::get),
        seed: cli.seed,
    };

    let generator = TableGenerator::new(ctx, config);
    let cancel = AtomicBool::new(false);

    match generator.run(&cancel) {
        Ok(()) => Ok(()),
        Err(RtError::AlreadyFinished) => {
            info!("{} is already complete", generator.path().display());
            Ok(())
        }
        Err(err) => Err(err).context("table generation failed"),
    }
}
