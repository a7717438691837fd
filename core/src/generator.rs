use std::{
    fs::File,
    io::{BufWriter, Seek, SeekFrom, Write},
    path::PathBuf,
    sync::atomic::AtomicBool,
    time::Instant,
};

use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::info;

use crate::{
    ctx::ChainWalkerCtx,
    error::{RtError, RtResult},
    executor::{run_chains, ChainTask},
    filename::table_filename,
    FLUSH_INTERVAL, RECORD_SIZE,
};

/// Runtime knobs of a generation run, separate from the chain-walker
/// parameters that define the table itself.
#[derive(Clone, Debug)]
pub struct GenerateConfig {
    /// The directory receiving the table file.
    pub out_dir: PathBuf,
    /// Free-form suffix embedded in the table filename.
    pub part: String,
    /// The number of worker threads.
    pub workers: usize,
    /// Fixed seed for the start index generator, for reproducible tables.
    /// Seeded from OS entropy when absent.
    pub seed: Option<u64>,
}

/// Drives chain generation and persists the table.
///
/// The table file is a flat sequence of 16-byte records, the start and end
/// index of one chain as two little-endian u64s, in chain order. A run
/// interrupted between records can be resumed: whole records are kept, a
/// ragged tail is discarded.
pub struct TableGenerator {
    ctx: ChainWalkerCtx,
    config: GenerateConfig,
}

impl TableGenerator {
    pub fn new(ctx: ChainWalkerCtx, config: GenerateConfig) -> Self {
        Self { ctx, config }
    }

    /// The canonical path of the table file.
    pub fn path(&self) -> PathBuf {
        self.config
            .out_dir
            .join(table_filename(&self.ctx, &self.config.part))
    }

    /// Generates the table, resuming from whatever the file already holds.
    ///
    /// Returns [`RtError::AlreadyFinished`] when the file holds all the
    /// records (callers treat that as success), [`RtError::Cancelled`]
    /// when the flag is raised mid-run. Completed records are flushed on
    /// every exit path so the file stays resumable.
    pub fn run(&self, cancel: &AtomicBool) -> RtResult<()> {
        let path = self.path();
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let file_len = file.metadata()?.len();
        let completed = file_len / RECORD_SIZE;
        if completed >= self.ctx.num_chains {
            return Err(RtError::AlreadyFinished);
        }
        if file_len % RECORD_SIZE != 0 {
            // a crash mid-write leaves a partial record, drop it
            file.set_len(completed * RECORD_SIZE)?;
        }
        file.seek(SeekFrom::Start(completed * RECORD_SIZE))?;

        if completed > 0 {
            info!("resuming {} from chain {completed}", path.display());
        }
        info!(
            "generating {}: {} chains of length {} over a space of {} plaintexts",
            path.display(),
            self.ctx.num_chains,
            self.ctx.chain_length,
            self.ctx.plain_space_total,
        );

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // one draw per chain, in chain order; skip the draws of the
        // records already on disk so a resumed run reproduces the rest
        for _ in 0..completed {
            rng.next_u64();
        }

        let space = self.ctx.plain_space_total;
        let tasks = (completed..self.ctx.num_chains).map(move |chain_index| ChainTask {
            chain_index,
            start: rng.next_u64() % space,
        });

        let started = Instant::now();
        let total = self.ctx.num_chains;
        let mut writer = BufWriter::new(file);
        let mut done = completed;

        let outcome = run_chains(
            &self.ctx,
            completed,
            tasks,
            self.config.workers,
            cancel,
            |result| {
                writer.write_all(&result.start.to_le_bytes())?;
                writer.write_all(&result.end.to_le_bytes())?;
                done += 1;
                if done % FLUSH_INTERVAL == 0 {
                    writer.flush()?;
                    writer.get_ref().sync_data()?;
                    info!("{done}/{total} chains ({:.1?} elapsed)", started.elapsed());
                }
                Ok(())
            },
        );

        writer.flush()?;
        writer.get_ref().sync_data()?;
        outcome?;

        info!(
            "{done}/{total} chains ({:.1?} elapsed), table complete",
            started.elapsed()
        );

        Ok(())
    }
}
