use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use rtforge_core::{walk_chain, ChainWalkerCtxBuilder, Charset, HashRoutine, Walker};

const BENCH_CHAIN_LENGTH: u64 = 10_000;
const BENCH_DURATION: Duration = Duration::from_secs(2);

/// Walks chains on a single worker for a fixed wall-time slice per hash
/// routine and reports the step throughput. This exercises the exact code
/// path of table generation, so the numbers translate directly to
/// expected generation times.
pub fn run() -> Result<()> {
    for routine in [HashRoutine::Md5, HashRoutine::Sha1] {
        let ctx = ChainWalkerCtxBuilder::new()
            .hash_routine(routine)
            .charset(Charset::from_name("loweralpha")?)
            .min_length(1)
            .max_length(7)
            .chain_length(BENCH_CHAIN_LENGTH)
            .build()?;

        let mut walker = Walker::new();
        let started = Instant::now();
        let mut steps = 0u64;
        let mut start = 0u64;

        while started.elapsed() < BENCH_DURATION {
            walk_chain(&ctx, &mut walker, start % ctx.plain_space_total);
            steps += BENCH_CHAIN_LENGTH;
            start += 1;
        }

        let rate = steps as f64 / started.elapsed().as_secs_f64();
        info!("{}: {:.0} hashes/s", routine.name(), rate);
    }

    Ok(())
}
