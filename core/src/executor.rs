use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use crossbeam_channel::bounded;

use crate::{
    ctx::ChainWalkerCtx,
    error::{RtError, RtResult},
    walker::{walk_chain, Walker},
};

/// Unread tasks and results are capped per worker to bound memory under
/// skewed scheduling.
const QUEUE_DEPTH: usize = 1024;

/// One chain to compute.
#[derive(Clone, Copy, Debug)]
pub struct ChainTask {
    pub chain_index: u64,
    pub start: u64,
}

/// One computed chain.
#[derive(Clone, Copy, Debug, Eq)]
pub struct ChainResult {
    pub chain_index: u64,
    pub start: u64,
    pub end: u64,
}

impl Ord for ChainResult {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.chain_index.cmp(&other.chain_index)
    }
}

impl PartialOrd for ChainResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ChainResult {
    fn eq(&self, other: &Self) -> bool {
        self.chain_index == other.chain_index
    }
}

/// Runs chains across worker threads and hands every result to `sink`
/// in chain-index order.
///
/// Chains are mutually independent and may finish in any order; a bounded
/// reorder buffer restores the submission order so that the on-disk record
/// for chain `i` always lands at offset `i * 16`, whatever the scheduling.
///
/// Tasks must arrive in ascending `chain_index` order starting at
/// `first_chain`. A sink error stops the run and is returned as-is; a
/// raised cancellation flag stops it with [`RtError::Cancelled`]. Chains
/// in flight when the run stops are discarded, never handed to the sink.
pub fn run_chains<I, F>(
    ctx: &ChainWalkerCtx,
    first_chain: u64,
    tasks: I,
    workers: usize,
    cancel: &AtomicBool,
    mut sink: F,
) -> RtResult<()>
where
    I: Iterator<Item = ChainTask> + Send,
    F: FnMut(ChainResult) -> RtResult<()>,
{
    let workers = workers.max(1);

    thread::scope(|scope| {
        let (task_tx, task_rx) = bounded::<ChainTask>(workers * QUEUE_DEPTH);
        let (result_tx, result_rx) = bounded::<ChainResult>(workers * QUEUE_DEPTH);

        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move || {
                let mut walker = Walker::new();

                for task in task_rx.iter() {
                    // once cancelled, keep draining so the feeder never
                    // blocks on a full queue, but stop computing
                    if cancel.load(Ordering::Relaxed) {
                        continue;
                    }

                    let end = walk_chain(ctx, &mut walker, task.start);
                    let result = ChainResult {
                        chain_index: task.chain_index,
                        start: task.start,
                        end,
                    };
                    if result_tx.send(result).is_err() {
                        cancel.store(true, Ordering::Relaxed);
                    }
                }
            });
        }
        drop(task_rx);
        drop(result_tx);

        scope.spawn(move || {
            for task in tasks {
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                if task_tx.send(task).is_err() {
                    break;
                }
            }
        });

        let mut pending: BinaryHeap<Reverse<ChainResult>> = BinaryHeap::new();
        let mut next_chain = first_chain;
        let mut failure = None;

        'recv: for result in result_rx.iter() {
            pending.push(Reverse(result));

            loop {
                match pending.peek() {
                    Some(Reverse(r)) if r.chain_index == next_chain => {}
                    _ => break,
                }
                let Some(Reverse(result)) = pending.pop() else {
                    break;
                };

                if let Err(err) = sink(result) {
                    cancel.store(true, Ordering::Relaxed);
                    failure = Some(err);
                    break 'recv;
                }
                next_chain += 1;
            }
        }
        drop(result_rx);

        if let Some(err) = failure {
            return Err(err);
        }
        if cancel.load(Ordering::Relaxed) {
            return Err(RtError::Cancelled);
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::{run_chains, ChainTask};
    use crate::{
        ctx::build_test_ctx,
        error::RtError,
        walker::{walk_chain, Walker},
    };

    #[test]
    fn test_results_are_delivered_in_chain_order() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 3);
        let tasks = (0..200).map(|i| ChainTask {
            chain_index: i,
            start: (i * 37) % ctx.plain_space_total,
        });

        let mut walker = Walker::new();
        let serial: Vec<u64> = (0..200)
            .map(|i| walk_chain(&ctx, &mut walker, (i * 37) % ctx.plain_space_total))
            .collect();

        let cancel = AtomicBool::new(false);
        let mut seen = Vec::new();
        run_chains(&ctx, 0, tasks, 4, &cancel, |result| {
            seen.push(result);
            Ok(())
        })
        .unwrap();

        assert_eq!(200, seen.len());
        for (i, result) in seen.iter().enumerate() {
            assert_eq!(i as u64, result.chain_index);
            assert_eq!(serial[i], result.end);
        }
    }

    #[test]
    fn test_first_chain_offsets_the_order() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 2);
        let tasks = (50..80).map(|i| ChainTask {
            chain_index: i,
            start: i % ctx.plain_space_total,
        });

        let cancel = AtomicBool::new(false);
        let mut next = 50;
        run_chains(&ctx, 50, tasks, 3, &cancel, |result| {
            assert_eq!(next, result.chain_index);
            next += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(80, next);
    }

    #[test]
    fn test_cancellation_stops_the_run() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 2);
        let tasks = (0..1000).map(|i| ChainTask {
            chain_index: i,
            start: i % ctx.plain_space_total,
        });

        let cancel = AtomicBool::new(true);
        let mut delivered = 0;
        let result = run_chains(&ctx, 0, tasks, 2, &cancel, |_| {
            delivered += 1;
            Ok(())
        });

        assert!(matches!(result, Err(RtError::Cancelled)));
        assert_eq!(0, delivered);
    }

    #[test]
    fn test_sink_error_propagates() {
        let ctx = build_test_ctx("md5", "loweralpha", 1, 2);
        let tasks = (0..100).map(|i| ChainTask {
            chain_index: i,
            start: i % ctx.plain_space_total,
        });

        let cancel = AtomicBool::new(false);
        let mut delivered = 0;
        let result = run_chains(&ctx, 0, tasks, 2, &cancel, |_| {
            delivered += 1;
            if delivered == 10 {
                Err(RtError::ChainLengthZero)
            } else {
                Ok(())
            }
        });

        assert!(matches!(result, Err(RtError::ChainLengthZero)));
        assert_eq!(10, delivered);
        assert!(cancel.load(Ordering::Relaxed));
    }
}
