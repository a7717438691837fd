mod charset;
mod ctx;
mod error;
mod executor;
mod filename;
mod generator;
mod hash;
mod walker;

pub use {
    charset::Charset,
    ctx::{ChainWalkerCtx, ChainWalkerCtxBuilder, PlainSpace},
    error::{RtError, RtResult},
    executor::{run_chains, ChainResult, ChainTask},
    filename::{parse_table_filename, table_filename, TableFileName},
    generator::{GenerateConfig, TableGenerator},
    hash::{DigestBuf, HashRoutine, MAX_DIGEST_LEN},
    walker::{hash_to_index, index_to_plain, plain_to_hash, plain_to_index, walk_chain, Walker},
};

/// The default chain length.
pub const DEFAULT_CHAIN_LENGTH: u64 = 3800;

/// The default number of chains per table.
pub const DEFAULT_NUM_CHAINS: u64 = 10_000;

/// The default minimum plaintext length.
pub const DEFAULT_MIN_LENGTH: u8 = 1;

/// The default maximum plaintext length.
pub const DEFAULT_MAX_LENGTH: u8 = 7;

/// The default charset name.
pub const DEFAULT_CHARSET: &str = "loweralpha";

/// The maximum plaintext length allowed.
pub const MAX_PLAIN_LENGTH: usize = 9;

/// Tables with this many chains or more would cross the 2 GiB file limit.
pub const MAX_CHAINS: u64 = 134_217_728;

/// Reduction offsets of adjacent table indexes are spaced by this stride.
pub const REDUCE_OFFSET_STRIDE: u64 = 65_536;

/// The size in bytes of one (start, end) record in a table file.
pub const RECORD_SIZE: u64 = 16;

/// Records are flushed to disk and progress is reported every this many chains.
pub const FLUSH_INTERVAL: u64 = 100_000;
