use arrayvec::ArrayVec;

use crate::{ctx::ChainWalkerCtx, hash::DigestBuf, MAX_PLAIN_LENGTH};

/// The mutable (index, plaintext, hash) triple of one chain walk.
/// Each worker owns its own value; nothing here is shared.
#[derive(Clone, Debug, Default)]
pub struct Walker {
    /// The current index into the plaintext space.
    pub index: u64,
    /// The current plaintext.
    pub plain: ArrayVec<u8, MAX_PLAIN_LENGTH>,
    /// The digest of the current plaintext.
    pub hash: DigestBuf,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolves the walker's index into a plaintext.
///
/// The index falls in exactly one length bucket
/// `[plain_space_upto_x[len - 1], plain_space_upto_x[len])`; the remainder
/// within the bucket expands to base-charset digits with the
/// lowest-significance character at the last position.
///
/// The caller guarantees `index < plain_space_total`.
#[inline]
pub fn index_to_plain(ctx: &ChainWalkerCtx, walker: &mut Walker) {
    debug_assert!(walker.index < ctx.plain_space_total);

    let mut len = ctx.min_length as usize;
    while walker.index >= ctx.plain_space_upto_x[len] {
        len += 1;
    }

    let c = ctx.charset.len() as u64;
    let charset = ctx.charset.bytes();
    let mut r = walker.index - ctx.plain_space_upto_x[len - 1];

    walker.plain.clear();
    for _ in 0..len {
        walker.plain.push(0);
    }
    for k in (0..len).rev() {
        walker.plain[k] = charset[(r % c) as usize];
        r /= c;
    }
}

/// Hashes the walker's plaintext into its digest buffer.
#[inline]
pub fn plain_to_hash(ctx: &ChainWalkerCtx, walker: &mut Walker) {
    walker.hash = ctx.hash_routine.digest(&walker.plain);
}

/// Reduces the walker's digest back to an index.
///
/// The first 4 raw digest bytes are read as a little-endian u32; the
/// reduce offset of the table and the column position `pos` are added
/// before taking the remainder, so that the reduction differs per table
/// and per column.
#[inline]
pub fn hash_to_index(ctx: &ChainWalkerCtx, walker: &mut Walker, pos: u64) {
    let r = u32::from_le_bytes(walker.hash[0..4].try_into().unwrap()) as u64;
    walker.index = r.wrapping_add(ctx.reduce_offset).wrapping_add(pos) % ctx.plain_space_total;
}

/// Walks a full chain from `start`, returning the chain's end index.
///
/// Deterministic over its inputs: the same context and start index always
/// produce the same end index.
pub fn walk_chain(ctx: &ChainWalkerCtx, walker: &mut Walker, start: u64) -> u64 {
    walker.index = start;
    for pos in 0..ctx.chain_length {
        index_to_plain(ctx, walker);
        plain_to_hash(ctx, walker);
        hash_to_index(ctx, walker, pos);
    }

    walker.index
}

/// Re-encodes a plaintext into its index, the inverse of [`index_to_plain`].
pub fn plain_to_index(ctx: &ChainWalkerCtx, plain: &[u8]) -> u64 {
    let c = ctx.charset.len() as u64;
    let mut r = 0;
    for &ch in plain {
        r = r * c + ctx.charset.position(ch).unwrap() as u64;
    }

    ctx.plain_space_upto_x[plain.len() - 1] + r
}
