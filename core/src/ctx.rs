use arrayvec::ArrayVec;
use tracing::warn;

use crate::{
    charset::Charset,
    error::{RtError, RtResult},
    hash::HashRoutine,
    DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET, DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH,
    DEFAULT_NUM_CHAINS, MAX_CHAINS, MAX_PLAIN_LENGTH, REDUCE_OFFSET_STRIDE,
};

/// Cumulative plaintext counts, one entry per length in `0..=max_length`.
pub type PlainSpace = ArrayVec<u64, { MAX_PLAIN_LENGTH + 1 }>;

/// A builder for a chain-walker context.
#[derive(Clone, Debug)]
pub struct ChainWalkerCtxBuilder {
    hash_routine: HashRoutine,
    charset: Charset,
    min_length: u8,
    max_length: u8,
    table_index: u32,
    chain_length: u64,
    num_chains: u64,
}

impl Default for ChainWalkerCtxBuilder {
    fn default() -> Self {
        Self {
            hash_routine: HashRoutine::Md5,
            charset: Charset::from_name(DEFAULT_CHARSET).unwrap(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            table_index: 0,
            chain_length: DEFAULT_CHAIN_LENGTH,
            num_chains: DEFAULT_NUM_CHAINS,
        }
    }
}

impl ChainWalkerCtxBuilder {
    /// Creates a new ChainWalkerCtxBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash routine of the context.
    pub fn hash_routine(mut self, hash_routine: HashRoutine) -> Self {
        self.hash_routine = hash_routine;

        self
    }

    /// Sets the charset of the context.
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;

        self
    }

    /// Sets the minimum plaintext length of the context.
    pub fn min_length(mut self, min_length: u8) -> Self {
        self.min_length = min_length;

        self
    }

    /// Sets the maximum plaintext length of the context.
    pub fn max_length(mut self, max_length: u8) -> Self {
        self.max_length = max_length;

        self
    }

    /// Sets the table index of the context.
    /// Tables with different indexes reduce through disjoint offset ranges
    /// and provide independent coverage of the plaintext space.
    pub fn table_index(mut self, table_index: u32) -> Self {
        self.table_index = table_index;

        self
    }

    /// Sets the chain length of the context.
    /// Increasing the chain length reduces the size of the table on disk
    /// but increases the time taken to attack it.
    pub fn chain_length(mut self, chain_length: u64) -> Self {
        self.chain_length = chain_length;

        self
    }

    /// Sets the number of chains of the context.
    pub fn num_chains(mut self, num_chains: u64) -> Self {
        self.num_chains = num_chains;

        self
    }

    /// Builds a ChainWalkerCtx with the specified parameters.
    ///
    /// All argument validation happens here, before any file is touched.
    /// Out-of-range values fail with a descriptive error, never clamp.
    pub fn build(self) -> RtResult<ChainWalkerCtx> {
        if self.min_length == 0
            || self.max_length as usize > MAX_PLAIN_LENGTH
            || self.min_length > self.max_length
        {
            return Err(RtError::LengthOutOfRange {
                min: self.min_length,
                max: self.max_length,
            });
        }

        if self.chain_length == 0 {
            return Err(RtError::ChainLengthZero);
        }

        if self.num_chains == 0 {
            return Err(RtError::NumChainsZero);
        }

        if self.num_chains >= MAX_CHAINS {
            warn!(
                "a table of {} chains would not fit in a 2 GiB file",
                self.num_chains
            );
            return Err(RtError::TableTooLarge(self.num_chains));
        }

        // cumulative counts of the enumerable space, per length.
        // lengths below the minimum contribute nothing but still get an entry.
        let c = self.charset.len() as u128;
        let mut total: u128 = 0;
        let mut plain_space_upto_x = PlainSpace::new();

        plain_space_upto_x.push(0);
        for i in 1..=self.max_length as u32 {
            if i >= self.min_length as u32 {
                total += c.pow(i);
            }
            if total > u64::MAX as u128 {
                return Err(RtError::PlainSpaceTooLarge);
            }
            plain_space_upto_x.push(total as u64);
        }

        Ok(ChainWalkerCtx {
            plain_space_total: total as u64,
            reduce_offset: REDUCE_OFFSET_STRIDE * self.table_index as u64,
            hash_routine: self.hash_routine,
            charset: self.charset,
            min_length: self.min_length,
            max_length: self.max_length,
            table_index: self.table_index,
            plain_space_upto_x,
            chain_length: self.chain_length,
            num_chains: self.num_chains,
        })
    }
}

/// The immutable parameter bundle shared by every worker of a generation run.
#[derive(Clone, Debug)]
pub struct ChainWalkerCtx {
    /// The hash routine used.
    pub hash_routine: HashRoutine,
    /// The charset used.
    pub charset: Charset,
    /// The minimum plaintext length.
    pub min_length: u8,
    /// The maximum plaintext length.
    pub max_length: u8,
    /// The table index.
    pub table_index: u32,
    /// The constant added to every reduction, `65536 * table_index`.
    pub reduce_offset: u64,
    /// Cumulative counts of the enumerable plaintext space: indexes in
    /// `[plain_space_upto_x[i-1], plain_space_upto_x[i])` name plaintexts
    /// of length `i`.
    pub plain_space_upto_x: PlainSpace,
    /// The size of the total search space.
    pub plain_space_total: u64,
    /// The length of a chain.
    pub chain_length: u64,
    /// The number of chains of the table.
    pub num_chains: u64,
}

#[cfg(test)]
pub fn build_test_ctx(hash: &str, charset: &str, min: u8, max: u8) -> ChainWalkerCtx {
    use crate::hash::HashRoutine;

    ChainWalkerCtxBuilder::new()
        .hash_routine(HashRoutine::from_name(hash).unwrap())
        .charset(Charset::from_name(charset).unwrap())
        .min_length(min)
        .max_length(max)
        .build()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::{build_test_ctx, ChainWalkerCtxBuilder};
    use crate::{charset::Charset, error::RtError, MAX_CHAINS};

    #[test]
    fn test_plain_space_cumulative_counts() {
        // S2 shape: numeric, lengths 1 to 3
        let ctx = build_test_ctx("sha1", "numeric", 1, 3);
        assert_eq!(&[0, 10, 110, 1110], ctx.plain_space_upto_x.as_slice());
        assert_eq!(1110, ctx.plain_space_total);

        // lengths below the minimum are skipped in index allocation
        let ctx = build_test_ctx("md5", "loweralpha", 2, 3);
        assert_eq!(&[0, 0, 676, 18252], ctx.plain_space_upto_x.as_slice());
        assert_eq!(18252, ctx.plain_space_total);
    }

    #[test]
    fn test_plain_space_partition_sums() {
        for (charset, min, max) in [
            ("numeric", 1, 3),
            ("loweralpha", 1, 5),
            ("alpha-numeric", 2, 4),
            ("all", 3, 3),
        ] {
            let ctx = build_test_ctx("md5", charset, min, max);
            let c = ctx.charset.len() as u64;
            let expected: u64 = (min..=max).map(|i| c.pow(i as u32)).sum();
            assert_eq!(expected, ctx.plain_space_total);
        }
    }

    #[test]
    fn test_reduce_offset() {
        // S3: table index 7 shifts every reduction by 458752
        let ctx = ChainWalkerCtxBuilder::new().table_index(7).build().unwrap();
        assert_eq!(458_752, ctx.reduce_offset);
    }

    #[test]
    fn test_length_bounds_are_enforced() {
        for (min, max) in [(0, 5), (1, 10), (5, 2)] {
            let result = ChainWalkerCtxBuilder::new()
                .min_length(min)
                .max_length(max)
                .build();
            assert!(matches!(result, Err(RtError::LengthOutOfRange { .. })));
        }
    }

    #[test]
    fn test_zero_counts_are_rejected() {
        assert!(matches!(
            ChainWalkerCtxBuilder::new().chain_length(0).build(),
            Err(RtError::ChainLengthZero)
        ));
        assert!(matches!(
            ChainWalkerCtxBuilder::new().num_chains(0).build(),
            Err(RtError::NumChainsZero)
        ));
    }

    #[test]
    fn test_table_too_large_is_rejected() {
        // S4: one record over the 2 GiB limit
        let result = ChainWalkerCtxBuilder::new().num_chains(MAX_CHAINS).build();
        assert!(matches!(result, Err(RtError::TableTooLarge(_))));
    }

    #[test]
    fn test_plain_space_overflow_is_rejected() {
        let result = ChainWalkerCtxBuilder::new()
            .charset(Charset::from_name("byte").unwrap())
            .min_length(1)
            .max_length(9)
            .build();
        assert!(matches!(result, Err(RtError::PlainSpaceTooLarge)));
    }
}
