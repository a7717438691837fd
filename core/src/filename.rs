use crate::{
    ctx::ChainWalkerCtx,
    error::{RtError, RtResult},
};

/// Encodes the full parameter set of a table into its canonical filename:
/// `<hashtype>_<charset>#<min>-<max>_<tableindex>_<chainlength>x<numchains>_<part>.rt`
///
/// The part suffix is free-form and may be empty; its leading `_` is
/// always emitted.
pub fn table_filename(ctx: &ChainWalkerCtx, part: &str) -> String {
    format!(
        "{}_{}#{}-{}_{}_{}x{}_{}.rt",
        ctx.hash_routine.name(),
        ctx.charset.name(),
        ctx.min_length,
        ctx.max_length,
        ctx.table_index,
        ctx.chain_length,
        ctx.num_chains,
        part,
    )
}

/// The parameters recovered from a table filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableFileName {
    pub hash_name: String,
    pub charset_name: String,
    pub min_length: u8,
    pub max_length: u8,
    pub table_index: u32,
    pub chain_length: u64,
    pub num_chains: u64,
    pub part: String,
}

/// Decodes a canonical table filename, the inverse of [`table_filename`].
pub fn parse_table_filename(name: &str) -> RtResult<TableFileName> {
    let err = || RtError::BadFilename(name.to_owned());

    let stem = name.strip_suffix(".rt").ok_or_else(err)?;
    let (hash_name, rest) = stem.split_once('_').ok_or_else(err)?;
    let (charset_name, rest) = rest.split_once('#').ok_or_else(err)?;
    let (lengths, rest) = rest.split_once('_').ok_or_else(err)?;
    let (min, max) = lengths.split_once('-').ok_or_else(err)?;
    let (table_index, rest) = rest.split_once('_').ok_or_else(err)?;
    let (dims, part) = rest.split_once('_').ok_or_else(err)?;
    let (chain_length, num_chains) = dims.split_once('x').ok_or_else(err)?;

    Ok(TableFileName {
        hash_name: hash_name.to_owned(),
        charset_name: charset_name.to_owned(),
        min_length: min.parse().map_err(|_| err())?,
        max_length: max.parse().map_err(|_| err())?,
        table_index: table_index.parse().map_err(|_| err())?,
        chain_length: chain_length.parse().map_err(|_| err())?,
        num_chains: num_chains.parse().map_err(|_| err())?,
        part: part.to_owned(),
    })
}
