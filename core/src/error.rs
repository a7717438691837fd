use std::io;

use thiserror::Error;

pub type RtResult<T> = std::result::Result<T, RtError>;

#[derive(Error, Debug)]
pub enum RtError {
    #[error("unsupported hash routine `{0}`, expected one of: md5, sha1")]
    UnsupportedHash(String),

    #[error("unsupported charset `{0}`")]
    UnsupportedCharset(String),

    #[error("plaintext lengths must satisfy 1 <= min <= max <= 9, got {min}-{max}")]
    LengthOutOfRange { min: u8, max: u8 },

    #[error("the chain length must be greater than zero")]
    ChainLengthZero,

    #[error("the number of chains must be greater than zero")]
    NumChainsZero,

    #[error("a table of {0} chains would exceed the 2 GiB file limit of 134217727 records")]
    TableTooLarge(u64),

    #[error("the plaintext space does not fit in 64 bits, reduce the maximum length or the charset")]
    PlainSpaceTooLarge,

    #[error("unable to access the table file. Make sure the right permissions are available")]
    Io(#[from] io::Error),

    #[error("the table is already fully generated")]
    AlreadyFinished,

    #[error("the generation was cancelled")]
    Cancelled,

    #[error("`{0}` is not a valid rainbow table filename")]
    BadFilename(String),
}
