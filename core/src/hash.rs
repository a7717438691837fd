use arrayvec::ArrayVec;
use digest::Digest;
use md5::Md5;
use sha1::Sha1;

use crate::error::{RtError, RtResult};

/// The largest digest size of the supported hash routines, in bytes.
pub const MAX_DIGEST_LEN: usize = 20;

/// A raw digest stored in a stack-allocated vector.
pub type DigestBuf = ArrayVec<u8, MAX_DIGEST_LEN>;

/// All the supported hash routines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashRoutine {
    Md5,
    Sha1,
}

impl HashRoutine {
    /// Looks up a hash routine by name, case-insensitively.
    pub fn from_name(name: &str) -> RtResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            _ => Err(RtError::UnsupportedHash(name.to_owned())),
        }
    }

    /// The canonical lowercase name, as embedded in table filenames.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// The full digest size in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
        }
    }

    /// Hashes a plaintext, returning the raw digest bytes.
    #[inline]
    pub fn digest(&self, plain: &[u8]) -> DigestBuf {
        let mut out = DigestBuf::new();
        match self {
            Self::Md5 => out.try_extend_from_slice(Md5::digest(plain).as_slice()).unwrap(),
            Self::Sha1 => out.try_extend_from_slice(Sha1::digest(plain).as_slice()).unwrap(),
        }

        out
    }
}
