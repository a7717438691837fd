use crate::error::{RtError, RtResult};

const ALPHA: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NUMERIC: &[u8] = b"0123456789";
const ALPHA_NUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWERALPHA_NUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ALPHA_NUMERIC_SYMBOL14: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_+=";
const ALL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_+=~`[]{}|\\:;\"'<>,.?/";

/// An ordered set of plaintext characters.
///
/// The order is load-bearing: indexes into the charset are what the
/// plainspace arithmetic enumerates, so two charsets with the same bytes
/// in a different order describe different tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset {
    name: &'static str,
    bytes: Vec<u8>,
}

impl Charset {
    /// Looks up a charset by its canonical name.
    pub fn from_name(name: &str) -> RtResult<Self> {
        let (name, bytes) = match name {
            "alpha" => ("alpha", ALPHA.to_vec()),
            "loweralpha" => ("loweralpha", LOWERALPHA.to_vec()),
            "numeric" => ("numeric", NUMERIC.to_vec()),
            "alpha-numeric" => ("alpha-numeric", ALPHA_NUMERIC.to_vec()),
            "loweralpha-numeric" => ("loweralpha-numeric", LOWERALPHA_NUMERIC.to_vec()),
            "alpha-numeric-symbol14" => ("alpha-numeric-symbol14", ALPHA_NUMERIC_SYMBOL14.to_vec()),
            "all" => ("all", ALL.to_vec()),
            "byte" => ("byte", (0..=255).collect()),
            _ => return Err(RtError::UnsupportedCharset(name.to_owned())),
        };

        Ok(Charset { name, bytes })
    }

    /// The canonical name, as embedded in table filenames.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Position of an ASCII character in the charset.
    pub fn position(&self, c: u8) -> Option<usize> {
        self.bytes.iter().position(|x| *x == c)
    }
}

#[cfg(test)]
mod tests {
    use super::Charset;
    use crate::error::RtError;

    #[test]
    fn test_catalog_sizes() {
        for (name, len) in [
            ("alpha", 26),
            ("loweralpha", 26),
            ("numeric", 10),
            ("alpha-numeric", 36),
            ("loweralpha-numeric", 36),
            ("alpha-numeric-symbol14", 50),
            ("all", 68),
            ("byte", 256),
        ] {
            assert_eq!(len, Charset::from_name(name).unwrap().len(), "{name}");
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let alpha_numeric = Charset::from_name("alpha-numeric").unwrap();
        assert_eq!(b'A', alpha_numeric.bytes()[0]);
        assert_eq!(b'Z', alpha_numeric.bytes()[25]);
        assert_eq!(b'0', alpha_numeric.bytes()[26]);
        assert_eq!(b'9', alpha_numeric.bytes()[35]);

        let symbol14 = Charset::from_name("alpha-numeric-symbol14").unwrap();
        assert_eq!(b'!', symbol14.bytes()[36]);
        assert_eq!(b'=', symbol14.bytes()[49]);

        let all = Charset::from_name("all").unwrap();
        assert_eq!(b'~', all.bytes()[50]);
        assert_eq!(b'/', all.bytes()[67]);
    }

    #[test]
    fn test_byte_charset_is_identity() {
        let byte = Charset::from_name("byte").unwrap();
        for i in 0..=255u8 {
            assert_eq!(i, byte.bytes()[i as usize]);
        }
    }

    #[test]
    fn test_position() {
        let numeric = Charset::from_name("numeric").unwrap();
        assert_eq!(Some(7), numeric.position(b'7'));
        assert_eq!(None, numeric.position(b'a'));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!(matches!(
            Charset::from_name("base64"),
            Err(RtError::UnsupportedCharset(_))
        ));
    }
}
