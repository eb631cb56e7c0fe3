use serde::{de, Deserialize, Deserializer};
use std::{fmt, str::FromStr};

/// A single Unicode scalar value used as one alphabet symbol.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codepoint(char);

/// Error returned when text can't be read as a hexadecimal codepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodepointError {
    input: String,
    kind: ParseCodepointErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseCodepointErrorKind {
    Empty,
    InvalidDigit,
    NotScalarValue,
}

impl fmt::Display for ParseCodepointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseCodepointErrorKind::Empty => write!(f, "empty codepoint literal"),
            ParseCodepointErrorKind::InvalidDigit => {
                write!(f, "invalid hexadecimal codepoint literal {:?}", self.input)
            }
            ParseCodepointErrorKind::NotScalarValue => {
                write!(f, "{:?} is not a Unicode scalar value", self.input)
            }
        }
    }
}

impl std::error::Error for ParseCodepointError {}

impl Codepoint {
    /// Wraps a `char`.
    pub const fn new(ch: char) -> Self {
        Codepoint(ch)
    }

    /// Converts a raw value, returning `None` for surrogates and values above `U+10FFFF`.
    pub fn from_u32(v: u32) -> Option<Self> {
        char::from_u32(v).map(Codepoint)
    }

    /// Parses a hexadecimal literal. Accepts an optional `0x`, `0X`, `U+` or `u+` prefix
    /// and digits of either case.
    pub fn from_hex(text: &str) -> Result<Self, ParseCodepointError> {
        let err = |kind| ParseCodepointError {
            input: text.to_owned(),
            kind,
        };
        let trimmed = text.trim();
        let digits = ["0x", "0X", "U+", "u+"]
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(err(ParseCodepointErrorKind::Empty));
        }
        if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err(ParseCodepointErrorKind::InvalidDigit));
        }
        let v = u32::from_str_radix(digits, 16)
            .map_err(|_| err(ParseCodepointErrorKind::InvalidDigit))?;
        Self::from_u32(v).ok_or_else(|| err(ParseCodepointErrorKind::NotScalarValue))
    }

    /// The wrapped `char`.
    pub fn as_char(self) -> char {
        self.0
    }

    /// The scalar value.
    pub fn value(self) -> u32 {
        self.0 as u32
    }

    /// Lowercase hexadecimal form without prefix, as used by alphabet files and the name cache.
    pub fn to_hex(self) -> String {
        format!("{:x}", self.value())
    }
}

impl FromStr for Codepoint {
    type Err = ParseCodepointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.value())
    }
}

impl fmt::Debug for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codepoint(U+{:04X} '{}')", self.value(), self.0.escape_debug())
    }
}

impl fmt::LowerHex for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value(), f)
    }
}

impl<'de> Deserialize<'de> for Codepoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Codepoint::from_hex(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Codepoint;

    #[test]
    fn test_parse_prefixes() {
        let grin = Codepoint::new('\u{1F600}');
        assert_eq!(Ok(grin), Codepoint::from_hex("1F600"));
        assert_eq!(Ok(grin), Codepoint::from_hex("0x1F600"));
        assert_eq!(Ok(grin), Codepoint::from_hex("U+1f600"));
        assert_eq!(Ok(grin), " 1f600\n".parse());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Codepoint::from_hex("").is_err());
        assert!(Codepoint::from_hex("0x").is_err());
        assert!(Codepoint::from_hex("1F60G").is_err());
        assert!(Codepoint::from_hex("+1F600").is_err());
        // surrogate and out of range
        assert!(Codepoint::from_hex("D800").is_err());
        assert!(Codepoint::from_hex("110000").is_err());
    }

    #[test]
    fn test_hex_forms() {
        let cp = Codepoint::new('\u{269C}');
        assert_eq!("269c", cp.to_hex());
        assert_eq!("269c", format!("{:x}", cp));
        assert_eq!("U+269C", cp.to_string());
        assert_eq!("U+0041", Codepoint::new('A').to_string());
    }

    #[test]
    fn test_deserialize_from_toml_string() {
        #[derive(serde::Deserialize)]
        struct Holder {
            cp: Codepoint,
        }
        let holder: Holder = toml::from_str("cp = \"0x1F3CD\"").unwrap();
        assert_eq!(Codepoint::new('\u{1F3CD}'), holder.cp);
        assert!(toml::from_str::<Holder>("cp = \"zz\"").is_err());
    }
}
