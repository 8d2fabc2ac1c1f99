use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Two-character code naming a definition (`#WAVxx`, `#BPMxx`, ...) or a
/// channel value. Case-insensitive; stored upper-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId([u8; 2]);

impl DefId {
    /// Value that marks an empty slot in a channel message.
    pub const REST: DefId = DefId(*b"00");

    pub fn parse(text: &str) -> Result<Self> {
        match text.as_bytes() {
            [a, b] if a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(Error::validation("definition id", text)),
        }
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII alphanumerics are ever stored
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }

    /// Interpret the code as a base-16 number.
    pub fn to_hex_value(&self) -> Option<u32> {
        u32::from_str_radix(self.as_str(), 16).ok()
    }
}

impl FromStr for DefId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
