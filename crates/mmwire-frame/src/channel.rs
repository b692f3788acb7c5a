//! Channel tags.
//!
//! The tag is a single byte. Four values are in use by the dashboard backend;
//! any other byte is still a valid frame and is left to the consumer.

use std::fmt;

/// Informational notification.
pub const INFO: Channel = Channel(b'N');

/// Warning notification.
pub const WARNING: Channel = Channel(b'W');

/// Error notification.
pub const ERROR: Channel = Channel(b'E');

/// Error notification, lowercase form emitted by older backends.
pub const ERROR_ALT: Channel = Channel(b'e');

/// A one-byte channel tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(pub u8);

impl Channel {
    /// The raw tag byte.
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// The tag as a character. Bytes above 0x7F map to U+0080..U+00FF.
    pub fn as_char(self) -> char {
        char::from(self.0)
    }

    /// Returns a human-readable name for the tag.
    pub fn name(self) -> &'static str {
        match self {
            INFO => "INFO",
            WARNING => "WARNING",
            ERROR | ERROR_ALT => "ERROR",
            _ => "UNKNOWN",
        }
    }

    /// Returns true for the tags the backend is known to emit.
    pub fn is_known(self) -> bool {
        matches!(self, INFO | WARNING | ERROR | ERROR_ALT)
    }
}

impl From<u8> for Channel {
    fn from(tag: u8) -> Self {
        Self(tag)
    }
}

impl TryFrom<char> for Channel {
    type Error = char;

    /// Only single-byte characters can be carried as a tag.
    fn try_from(tag: char) -> std::result::Result<Self, char> {
        u8::try_from(tag).map(Self).map_err(|_| tag)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "{}", self.as_char())
        } else {
            write!(f, "\\x{:02x}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags() {
        assert!(INFO.is_known());
        assert!(ERROR_ALT.is_known());
        assert!(!Channel(b'X').is_known());
        assert_eq!(ERROR_ALT.name(), "ERROR");
        assert_eq!(Channel(b'?').name(), "UNKNOWN");
    }

    #[test]
    fn char_conversion() {
        assert_eq!(Channel::try_from('N').unwrap(), INFO);
        assert_eq!(Channel::try_from('é').unwrap().as_byte(), 0xE9);
        assert_eq!(Channel::try_from('€').unwrap_err(), '€');
    }

    #[test]
    fn display_escapes_control_bytes() {
        assert_eq!(INFO.to_string(), "N");
        assert_eq!(Channel(0).to_string(), "\\x00");
    }
}
