use std::fmt;

use mmwire_frame::Channel;
use serde::{Deserialize, Serialize};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Severity carried by a channel tag.
    ///
    /// `N` is info, `W` warning, `E` and `e` error. Every other tag maps to
    /// `None` and is not an error.
    pub fn from_tag(channel: Channel) -> Option<Self> {
        match channel.as_byte() {
            b'N' => Some(Self::Info),
            b'W' => Some(Self::Warning),
            b'E' | b'e' => Some(Self::Error),
            _ => None,
        }
    }

    /// The tag the backend uses for this severity.
    pub fn tag(self) -> Channel {
        match self {
            Self::Info => mmwire_frame::INFO,
            Self::Warning => mmwire_frame::WARNING,
            Self::Error => mmwire_frame::ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_table() {
        assert_eq!(Severity::from_tag(Channel(b'N')), Some(Severity::Info));
        assert_eq!(Severity::from_tag(Channel(b'W')), Some(Severity::Warning));
        assert_eq!(Severity::from_tag(Channel(b'E')), Some(Severity::Error));
        assert_eq!(Severity::from_tag(Channel(b'e')), Some(Severity::Error));
    }

    #[test]
    fn unknown_tags_have_no_severity() {
        for tag in [b'n', b'w', b'X', b'0', 0u8, 0xFF] {
            assert_eq!(Severity::from_tag(Channel(tag)), None);
        }
    }

    #[test]
    fn tag_roundtrip() {
        for severity in [Severity::Info, Severity::Warning, Severity::Error] {
            assert_eq!(Severity::from_tag(severity.tag()), Some(severity));
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
    }
}
