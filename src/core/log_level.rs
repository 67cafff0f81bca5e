//! Log level definitions
//!
//! Levels are bit flags so a handler can declare any combination it accepts.
//! Entries themselves always carry exactly one of the four canonical bits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogLevel(u8);

impl LogLevel {
    pub const INFO: LogLevel = LogLevel(1);
    pub const WARNING: LogLevel = LogLevel(2);
    pub const ERROR: LogLevel = LogLevel(4);
    pub const FATAL: LogLevel = LogLevel(8);
    pub const ALL: LogLevel = LogLevel(1 | 2 | 4 | 8);

    const CANONICAL: [LogLevel; 4] = [
        LogLevel::INFO,
        LogLevel::WARNING,
        LogLevel::ERROR,
        LogLevel::FATAL,
    ];

    /// Build a level set from raw bits, discarding unknown bits
    pub const fn from_bits(bits: u8) -> Self {
        LogLevel(bits & LogLevel::ALL.0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `other` is set in `self`
    pub const fn contains(&self, other: LogLevel) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if this is exactly one of the four canonical levels
    pub const fn is_single(&self) -> bool {
        self.0 != 0 && self.0 & (self.0 - 1) == 0
    }

    /// Lowercase name of a single level, `None` for combinations
    pub fn to_str(&self) -> Option<&'static str> {
        match *self {
            LogLevel::INFO => Some("info"),
            LogLevel::WARNING => Some("warning"),
            LogLevel::ERROR => Some("error"),
            LogLevel::FATAL => Some("fatal"),
            _ => None,
        }
    }

    /// Iterate over the canonical levels contained in this set
    pub fn iter(&self) -> impl Iterator<Item = LogLevel> + '_ {
        let set = if self.is_empty() { LogLevel::ALL } else { *self };
        LogLevel::CANONICAL
            .into_iter()
            .filter(move |level| set.contains(*level))
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match *self {
            LogLevel::INFO => Green,
            LogLevel::WARNING => Yellow,
            LogLevel::ERROR => Red,
            LogLevel::FATAL => BrightRed,
            _ => White,
        }
    }
}

impl BitOr for LogLevel {
    type Output = LogLevel;

    fn bitor(self, rhs: Self) -> Self::Output {
        LogLevel(self.0 | rhs.0)
    }
}

impl BitOrAssign for LogLevel {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Canonical names joined by `|`; an empty set renders as every level.
impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, level) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str("|")?;
            }
            f.write_str(level.to_str().unwrap_or_default())?;
        }
        Ok(())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut level = LogLevel::default();
        for part in s.split('|').map(str::trim) {
            level |= match part.to_lowercase().as_str() {
                "info" => LogLevel::INFO,
                "warn" | "warning" => LogLevel::WARNING,
                "error" => LogLevel::ERROR,
                "fatal" => LogLevel::FATAL,
                "all" => LogLevel::ALL,
                _ => return Err(format!("Invalid log level: '{}'", s)),
            };
        }
        Ok(level)
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_level_names() {
        assert_eq!(LogLevel::INFO.to_string(), "info");
        assert_eq!(LogLevel::WARNING.to_string(), "warning");
        assert_eq!(LogLevel::ERROR.to_string(), "error");
        assert_eq!(LogLevel::FATAL.to_string(), "fatal");
    }

    #[test]
    fn test_combined_and_empty_levels() {
        let level = LogLevel::ERROR | LogLevel::INFO;
        assert_eq!(level.to_string(), "info|error");
        assert_eq!(LogLevel::default().to_string(), "info|warning|error|fatal");
        assert_eq!(LogLevel::ALL.to_string(), "info|warning|error|fatal");
    }

    #[test]
    fn test_contains() {
        assert!(LogLevel::ALL.contains(LogLevel::FATAL));
        assert!(!LogLevel::INFO.contains(LogLevel::ERROR));
        assert!((LogLevel::WARNING | LogLevel::ERROR).contains(LogLevel::ERROR));
    }

    #[test]
    fn test_is_single() {
        assert!(LogLevel::WARNING.is_single());
        assert!(!LogLevel::ALL.is_single());
        assert!(!LogLevel::default().is_single());
    }

    #[test]
    fn test_parse() {
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::ERROR);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::WARNING);
        assert_eq!(
            "info|fatal".parse::<LogLevel>().unwrap(),
            LogLevel::INFO | LogLevel::FATAL
        );
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&LogLevel::ERROR).unwrap();
        assert_eq!(json, "\"error\"");
        let back: LogLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LogLevel::ERROR);
    }

    #[test]
    fn test_from_bits_masks_unknown() {
        assert_eq!(LogLevel::from_bits(0xF4), LogLevel::ERROR);
    }
}
