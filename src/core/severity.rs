//! Severity definitions

use super::error::LoggerError;
use super::platform::PlatformType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered importance of a log record.
///
/// The discriminant is the rank; the derived ordering follows it, so
/// `Debug < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Severity {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl Severity {
    /// Every severity, in rank order
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// Platform channel type used when emitting at this severity.
    ///
    /// Warning maps to [`PlatformType::Default`] so warnings stay visible
    /// without being promoted to the error stream.
    pub const fn platform_type(self) -> PlatformType {
        match self {
            Severity::Debug => PlatformType::Debug,
            Severity::Info => PlatformType::Info,
            Severity::Warning => PlatformType::Default,
            Severity::Error => PlatformType::Error,
        }
    }

    #[cfg(feature = "console")]
    pub fn color(self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warning => Yellow,
            Severity::Error => Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            _ => Err(LoggerError::InvalidSeverity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_strictly_increasing() {
        assert!(Severity::Debug.rank() < Severity::Info.rank());
        assert!(Severity::Info.rank() < Severity::Warning.rank());
        assert!(Severity::Warning.rank() < Severity::Error.rank());
        assert_eq!(Severity::Error.rank(), 3);
    }

    #[test]
    fn test_ordering_matches_rank() {
        for a in Severity::ALL {
            for b in Severity::ALL {
                assert_eq!(a < b, a.rank() < b.rank());
                assert_eq!(a == b, a.rank() == b.rank());
            }
        }
    }

    #[test]
    fn test_platform_mapping() {
        assert_eq!(Severity::Debug.platform_type(), PlatformType::Debug);
        assert_eq!(Severity::Info.platform_type(), PlatformType::Info);
        assert_eq!(Severity::Warning.platform_type(), PlatformType::Default);
        assert_eq!(Severity::Error.platform_type(), PlatformType::Error);
    }

    #[test]
    fn test_parse() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" Warning ".parse::<Severity>().unwrap(), Severity::Warning);
        assert!(matches!(
            "fatal".parse::<Severity>(),
            Err(LoggerError::InvalidSeverity(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(format!("{}", Severity::Debug), "DEBUG");
    }
}
