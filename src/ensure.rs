//! Desired state of a mail host

use crate::error::FieldErrorKind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Whether the host's configuration file should exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl Ensure {
    pub const VALUES: &'static [&'static str] = &["present", "absent"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ensure {
    type Err = FieldErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(FieldErrorKind::NotInEnum {
                expected: Self::VALUES,
                found: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_literals() {
        assert_eq!("present".parse::<Ensure>().unwrap(), Ensure::Present);
        assert_eq!("absent".parse::<Ensure>().unwrap(), Ensure::Absent);
        assert_eq!(Ensure::Absent.to_string(), "absent");
    }

    #[test]
    fn rejects_other_states() {
        let err = "running".parse::<Ensure>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected one of present, absent, found 'running'"
        );
    }
}
