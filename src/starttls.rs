//! STARTTLS policy for the plain listener
//!
//! Mirrors the three values nginx accepts for the `starttls`
//! directive in the `mail` context.

use crate::error::FieldErrorKind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Whether the plain listener offers, requires or disables STARTTLS.
///
/// # Examples
///
/// ```
/// use mailhost_config::Starttls;
///
/// let policy: Starttls = "only".parse().unwrap();
/// assert_eq!(policy, Starttls::Only);
/// assert!(policy.requires_certificate());
/// assert!(!Starttls::Off.requires_certificate());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Starttls {
    /// TLS is offered but optional (`on`).
    On,
    /// Clients must upgrade before authenticating (`only`).
    Only,
    /// No STARTTLS on the plain listener (`off`).
    #[default]
    Off,
}

impl Starttls {
    pub const VALUES: &'static [&'static str] = &["on", "only", "off"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Only => "only",
            Self::Off => "off",
        }
    }

    /// STARTTLS needs a certificate and key just like a TLS listener.
    #[must_use]
    pub const fn requires_certificate(self) -> bool {
        matches!(self, Self::On | Self::Only)
    }
}

impl fmt::Display for Starttls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Starttls {
    type Err = FieldErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "only" => Ok(Self::Only),
            "off" => Ok(Self::Off),
            other => Err(FieldErrorKind::NotInEnum {
                expected: Self::VALUES,
                found: other.to_string(),
            }),
        }
    }
}
