//! Mail protocol and on/off switches
//!
//! Strongly-typed versions of the literal values nginx accepts for
//! the `protocol` directive and for boolean-like `on`/`off` directives
//! such as `proxy_protocol`.

use crate::error::FieldErrorKind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The mail protocol a virtual host proxies.
///
/// # Examples
///
/// ```
/// use mailhost_config::Protocol;
///
/// assert_eq!("pop3".parse::<Protocol>().unwrap(), Protocol::Pop3);
/// assert_eq!(Protocol::Smtp.as_str(), "smtp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Imap,
    Pop3,
    Smtp,
}

impl Protocol {
    pub const VALUES: &'static [&'static str] = &["imap", "pop3", "smtp"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imap => "imap",
            Self::Pop3 => "pop3",
            Self::Smtp => "smtp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = FieldErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imap" => Ok(Self::Imap),
            "pop3" => Ok(Self::Pop3),
            "smtp" => Ok(Self::Smtp),
            other => Err(FieldErrorKind::NotInEnum {
                expected: Self::VALUES,
                found: other.to_string(),
            }),
        }
    }
}

/// An nginx `on`/`off` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub const VALUES: &'static [&'static str] = &["on", "off"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Switch {
    type Err = FieldErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(FieldErrorKind::NotInEnum {
                expected: Self::VALUES,
                found: other.to_string(),
            }),
        }
    }
}
