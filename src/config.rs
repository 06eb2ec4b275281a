//! Global proxy defaults inherited by every mail host

use crate::error::{Error, Result};
use std::env;
use std::net::{Ipv6Addr, UdpSocket};
use std::path::PathBuf;

pub const DEFAULT_CONF_DIR: &str = "/etc/nginx";
pub const DEFAULT_ROOT_GROUP: &str = "root";
pub const DEFAULT_SSL_PROTOCOLS: &str = "TLSv1 TLSv1.1 TLSv1.2";
pub const DEFAULT_SSL_CIPHERS: &str = "ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305:\
ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-ECDSA-AES256-GCM-SHA384:\
ECDHE-RSA-AES256-GCM-SHA384:DHE-RSA-AES128-GCM-SHA256:DHE-RSA-AES256-GCM-SHA384:\
ECDHE-ECDSA-AES128-SHA256:ECDHE-RSA-AES128-SHA256:ECDHE-ECDSA-AES128-SHA:\
ECDHE-RSA-AES256-SHA384:ECDHE-RSA-AES128-SHA:ECDHE-ECDSA-AES256-SHA384:ECDHE-ECDSA-AES256-SHA:\
ECDHE-RSA-AES256-SHA:DHE-RSA-AES128-SHA256:DHE-RSA-AES128-SHA:DHE-RSA-AES256-SHA256:\
DHE-RSA-AES256-SHA:ECDHE-ECDSA-DES-CBC3-SHA:ECDHE-RSA-DES-CBC3-SHA:EDH-RSA-DES-CBC3-SHA:\
AES128-GCM-SHA256:AES256-GCM-SHA384:AES128-SHA256:AES256-SHA256:AES128-SHA:AES256-SHA:\
DES-CBC3-SHA:!DSS";

// Any globally routed address works, nothing is sent.
const IPV6_PROBE: Ipv6Addr = Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888);

/// Settings of the surrounding proxy that mail hosts inherit
/// unless they override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDefaults {
    pub ssl_protocols: String,
    pub ssl_ciphers: String,
    pub root_group: String,
    pub conf_dir: PathBuf,
    /// Whether the evaluating host has an IPv6 address.
    pub ipv6_available: bool,
}

impl Default for GlobalDefaults {
    /// Stock nginx layout. Assumes no IPv6 until told otherwise.
    fn default() -> Self {
        Self {
            ssl_protocols: DEFAULT_SSL_PROTOCOLS.to_string(),
            ssl_ciphers: DEFAULT_SSL_CIPHERS.to_string(),
            root_group: DEFAULT_ROOT_GROUP.to_string(),
            conf_dir: PathBuf::from(DEFAULT_CONF_DIR),
            ipv6_available: false,
        }
    }
}

impl GlobalDefaults {
    /// Load global defaults from environment variables
    ///
    /// Reads from `.env` file if present. All variables are optional:
    /// - `MAILHOST_CONF_DIR` (default: `/etc/nginx`)
    /// - `MAILHOST_ROOT_GROUP` (default: `root`)
    /// - `MAILHOST_SSL_PROTOCOLS` (default: `TLSv1 TLSv1.1 TLSv1.2`)
    /// - `MAILHOST_SSL_CIPHERS` (default: Mozilla intermediate list)
    /// - `MAILHOST_IPV6` (`auto`, `true` or `false`; default: `auto`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `MAILHOST_IPV6` has another value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            ssl_protocols: env::var("MAILHOST_SSL_PROTOCOLS")
                .unwrap_or_else(|_| DEFAULT_SSL_PROTOCOLS.to_string()),
            ssl_ciphers: env::var("MAILHOST_SSL_CIPHERS")
                .unwrap_or_else(|_| DEFAULT_SSL_CIPHERS.to_string()),
            root_group: env::var("MAILHOST_ROOT_GROUP")
                .unwrap_or_else(|_| DEFAULT_ROOT_GROUP.to_string()),
            conf_dir: env::var("MAILHOST_CONF_DIR")
                .map_or_else(|_| PathBuf::from(DEFAULT_CONF_DIR), PathBuf::from),
            ipv6_available: parse_ipv6_setting(
                &env::var("MAILHOST_IPV6").unwrap_or_else(|_| "auto".to_string()),
            )?,
        })
    }
}

fn parse_ipv6_setting(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "auto" => Ok(host_has_ipv6()),
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(Error::Config(format!(
            "Invalid MAILHOST_IPV6: '{other}' (expected auto, true or false)"
        ))),
    }
}

/// Probe for a routable IPv6 address on this host.
///
/// Connecting a UDP socket only resolves a route, so this never sends
/// a packet.
#[must_use]
pub fn host_has_ipv6() -> bool {
    UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0))
        .and_then(|socket| socket.connect((IPV6_PROBE, 53)).map(|()| socket))
        .and_then(|socket| socket.local_addr())
        .is_ok_and(|addr| !addr.ip().is_loopback() && !addr.ip().is_unspecified())
}
