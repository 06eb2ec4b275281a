//! The normalized mail host

use crate::ensure::Ensure;
use crate::error::Result;
use crate::protocol::{Protocol, Switch};
use crate::raw::RawMailHost;
use crate::starttls::Starttls;
use serde::Serialize;

pub const DEFAULT_LISTEN_IP: &str = "*";
pub const DEFAULT_IPV6_LISTEN_IP: &str = "::";
pub const DEFAULT_IPV6_LISTEN_PORT: u16 = 80;
pub const DEFAULT_IPV6_LISTEN_OPTIONS: &str = "default ipv6only=on";
pub const DEFAULT_XCLIENT: &str = "on";

/// Every parameter a declaration may carry, besides its name.
pub const PARAMETERS: &[&str] = &[
    "ensure",
    "listen_ip",
    "listen_port",
    "listen_options",
    "ipv6_enable",
    "ipv6_listen_ip",
    "ipv6_listen_port",
    "ipv6_listen_options",
    "ssl",
    "ssl_cert",
    "ssl_key",
    "ssl_protocols",
    "ssl_ciphers",
    "ssl_port",
    "ssl_session_cache",
    "ssl_session_timeout",
    "ssl_prefer_server_ciphers",
    "starttls",
    "protocol",
    "auth_http",
    "auth_http_header",
    "xclient",
    "proxy_protocol",
    "proxy_smtp_auth",
    "imap_auth",
    "imap_capabilities",
    "imap_client_buffer",
    "pop3_auth",
    "pop3_capabilities",
    "smtp_auth",
    "smtp_capabilities",
    "server_name",
    "raw_prepend",
    "raw_append",
];

/// A validated mail virtual host with every default filled in.
///
/// Only [`crate::validate`] builds these. Listen addresses are always
/// sequences here, even when declared as a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailHostSpec {
    pub name: String,
    pub ensure: Ensure,

    pub listen_ip: Vec<String>,
    pub listen_port: u16,
    pub listen_options: Option<String>,

    pub ipv6_enable: bool,
    pub ipv6_listen_ip: Vec<String>,
    pub ipv6_listen_port: u16,
    pub ipv6_listen_options: String,

    pub ssl: bool,
    pub ssl_cert: Option<String>,
    pub ssl_key: Option<String>,
    pub ssl_protocols: String,
    pub ssl_ciphers: String,
    pub ssl_port: Option<u16>,
    pub ssl_session_cache: Option<String>,
    pub ssl_session_timeout: Option<String>,
    pub ssl_prefer_server_ciphers: Switch,
    pub starttls: Starttls,

    pub protocol: Option<Protocol>,
    pub auth_http: Option<String>,
    pub auth_http_header: Option<String>,
    pub xclient: String,
    pub proxy_protocol: Switch,
    pub proxy_smtp_auth: Switch,

    pub imap_auth: Option<String>,
    pub imap_capabilities: Option<Vec<String>>,
    pub imap_client_buffer: Option<String>,
    pub pop3_auth: Option<String>,
    pub pop3_capabilities: Option<Vec<String>>,
    pub smtp_auth: Option<String>,
    pub smtp_capabilities: Option<Vec<String>>,

    pub server_name: Vec<String>,
    pub raw_prepend: Vec<String>,
    pub raw_append: Vec<String>,
}

impl MailHostSpec {
    /// Whether a certificate and key must be configured, either for the
    /// TLS listener or for STARTTLS on the plain one.
    #[must_use]
    pub const fn requires_certificate(&self) -> bool {
        self.ssl || self.starttls.requires_certificate()
    }

    /// Turn the normalized host back into a declaration.
    ///
    /// Validating the result yields an identical spec and no coercion
    /// warnings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_raw(&self) -> Result<RawMailHost> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}
