//! Fragment planning
//!
//! Decides which configuration fragments a mail host contributes to its
//! target file, and in which order. Fragments of many hosts may end up
//! in one shared stream, so the orders are fixed constants rather than
//! computed positions.

use crate::mailhost::MailHostSpec;
use serde::Serialize;
use std::fmt;
use tracing::debug;

pub const HEADER_ORDER: u32 = 1;
pub const SSL_ORDER: u32 = 700;

/// What a fragment configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// Plain and IPv6 listeners with the auth settings.
    Header,
    /// The TLS listener.
    Ssl,
}

impl FragmentKind {
    #[must_use]
    pub const fn order(self) -> u32 {
        match self {
            Self::Header => HEADER_ORDER,
            Self::Ssl => SSL_ORDER,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Ssl => "ssl",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fragment for the renderer to expand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentDescriptor {
    pub name: String,
    pub order: u32,
    pub kind: FragmentKind,
}

impl FragmentDescriptor {
    fn new(host: &str, kind: FragmentKind) -> Self {
        Self {
            name: format!("{host}-{kind}"),
            order: kind.order(),
            kind,
        }
    }
}

/// Plan the fragments of a validated host, sorted by order.
///
/// The header is skipped when `ssl_port` equals `listen_port`: the SSL
/// fragment then owns that port. This looks only at the ports, not at
/// `ssl`, so a host declaring equal ports without SSL plans nothing.
///
/// # Examples
///
/// ```
/// use mailhost_config::{FragmentKind, GlobalDefaults, RawMailHost, plan, validate};
///
/// let raw = RawMailHost::new("mx1")
///     .with("listen_port", 465)
///     .with("ssl_port", 465)
///     .with("ssl", true)
///     .with("ssl_cert", "/tmp/c")
///     .with("ssl_key", "/tmp/k");
/// let spec = validate(&raw, &GlobalDefaults::default()).unwrap().spec;
///
/// let kinds: Vec<_> = plan(&spec).into_iter().map(|f| f.kind).collect();
/// assert_eq!(kinds, vec![FragmentKind::Ssl]);
/// ```
#[must_use]
pub fn plan(spec: &MailHostSpec) -> Vec<FragmentDescriptor> {
    let mut fragments = Vec::with_capacity(2);

    // TODO: decide with the maintainers whether an ssl_port matching
    // listen_port should still hide the header when ssl is false.
    if spec.ssl_port != Some(spec.listen_port) {
        fragments.push(FragmentDescriptor::new(&spec.name, FragmentKind::Header));
    }

    if spec.ssl {
        fragments.push(FragmentDescriptor::new(&spec.name, FragmentKind::Ssl));
    }

    fragments.sort_by_key(|f| f.order);

    debug!(
        "Planned {} fragment(s) for mail host {}",
        fragments.len(),
        spec.name
    );
    fragments
}
