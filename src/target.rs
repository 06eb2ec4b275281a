//! The configuration file a mail host is written to

use crate::config::GlobalDefaults;
use crate::ensure::Ensure;
use crate::mailhost::MailHostSpec;
use serde::Serialize;
use std::path::PathBuf;

/// Directory under the proxy's config root holding mail hosts.
pub const MAIL_CONF_SUBDIR: &str = "conf.mail.d";
pub const TARGET_OWNER: &str = "root";
pub const TARGET_MODE: u32 = 0o644;

/// Where and how a host's fragments are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFile {
    pub path: PathBuf,
    pub owner: String,
    pub group: String,
    pub mode: u32,
    pub ensure: Ensure,
}

impl TargetFile {
    /// `<conf_dir>/conf.mail.d/<name>.conf`, owned by root and the
    /// configured root group.
    #[must_use]
    pub fn for_host(spec: &MailHostSpec, defaults: &GlobalDefaults) -> Self {
        Self {
            path: defaults
                .conf_dir
                .join(MAIL_CONF_SUBDIR)
                .join(format!("{}.conf", spec.name)),
            owner: TARGET_OWNER.to_string(),
            group: defaults.root_group.clone(),
            mode: TARGET_MODE,
            ensure: spec.ensure,
        }
    }
}
