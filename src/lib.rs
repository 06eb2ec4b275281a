//! nginx mail proxy virtual host configuration
//!
//! Validates declarations of mail virtual hosts (IMAP, POP3 and SMTP
//! proxying) and plans the configuration fragments each one needs:
//! the listener header, the SSL listener, or both. Inherited TLS
//! settings come from [`GlobalDefaults`].
//!
//! Rendering the fragments to nginx syntax and writing the file are
//! left to implementations of [`Renderer`] and [`Writer`].

mod apply;
mod config;
mod ensure;
mod error;
mod mailhost;
mod plan;
mod prepare;
mod protocol;
mod raw;
mod starttls;
mod target;
mod validate;

pub use apply::{Renderer, Writer, apply};
pub use config::{GlobalDefaults, host_has_ipv6};
pub use ensure::Ensure;
pub use error::{
    Error, FieldError, FieldErrorKind, Result, ValidationErrors, Warning, WarningKind,
};
pub use mailhost::{MailHostSpec, PARAMETERS};
pub use plan::{FragmentDescriptor, FragmentKind, HEADER_ORDER, SSL_ORDER, plan};
pub use prepare::{Outcome, Planned, prepare, prepare_all, prepare_entries};
pub use protocol::{Protocol, Switch};
pub use raw::{Entry, RawMailHost};
pub use starttls::Starttls;
pub use target::TargetFile;
pub use validate::{Validated, validate};
