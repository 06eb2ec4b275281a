//! Validation and normalization of mail host declarations
//!
//! Every parameter is checked, even after a fatal problem was found,
//! so that one call reports everything wrong with a declaration. The
//! certificate requirement of SSL and STARTTLS depends on normalized
//! values and is only checked once all parameters passed on their own.

use crate::config::GlobalDefaults;
use crate::ensure::Ensure;
use crate::error::{FieldError, FieldErrorKind, ValidationErrors, Warning, WarningKind};
use crate::mailhost::{
    DEFAULT_IPV6_LISTEN_IP, DEFAULT_IPV6_LISTEN_OPTIONS, DEFAULT_IPV6_LISTEN_PORT,
    DEFAULT_LISTEN_IP, DEFAULT_XCLIENT, MailHostSpec, PARAMETERS,
};
use crate::protocol::Switch;
use crate::raw::RawMailHost;
use crate::starttls::Starttls;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// A declaration that passed validation, with the warnings it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub spec: MailHostSpec,
    pub warnings: Vec<Warning>,
}

/// Validate a declaration and fill in every default.
///
/// `defaults` supplies the inherited TLS settings and whether the
/// evaluating host has IPv6. Nothing here touches the filesystem: the
/// certificate and key paths are not checked for existence.
///
/// # Errors
///
/// Returns every fatal problem found, each attributed to its parameter.
pub fn validate(
    raw: &RawMailHost,
    defaults: &GlobalDefaults,
) -> std::result::Result<Validated, ValidationErrors> {
    let mut fields = Fields::new(raw);
    fields.check_name();
    fields.reject_unknown();

    let spec = MailHostSpec {
        name: raw.name.clone(),
        ensure: fields.literal("ensure", Ensure::Present),

        listen_ip: fields.addresses("listen_ip", DEFAULT_LISTEN_IP),
        listen_port: fields.required_port("listen_port"),
        listen_options: fields.optional_string("listen_options"),

        ipv6_enable: fields.boolean("ipv6_enable", false),
        ipv6_listen_ip: fields.addresses("ipv6_listen_ip", DEFAULT_IPV6_LISTEN_IP),
        ipv6_listen_port: fields
            .port("ipv6_listen_port")
            .unwrap_or(DEFAULT_IPV6_LISTEN_PORT),
        ipv6_listen_options: fields.string("ipv6_listen_options", DEFAULT_IPV6_LISTEN_OPTIONS),

        ssl: fields.boolean("ssl", false),
        ssl_cert: fields.optional_string("ssl_cert"),
        ssl_key: fields.optional_string("ssl_key"),
        ssl_protocols: fields.non_empty_string("ssl_protocols", &defaults.ssl_protocols),
        ssl_ciphers: fields.non_empty_string("ssl_ciphers", &defaults.ssl_ciphers),
        ssl_port: fields.port("ssl_port"),
        ssl_session_cache: fields.optional_string("ssl_session_cache"),
        ssl_session_timeout: fields.optional_string("ssl_session_timeout"),
        ssl_prefer_server_ciphers: fields.literal("ssl_prefer_server_ciphers", Switch::On),
        starttls: fields.literal("starttls", Starttls::Off),

        protocol: fields.optional_literal("protocol"),
        auth_http: fields.optional_string("auth_http"),
        auth_http_header: fields.optional_string("auth_http_header"),
        // Any non-empty value is passed through to the renderer.
        xclient: fields.non_empty_string("xclient", DEFAULT_XCLIENT),
        proxy_protocol: fields.literal("proxy_protocol", Switch::Off),
        proxy_smtp_auth: fields.literal("proxy_smtp_auth", Switch::Off),

        imap_auth: fields.optional_string("imap_auth"),
        imap_capabilities: fields.sequence("imap_capabilities", Shape::Names),
        imap_client_buffer: fields.optional_string("imap_client_buffer"),
        pop3_auth: fields.optional_string("pop3_auth"),
        pop3_capabilities: fields.sequence("pop3_capabilities", Shape::Names),
        smtp_auth: fields.optional_string("smtp_auth"),
        smtp_capabilities: fields.sequence("smtp_capabilities", Shape::Names),

        server_name: fields
            .sequence("server_name", Shape::Names)
            .unwrap_or_else(|| vec![raw.name.clone()]),
        raw_prepend: fields
            .sequence("raw_prepend", Shape::Lines)
            .unwrap_or_default(),
        raw_append: fields
            .sequence("raw_append", Shape::Lines)
            .unwrap_or_default(),
    };

    let Fields {
        mut errors,
        mut warnings,
        ..
    } = fields;

    if errors.is_empty() {
        errors.extend(check_certificate(&spec));
    }

    if spec.ipv6_enable && !defaults.ipv6_available {
        warnings.push(Warning::new("ipv6_enable", WarningKind::Ipv6Unavailable));
    }

    for warning in &warnings {
        warn!("Mail host {}: {}", spec.name, warning);
    }

    if !errors.is_empty() {
        debug!(
            "Mail host {} failed validation with {} error(s)",
            spec.name,
            errors.len()
        );
        return Err(ValidationErrors::new(spec.name, errors));
    }

    Ok(Validated { spec, warnings })
}

/// TLS listeners and STARTTLS both need a certificate and its key.
fn check_certificate(spec: &MailHostSpec) -> Vec<FieldError> {
    let reason = if spec.ssl {
        "ssl"
    } else if spec.starttls.requires_certificate() {
        "starttls"
    } else {
        return Vec::new();
    };

    [("ssl_cert", &spec.ssl_cert), ("ssl_key", &spec.ssl_key)]
        .into_iter()
        .filter(|(_, path)| path.is_none())
        .map(|(field, _)| FieldError::new(field, FieldErrorKind::RequiredForTls { reason }))
        .collect()
}

/// Accepted layouts for list-valued parameters.
#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Listen addresses: a string or a non-empty sequence.
    Addresses,
    /// Server names and capabilities: a non-empty sequence.
    Names,
    /// Raw config lines: a string or a sequence, possibly empty.
    Lines,
}

impl Shape {
    const fn accepts_scalar(self) -> bool {
        matches!(self, Self::Addresses | Self::Lines)
    }

    const fn allows_empty(self) -> bool {
        matches!(self, Self::Lines)
    }

    const fn expected(self) -> &'static str {
        if self.accepts_scalar() {
            "a string or a sequence of strings"
        } else {
            "a sequence of strings"
        }
    }
}

/// Reads typed parameters out of a declaration, collecting diagnostics.
///
/// Readers never fail: on a bad value they record an error and return
/// the default, so that the remaining parameters still get checked.
struct Fields<'a> {
    raw: &'a RawMailHost,
    errors: Vec<FieldError>,
    warnings: Vec<Warning>,
}

impl<'a> Fields<'a> {
    const fn new(raw: &'a RawMailHost) -> Self {
        Self {
            raw,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        self.raw.get(field)
    }

    fn fail(&mut self, field: &str, kind: FieldErrorKind) {
        self.errors.push(FieldError::new(field, kind));
    }

    fn wrong_type(&mut self, field: &str, expected: &'static str, found: &Value) {
        self.fail(
            field,
            FieldErrorKind::WrongType {
                expected,
                found: describe(found),
            },
        );
    }

    /// The name becomes a file name in the proxy's config directory.
    fn check_name(&mut self) {
        let name = self.raw.name.as_str();
        if name.trim().is_empty() {
            self.fail("name", FieldErrorKind::Empty);
        } else if name.contains(['/', '\0']) || name == "." || name == ".." {
            self.fail("name", FieldErrorKind::InvalidFileName);
        }
    }

    fn reject_unknown(&mut self) {
        let raw = self.raw;
        for key in raw.params.keys() {
            if !PARAMETERS.contains(&key.as_str()) {
                self.fail(key, FieldErrorKind::Unknown);
            }
        }
    }

    fn boolean(&mut self, field: &str, default: bool) -> bool {
        match self.value(field) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.wrong_type(field, "a boolean", other);
                default
            }
        }
    }

    fn string(&mut self, field: &str, default: &str) -> String {
        match self.value(field) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.wrong_type(field, "a string", other);
                default.to_string()
            }
        }
    }

    fn non_empty_string(&mut self, field: &str, default: &str) -> String {
        let value = self.string(field, default);
        if value.trim().is_empty() {
            self.fail(field, FieldErrorKind::Empty);
        }
        value
    }

    /// An empty string counts as not given.
    fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.value(field)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => {
                self.wrong_type(field, "a string", other);
                None
            }
        }
    }

    fn literal<T>(&mut self, field: &str, default: T) -> T
    where
        T: FromStr<Err = FieldErrorKind>,
    {
        self.optional_literal(field).unwrap_or(default)
    }

    fn optional_literal<T>(&mut self, field: &str) -> Option<T>
    where
        T: FromStr<Err = FieldErrorKind>,
    {
        match self.value(field)? {
            Value::String(s) => match s.parse() {
                Ok(parsed) => Some(parsed),
                Err(kind) => {
                    self.fail(field, kind);
                    None
                }
            },
            other => {
                self.wrong_type(field, "a string", other);
                None
            }
        }
    }

    fn required_port(&mut self, field: &str) -> u16 {
        if self.value(field).is_none() {
            self.fail(field, FieldErrorKind::Missing);
            return 0;
        }
        self.port(field).unwrap_or(0)
    }

    /// Ports are integers. Digit-only strings are still accepted for
    /// older declarations, with a warning.
    fn port(&mut self, field: &str) -> Option<u16> {
        let value = self.value(field)?;
        let number = match value {
            // `as_u64` rejects negative and fractional numbers.
            Value::Number(n) => n.as_u64(),
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                self.warnings.push(Warning::new(
                    field,
                    WarningKind::LegacyStringInteger { value: s.clone() },
                ));
                // Only overflow can fail here.
                Some(s.parse::<u64>().unwrap_or(u64::MAX))
            }
            _ => None,
        };

        let Some(number) = number else {
            self.wrong_type(field, "a non-negative integer", value);
            return None;
        };

        if let Ok(port) = u16::try_from(number) {
            Some(port)
        } else {
            self.fail(
                field,
                FieldErrorKind::PortOutOfRange {
                    value: describe(value),
                },
            );
            None
        }
    }

    fn addresses(&mut self, field: &str, default: &str) -> Vec<String> {
        self.sequence(field, Shape::Addresses)
            .unwrap_or_else(|| vec![default.to_string()])
    }

    fn sequence(&mut self, field: &str, shape: Shape) -> Option<Vec<String>> {
        let value = self.value(field)?;
        let list = match value {
            Value::String(s) if shape.accepts_scalar() => vec![s.clone()],
            Value::Array(items) => {
                if let Some(bad) = items.iter().find(|item| !item.is_string()) {
                    self.fail(
                        field,
                        FieldErrorKind::WrongType {
                            expected: shape.expected(),
                            found: format!("a sequence containing {}", describe(bad)),
                        },
                    );
                    return None;
                }
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }
            other => {
                self.wrong_type(field, shape.expected(), other);
                return None;
            }
        };

        if !shape.allows_empty() && (list.is_empty() || list.iter().any(|s| s.trim().is_empty()))
        {
            self.fail(field, FieldErrorKind::Empty);
            return None;
        }

        Some(list)
    }
}

pub fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) => "a sequence".to_string(),
        Value::Object(_) => "a map".to_string(),
        other => other.to_string(),
    }
}
