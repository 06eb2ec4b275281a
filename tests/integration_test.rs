//! Integration tests for validation, planning and `apply()`.
//!
//! Each test builds a declaration the way a caller would, runs it
//! through the public API and, where files are involved, drives the
//! fake collaborators from `fake_target`.

mod fake_target;

use fake_target::{Op, RecordingWriter, StubRenderer};
use mailhost_config::{
    Error, FieldError, FieldErrorKind, FragmentKind, GlobalDefaults, RawMailHost, WarningKind,
    apply, plan, prepare, validate,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

/// Defaults pointing at a scratch config root, with IPv6 available.
fn defaults() -> GlobalDefaults {
    GlobalDefaults {
        conf_dir: PathBuf::from("/srv/nginx"),
        ipv6_available: true,
        ..GlobalDefaults::default()
    }
}

const TARGET: &str = "/srv/nginx/conf.mail.d/mx1.conf";

// ── Scenarios ──────────────────────────────────────────────────────

#[test]
fn test_submission_with_separate_ssl_port() {
    let raw = RawMailHost::from_json(
        r#"{
            "name": "mx1",
            "listen_port": 587,
            "ssl_port": 465,
            "ssl": true,
            "ssl_cert": "/tmp/c",
            "ssl_key": "/tmp/k",
            "starttls": "only",
            "xclient": "off"
        }"#,
    )
    .unwrap();

    let validated = validate(&raw, &defaults()).unwrap();
    assert!(validated.warnings.is_empty());

    let fragments: Vec<_> = plan(&validated.spec)
        .into_iter()
        .map(|f| (f.order, f.kind))
        .collect();
    assert_eq!(
        fragments,
        vec![(1, FragmentKind::Header), (700, FragmentKind::Ssl)]
    );
}

#[test]
fn test_ssl_on_listen_port_suppresses_header() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", 465)
        .with("ssl_port", 465)
        .with("ssl", true)
        .with("ssl_cert", "/tmp/c")
        .with("ssl_key", "/tmp/k");

    let spec = validate(&raw, &defaults()).unwrap().spec;
    let fragments = plan(&spec);

    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].order, 700);
    assert_eq!(fragments[0].kind, FragmentKind::Ssl);
}

#[test]
fn test_starttls_without_certificate_is_rejected() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", 25)
        .with("ssl", false)
        .with("starttls", "on");

    let err = validate(&raw, &defaults()).unwrap_err();
    assert_eq!(err.host, "mx1");
    assert_eq!(
        err.errors,
        vec![
            FieldError::new("ssl_cert", FieldErrorKind::RequiredForTls { reason: "starttls" }),
            FieldError::new("ssl_key", FieldErrorKind::RequiredForTls { reason: "starttls" }),
        ]
    );
}

#[test]
fn test_legacy_string_port() {
    let raw = RawMailHost::new("mx1").with("listen_port", "587");
    let validated = validate(&raw, &defaults()).unwrap();

    assert_eq!(validated.spec.listen_port, 587);
    assert_eq!(validated.warnings.len(), 1);
    assert_eq!(validated.warnings[0].field, "listen_port");
    assert!(matches!(
        validated.warnings[0].kind,
        WarningKind::LegacyStringInteger { .. }
    ));
}

#[test]
fn test_normalized_spec_revalidates_unchanged() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", "110")
        .with("listen_ip", "192.0.2.10")
        .with("ipv6_enable", true)
        .with("protocol", "pop3")
        .with("pop3_capabilities", json!(["TOP", "USER", "UIDL"]))
        .with("auth_http", "http://127.0.0.1:9000/auth");

    let first = validate(&raw, &defaults()).unwrap();
    let second = validate(&first.spec.to_raw().unwrap(), &defaults()).unwrap();

    assert_eq!(second.spec, first.spec);
    assert!(second.warnings.is_empty());
}

// ── apply() ────────────────────────────────────────────────────────

#[test]
fn test_apply_writes_fragments_in_order() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", 587)
        .with("ssl_port", 465)
        .with("ssl", true)
        .with("ssl_cert", "/etc/ssl/mx1.pem")
        .with("ssl_key", "/etc/ssl/mx1.key");
    let spec = validate(&raw, &defaults()).unwrap().spec;

    let renderer = StubRenderer::new();
    let mut writer = RecordingWriter::new();
    let target = apply(&spec, &defaults(), &renderer, &mut writer).unwrap();

    assert_eq!(target.path, PathBuf::from(TARGET));
    assert_eq!(
        renderer.rendered(),
        vec![FragmentKind::Header, FragmentKind::Ssl]
    );
    assert_eq!(
        writer.contents(TARGET),
        Some("# header mx1 listen=*:587\n# ssl mx1 port=465 cert=/etc/ssl/mx1.pem\n")
    );
    assert_eq!(
        writer.ops,
        vec![Op::Write(target.path.clone()), Op::Notify(target.path)]
    );
}

#[test]
fn test_apply_absent_removes_target() {
    let raw = RawMailHost::new("mx1")
        .with("ensure", "absent")
        .with("listen_port", 25);
    let spec = validate(&raw, &defaults()).unwrap().spec;
    assert_eq!(plan(&spec).len(), 1);

    let renderer = StubRenderer::new();
    let mut writer = RecordingWriter::new().with_file(TARGET, "# stale\n");
    apply(&spec, &defaults(), &renderer, &mut writer).unwrap();

    assert!(renderer.rendered().is_empty());
    assert_eq!(writer.contents(TARGET), None);
    assert_eq!(
        writer.ops,
        vec![
            Op::Remove(PathBuf::from(TARGET)),
            Op::Notify(PathBuf::from(TARGET)),
        ]
    );
}

#[test]
fn test_apply_render_failure_writes_nothing() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", 587)
        .with("ssl", true)
        .with("ssl_cert", "/tmp/c")
        .with("ssl_key", "/tmp/k");
    let spec = validate(&raw, &defaults()).unwrap().spec;

    let renderer = StubRenderer::failing_on(FragmentKind::Ssl);
    let mut writer = RecordingWriter::new().with_file(TARGET, "# previous\n");
    let err = apply(&spec, &defaults(), &renderer, &mut writer).unwrap_err();

    assert!(matches!(err, Error::Render(_)));
    assert_eq!(writer.contents(TARGET), Some("# previous\n"));
    assert!(writer.ops.is_empty());
}

#[test]
fn test_apply_with_suppressed_header_and_no_ssl_writes_empty_file() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", 993)
        .with("ssl_port", 993);
    let spec = validate(&raw, &defaults()).unwrap().spec;

    let renderer = StubRenderer::new();
    let mut writer = RecordingWriter::new();
    apply(&spec, &defaults(), &renderer, &mut writer).unwrap();

    assert_eq!(writer.contents(TARGET), Some(""));
}

// ── prepare() ──────────────────────────────────────────────────────

#[test]
fn test_prepare_reports_every_problem() {
    let raw = RawMailHost::from_json(
        r#"{
            "name": "mx1",
            "ensure": "enabled",
            "listen_port": "smtp",
            "listen_ip": {"v4": "0.0.0.0"},
            "starttls": "maybe"
        }"#,
    )
    .unwrap();

    let err = prepare(&raw, &defaults()).unwrap_err();
    let fields: Vec<_> = err.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["ensure", "listen_ip", "listen_port", "starttls"]);

    let message = Error::from(err).to_string();
    assert!(message.starts_with("mail host 'mx1' failed validation: ensure: expected one of"));
}

#[test]
fn test_prepare_warns_about_missing_ipv6() {
    let raw = RawMailHost::new("mx1")
        .with("listen_port", 143)
        .with("ipv6_enable", true);
    let no_ipv6 = GlobalDefaults {
        ipv6_available: false,
        ..defaults()
    };

    let planned = prepare(&raw, &no_ipv6).unwrap();
    assert_eq!(planned.warnings.len(), 1);
    assert_eq!(planned.warnings[0].kind, WarningKind::Ipv6Unavailable);
    assert_eq!(planned.fragments.len(), 1);
    assert_eq!(planned.target.group, "root");
}
