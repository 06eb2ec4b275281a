//! Stub renderer
//!
//! Produces one recognizable line per fragment instead of real nginx
//! syntax, e.g. `# header mx1 listen=*:25`.

use mailhost_config::{Error, FragmentKind, MailHostSpec, Renderer, Result};
use std::cell::RefCell;

#[derive(Debug, Default)]
pub struct StubRenderer {
    fail_on: Option<FragmentKind>,
    rendered: RefCell<Vec<FragmentKind>>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose template for `kind` is broken.
    pub fn failing_on(kind: FragmentKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::default()
        }
    }

    /// Kinds rendered so far, in call order.
    pub fn rendered(&self) -> Vec<FragmentKind> {
        self.rendered.borrow().clone()
    }
}

impl Renderer for StubRenderer {
    fn render(&self, kind: FragmentKind, spec: &MailHostSpec) -> Result<String> {
        self.rendered.borrow_mut().push(kind);

        if self.fail_on == Some(kind) {
            return Err(Error::Render(format!("no template for {kind}")));
        }

        let line = match kind {
            FragmentKind::Header => format!(
                "# header {} listen={}:{}\n",
                spec.name,
                spec.listen_ip.join(","),
                spec.listen_port
            ),
            FragmentKind::Ssl => format!(
                "# ssl {} port={} cert={}\n",
                spec.name,
                spec.ssl_port.unwrap_or(spec.listen_port),
                spec.ssl_cert.as_deref().unwrap_or("-")
            ),
        };
        Ok(line)
    }
}
