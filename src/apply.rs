//! Hand planned fragments to the render and write collaborators
//!
//! This crate never produces configuration text itself. A [`Renderer`]
//! expands each fragment, a [`Writer`] puts the result in place and
//! tells the proxy service to reload.

use crate::config::GlobalDefaults;
use crate::ensure::Ensure;
use crate::error::Result;
use crate::mailhost::MailHostSpec;
use crate::plan::{FragmentKind, plan};
use crate::target::TargetFile;
use tracing::{debug, info};

/// Expands one fragment of a host into target-syntax text.
pub trait Renderer {
    /// # Errors
    ///
    /// Returns [`crate::Error::Render`] if the fragment cannot be expanded.
    fn render(&self, kind: FragmentKind, spec: &MailHostSpec) -> Result<String>;
}

/// Puts rendered configuration in place.
///
/// Writes are fire-and-forget: the writer deals with its own failures.
pub trait Writer {
    fn write(&mut self, target: &TargetFile, contents: &str);

    fn remove(&mut self, target: &TargetFile);

    /// Signal the owning service that `target` changed.
    fn notify(&mut self, target: &TargetFile);
}

/// Render every planned fragment and write them as one file.
///
/// Fragments are concatenated in plan order. Absent hosts get their
/// target removed instead. The service is notified either way.
///
/// # Errors
///
/// Returns the first render error. Nothing is written in that case.
pub fn apply<R, W>(
    spec: &MailHostSpec,
    defaults: &GlobalDefaults,
    renderer: &R,
    writer: &mut W,
) -> Result<TargetFile>
where
    R: Renderer + ?Sized,
    W: Writer + ?Sized,
{
    let target = TargetFile::for_host(spec, defaults);

    if spec.ensure == Ensure::Absent {
        info!("Removing {}", target.path.display());
        writer.remove(&target);
        writer.notify(&target);
        return Ok(target);
    }

    let mut contents = String::new();
    for fragment in plan(spec) {
        debug!("Rendering fragment {}", fragment.name);
        contents.push_str(&renderer.render(fragment.kind, spec)?);
    }

    info!("Writing {}", target.path.display());
    writer.write(&target, &contents);
    writer.notify(&target);
    Ok(target)
}
