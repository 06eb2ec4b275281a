//! Validate and plan in one step, for one host or many

use crate::config::GlobalDefaults;
use crate::error::{ValidationErrors, Warning};
use crate::mailhost::MailHostSpec;
use crate::plan::{FragmentDescriptor, plan};
use crate::raw::{Entry, RawMailHost};
use crate::target::TargetFile;
use crate::validate::validate;
use tracing::info;

/// Everything the render and write stages need for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    pub spec: MailHostSpec,
    pub warnings: Vec<Warning>,
    pub fragments: Vec<FragmentDescriptor>,
    pub target: TargetFile,
}

/// The result of preparing one declaration.
pub type Outcome = std::result::Result<Planned, ValidationErrors>;

/// Validate a declaration, then plan its fragments and target file.
///
/// # Errors
///
/// Returns the validation errors; nothing is planned for an invalid host.
pub fn prepare(raw: &RawMailHost, defaults: &GlobalDefaults) -> Outcome {
    let validated = validate(raw, defaults)?;
    let fragments = plan(&validated.spec);
    let target = TargetFile::for_host(&validated.spec, defaults);

    Ok(Planned {
        spec: validated.spec,
        warnings: validated.warnings,
        fragments,
        target,
    })
}

/// Prepare every declaration, keeping the caller's order.
///
/// Hosts are independent: an invalid one does not stop the others.
#[must_use]
pub fn prepare_all<'a, I>(raws: I, defaults: &GlobalDefaults) -> Vec<Outcome>
where
    I: IntoIterator<Item = &'a RawMailHost>,
{
    summarize(raws.into_iter().map(|raw| prepare(raw, defaults)).collect())
}

/// Prepare loaded entries. Entries that failed to load are passed
/// through in place as failed outcomes.
#[must_use]
pub fn prepare_entries<I>(entries: I, defaults: &GlobalDefaults) -> Vec<Outcome>
where
    I: IntoIterator<Item = Entry>,
{
    summarize(
        entries
            .into_iter()
            .map(|entry| entry.and_then(|raw| prepare(&raw, defaults)))
            .collect(),
    )
}

fn summarize(outcomes: Vec<Outcome>) -> Vec<Outcome> {
    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    info!(
        "Prepared {} mail host(s), {} failed validation",
        outcomes.len(),
        failed
    );
    outcomes
}
