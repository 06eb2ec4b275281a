#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for validating and planning nginx mail proxy hosts

use clap::{Parser, Subcommand};
use mailhost_config::{Entry, GlobalDefaults, Outcome, RawMailHost, prepare_entries};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailhost-plan")]
#[command(about = "Validate and plan nginx mail proxy virtual hosts")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Validate host declarations and report every problem
    Check {
        /// JSON files holding one declaration or an array of them
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the fragments and target file of each valid host
    Plan {
        /// JSON files holding one declaration or an array of them
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
struct HostReport<'a> {
    name: &'a str,
    valid: bool,
    warnings: Vec<String>,
    errors: Vec<ErrorReport<'a>>,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    field: &'a str,
    reason: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let defaults = GlobalDefaults::from_env()?;

    let (files, planning) = match &args.command {
        Command::Check { files } => (files, false),
        Command::Plan { files } => (files, true),
    };

    let entries = load(files)?;
    let outcomes = prepare_entries(entries, &defaults);

    if planning {
        cmd_plan(&args, &outcomes)?;
    } else {
        cmd_check(&args, &outcomes)?;
    }

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} mail host(s) failed validation", outcomes.len());
    }

    Ok(())
}

fn load(files: &[PathBuf]) -> anyhow::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for file in files {
        let loaded = RawMailHost::load(file)
            .map_err(|e| anyhow::anyhow!("Cannot load {}: {e}", file.display()))?;
        entries.extend(loaded);
    }
    Ok(entries)
}

fn report(outcome: &Outcome) -> HostReport<'_> {
    match outcome {
        Ok(planned) => HostReport {
            name: &planned.spec.name,
            valid: true,
            warnings: planned.warnings.iter().map(ToString::to_string).collect(),
            errors: Vec::new(),
        },
        Err(failure) => HostReport {
            name: &failure.host,
            valid: false,
            warnings: Vec::new(),
            errors: failure
                .errors
                .iter()
                .map(|e| ErrorReport {
                    field: &e.field,
                    reason: e.kind.to_string(),
                })
                .collect(),
        },
    }
}

fn cmd_check(args: &Args, outcomes: &[Outcome]) -> anyhow::Result<()> {
    let reports: Vec<HostReport<'_>> = outcomes.iter().map(report).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for host in &reports {
        println!("{:<6} {}", if host.valid { "ok" } else { "FAIL" }, host.name);
        for warning in &host.warnings {
            println!("  warning: {warning}");
        }
        for error in &host.errors {
            println!("  error:   {}: {}", error.field, error.reason);
        }
    }

    Ok(())
}

fn cmd_plan(args: &Args, outcomes: &[Outcome]) -> anyhow::Result<()> {
    if args.json {
        let planned: Vec<_> = outcomes
            .iter()
            .filter_map(|o| o.as_ref().ok())
            .map(|p| {
                serde_json::json!({
                    "name": p.spec.name,
                    "target": p.target,
                    "fragments": p.fragments,
                    "warnings": p.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&planned)?);
        return Ok(());
    }

    for outcome in outcomes {
        match outcome {
            Ok(planned) => {
                println!(
                    "{} -> {} ({})",
                    planned.spec.name,
                    planned.target.path.display(),
                    planned.target.ensure
                );
                if planned.fragments.is_empty() {
                    println!("  (no fragments)");
                }
                for fragment in &planned.fragments {
                    println!(
                        "  {:>4} {:<7} {}",
                        fragment.order,
                        fragment.kind.as_str(),
                        fragment.name
                    );
                }
            }
            Err(failure) => eprintln!("{failure}"),
        }
    }

    Ok(())
}
