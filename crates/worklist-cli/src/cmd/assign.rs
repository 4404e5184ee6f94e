//! `wl assign`: stage employee → department assignments and submit them as
//! one batch.

use super::Context;
use crate::output::{CliError, OutputMode, render, render_error, report};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;
use worklist_core::assign::{PendingAssignments, SubmitOutcome, Submitter};
use worklist_core::error::ErrorCode;
use worklist_core::model::roster::RosterTotals;
use worklist_core::remote::{AssignmentRequest, RemoteSource};

#[derive(Args, Debug, Clone, Default)]
pub struct AssignArgs {
    /// Assignments as EMPLOYEE=DEPARTMENT. `EMPLOYEE=` clears an earlier pair.
    #[arg(value_name = "EMPLOYEE=DEPARTMENT")]
    pub pairs: Vec<String>,

    /// Submit without asking for a preview first.
    #[arg(short, long)]
    pub yes: bool,
}

/// Split one `EMPLOYEE=DEPARTMENT` argument. An empty department clears.
pub fn parse_pair(raw: &str) -> Result<(String, Option<String>), String> {
    let Some((employee, department)) = raw.split_once('=') else {
        return Err(format!("'{raw}' is not EMPLOYEE=DEPARTMENT"));
    };
    let employee = employee.trim();
    if employee.is_empty() {
        return Err(format!("'{raw}' has no employee"));
    }
    let department = department.trim();
    Ok((
        employee.to_string(),
        (!department.is_empty()).then(|| department.to_string()),
    ))
}

/// Stage every pair in command-line order; later pairs win.
pub fn stage_all(pairs: &[String]) -> Result<PendingAssignments, String> {
    let mut pending = PendingAssignments::new();
    for raw in pairs {
        let (employee, department) = parse_pair(raw)?;
        pending.stage(&employee, department.as_deref());
    }
    Ok(pending)
}

#[derive(Debug, Serialize)]
struct Preview {
    submitted: bool,
    pending: Vec<AssignmentRequest>,
}

pub fn run_assign(args: &AssignArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut pending = match stage_all(&args.pairs) {
        Ok(pending) => pending,
        Err(message) => {
            render_error(
                ctx.output,
                &CliError::coded(ErrorCode::InvalidAssignment, &message),
            )?;
            anyhow::bail!(message);
        }
    };

    // Nothing staged is settled locally; no server is needed for it.
    if pending.is_empty() {
        return render(ctx.output, &SubmitOutcome::NothingPending, write_outcome);
    }

    if !args.yes {
        let preview = Preview {
            submitted: false,
            pending: pending.batch(),
        };
        return render(ctx.output, &preview, write_preview);
    }

    let remote = ctx.remote()?;
    let outcome = report(ctx.output, Submitter::new().submit(&mut pending, &remote))?;
    render(ctx.output, &outcome, write_outcome)?;

    if outcome.needs_reload() && !ctx.quiet && !ctx.output.is_json() {
        print_roster_totals(&remote, ctx.output)?;
    }
    Ok(())
}

/// Refreshed headcount after a batch landed. A failed refresh only warns: the
/// batch itself already went through.
fn print_roster_totals<R: RemoteSource + ?Sized>(
    remote: &R,
    mode: OutputMode,
) -> anyhow::Result<()> {
    match remote.get_employee_stats() {
        Ok(stats) => render(mode, &stats.stats, write_roster_totals),
        Err(err) => {
            warn!(%err, "could not refresh roster stats");
            Ok(())
        }
    }
}

fn write_roster_totals(totals: &RosterTotals, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "Roster: {} assigned, {} unassigned of {} employees",
        totals.assigned, totals.unassigned, totals.total_employees
    )
}

fn write_preview(preview: &Preview, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "Pending assignments ({}):", preview.pending.len())?;
    for entry in &preview.pending {
        writeln!(w, "  {} → {}", entry.employee, entry.department)?;
    }
    writeln!(w, "Re-run with --yes to submit.")
}

fn write_outcome(outcome: &SubmitOutcome, w: &mut dyn Write) -> io::Result<()> {
    match outcome {
        SubmitOutcome::NothingPending => writeln!(w, "{}", ErrorCode::NothingPending.message()),
        SubmitOutcome::Applied { message, count } => {
            if message.is_empty() {
                writeln!(w, "✓ Assigned {count} employees")
            } else {
                writeln!(w, "✓ {message}")
            }
        }
        SubmitOutcome::Partial {
            message,
            applied,
            failed,
            errors,
        } => {
            writeln!(w, "⚠ {applied} assigned, {failed} failed: {message}")?;
            for error in errors {
                writeln!(w, "  - {error}")?;
            }
            Ok(())
        }
    }
}
