//! `wl create-department`: add a team that employees can be assigned to.

use super::Context;
use crate::output::{render, report};
use clap::Args;
use std::io::{self, Write};
use worklist_core::assign::{GroupOutcome, SubmitError, create_group};

#[derive(Args, Debug, Clone)]
pub struct CreateDepartmentArgs {
    /// Name of the new department.
    pub name: String,
}

pub fn run_create_department(args: &CreateDepartmentArgs, ctx: &Context) -> anyhow::Result<()> {
    if args.name.trim().is_empty() {
        return report(ctx.output, Err(SubmitError::EmptyName));
    }
    let remote = ctx.remote()?;
    let outcome = report(ctx.output, create_group(&remote, &args.name))?;
    render(ctx.output, &outcome, write_outcome)
}

fn write_outcome(outcome: &GroupOutcome, w: &mut dyn Write) -> io::Result<()> {
    match outcome {
        GroupOutcome::Created(message) if message.is_empty() => writeln!(w, "✓ Department created"),
        GroupOutcome::Created(message) => writeln!(w, "✓ {message}"),
        GroupOutcome::AlreadyExists(message) if message.is_empty() => {
            writeln!(w, "Department already exists; nothing created")
        }
        GroupOutcome::AlreadyExists(message) => writeln!(w, "{message}"),
    }
}
