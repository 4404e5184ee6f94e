//! `wl employees`: the team-assignment roster with headcount stats.

use super::Context;
use crate::output::{pretty_kv, pretty_section, pretty_table, render_mode, report, text_row};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use worklist_core::filter::FilterState;
use worklist_core::model::item::AssignmentStatus;
use worklist_core::model::roster::{Employee, EmployeeStats};
use worklist_core::remote::RemoteSource;

#[derive(Args, Debug, Clone, Default)]
pub struct EmployeesArgs {
    /// Only employees of this department.
    #[arg(long)]
    pub department: Option<String>,

    /// Only assigned, unassigned or linked employees.
    #[arg(long)]
    pub status: Option<AssignmentStatus>,

    /// Case-insensitive search over employee name, user full name and designation.
    #[arg(short, long)]
    pub search: Option<String>,
}

impl EmployeesArgs {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            department: self.department.clone(),
            status: self.status,
            search: self.search.clone().unwrap_or_default(),
            ..FilterState::default()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RosterReport {
    pub stats: EmployeeStats,
    pub departments: Vec<String>,
    /// Employees before filtering.
    pub total: usize,
    pub employees: Vec<Employee>,
}

pub fn build_report<R: RemoteSource + ?Sized>(
    remote: &R,
    args: &EmployeesArgs,
    ctx: &Context,
) -> anyhow::Result<RosterReport> {
    let roster = report(ctx.output, remote.get_employees())?;
    let departments = report(ctx.output, remote.get_departments())?;
    let stats = report(ctx.output, remote.get_employee_stats())?;

    let employees: Vec<Employee> = args
        .filter_state()
        .apply(&roster)
        .into_iter()
        .cloned()
        .collect();
    Ok(RosterReport {
        stats,
        departments: departments.iter().map(|d| d.label().to_string()).collect(),
        total: roster.len(),
        employees,
    })
}

pub fn run_employees(args: &EmployeesArgs, ctx: &Context) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    let value = build_report(&remote, args, ctx)?;
    render_mode(ctx.output, &value, write_text, |v, w| {
        write_pretty(v, ctx.quiet, w)
    })
}

fn cells(employee: &Employee) -> Vec<String> {
    vec![
        employee.id.clone(),
        employee.employee_name.clone(),
        employee.department.clone().unwrap_or_default(),
        employee.designation.clone().unwrap_or_default(),
        employee.user_label().unwrap_or_default().to_string(),
    ]
}

fn write_text(value: &RosterReport, w: &mut dyn Write) -> io::Result<()> {
    for employee in &value.employees {
        text_row(w, &cells(employee))?;
    }
    Ok(())
}

fn write_pretty(value: &RosterReport, quiet: bool, w: &mut dyn Write) -> io::Result<()> {
    if !quiet {
        let totals = &value.stats.stats;
        pretty_section(w, "Roster")?;
        pretty_kv(w, "Employees", totals.total_employees.to_string())?;
        pretty_kv(w, "Assigned", totals.assigned.to_string())?;
        pretty_kv(w, "Unassigned", totals.unassigned.to_string())?;
        pretty_kv(w, "Linked to user", totals.linked_to_user.to_string())?;
        for entry in &value.stats.department_breakdown {
            pretty_kv(w, &format!("  {}", entry.department), entry.count.to_string())?;
        }
        writeln!(w)?;
    }

    if value.employees.is_empty() {
        return writeln!(w, "No employees match the current filters.");
    }
    let headers: Vec<String> = ["Employee", "Name", "Department", "Designation", "User"]
        .iter()
        .map(|h| (*h).to_string())
        .collect();
    let rows: Vec<Vec<String>> = value.employees.iter().map(cells).collect();
    pretty_table(w, &headers, &rows)?;
    writeln!(w, "{} of {} employees", value.employees.len(), value.total)
}
