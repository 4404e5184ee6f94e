//! Shared worklist filters and rendering for `wl mine` and `wl team`.

use super::Context;
use crate::output::{
    OutputMode, pretty_kv, pretty_section, pretty_table, render_mode, report, text_row,
};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use worklist_core::filter::FilterState;
use worklist_core::model::item::UrgencyLevel;
use worklist_core::model::team::MemberStat;
use worklist_core::remote::RemoteSource;
use worklist_core::sort::{MissingDays, SortColumn};
use worklist_core::view::controller::WorklistController;
use worklist_core::view::render::{RenderedWorklist, render};
use worklist_core::view::{ViewConfig, ViewPreset};

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only items with this urgency (overdue, due_today, critical, high, medium, low, unknown).
    #[arg(long)]
    pub urgency: Option<UrgencyLevel>,

    /// Case-insensitive search over opportunity, title and customer.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only items of this department.
    #[arg(long)]
    pub department: Option<String>,

    /// Sort by column. Repeat to click again (same column flips the order).
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Vec<SortColumn>,

    /// Where items without days remaining go: last or first.
    #[arg(long, value_name = "PLACEMENT")]
    pub missing_days: Option<MissingDays>,
}

impl ListArgs {
    pub fn filter_state(&self, hide_overdue: bool) -> FilterState {
        FilterState {
            department: self.department.clone(),
            status: None,
            search: self.search.clone().unwrap_or_default(),
            urgency: self.urgency,
            hide_overdue,
        }
    }

    pub fn view_config(&self, preset: ViewPreset, ctx: &Context) -> ViewConfig {
        preset
            .config()
            .with_missing_days(self.missing_days.unwrap_or(ctx.worklist().missing_days))
    }
}

#[derive(Debug, Serialize)]
pub struct WorklistReport {
    #[serde(flatten)]
    pub worklist: RenderedWorklist,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub member_stats: Vec<MemberStat>,
}

/// Apply filters and header clicks, load, and print the result.
pub fn run_list<R: RemoteSource>(
    ctx: &Context,
    mut controller: WorklistController<R>,
    args: &ListArgs,
    hide_overdue: bool,
) -> anyhow::Result<()> {
    controller.view_mut().filter = args.filter_state(hide_overdue);
    for column in &args.sort {
        controller.view_mut().toggle_sort(*column);
    }

    report(ctx.output, controller.reload(Context::today()))?;

    let report_value = WorklistReport {
        worklist: render(controller.view()),
        team: controller.team().map(String::from),
        member_stats: controller.member_stats().to_vec(),
    };
    print_report(ctx.output, ctx.quiet, &report_value)
}

pub fn print_report(mode: OutputMode, quiet: bool, value: &WorklistReport) -> anyhow::Result<()> {
    render_mode(mode, value, write_text, |v, w| write_pretty(v, quiet, w))
}

const fn title(preset: ViewPreset) -> &'static str {
    match preset {
        ViewPreset::MyOpen => "My Opportunities",
        ViewPreset::MyCompleted => "My Completed Opportunities",
        ViewPreset::Team => "Team Opportunities",
    }
}

fn header_labels(worklist: &RenderedWorklist, with_indicator: bool) -> Vec<String> {
    worklist
        .header
        .iter()
        .map(|cell| {
            if with_indicator && !cell.indicator.is_empty() {
                format!("{} {}", cell.label, cell.indicator)
            } else {
                cell.label.to_string()
            }
        })
        .collect()
}

fn row_cells(worklist: &RenderedWorklist, marked: bool) -> Vec<Vec<String>> {
    worklist
        .rows
        .iter()
        .map(|row| {
            worklist
                .header
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let text = row.cell(cell.column);
                    match (marked, i) {
                        (true, 0) if row.highlighted => format!("* {text}"),
                        (true, 0) => format!("  {text}"),
                        _ => text,
                    }
                })
                .collect()
        })
        .collect()
}

fn write_text(value: &WorklistReport, w: &mut dyn Write) -> io::Result<()> {
    let worklist = &value.worklist;
    if let Some(message) = worklist.empty_message {
        return writeln!(w, "{message}");
    }
    text_row(w, &header_labels(worklist, false))?;
    for row in row_cells(worklist, false) {
        text_row(w, &row)?;
    }
    Ok(())
}

fn write_pretty(value: &WorklistReport, quiet: bool, w: &mut dyn Write) -> io::Result<()> {
    let worklist = &value.worklist;
    let heading = match &value.team {
        Some(team) => format!("{} · {team}", title(worklist.preset)),
        None if worklist.preset == ViewPreset::Team => {
            format!("{} · all teams", title(worklist.preset))
        }
        None => title(worklist.preset).to_string(),
    };
    pretty_section(w, &heading)?;

    if !quiet {
        let cards: Vec<String> = worklist
            .summary
            .iter()
            .map(|card| format!("{}: {}", card.label, card.count))
            .collect();
        writeln!(w, "{}", cards.join("   "))?;
        writeln!(w)?;
    }

    match worklist.empty_message {
        Some(message) => writeln!(w, "{message}")?,
        None => pretty_table(w, &header_labels(worklist, true), &row_cells(worklist, true))?,
    }

    if !value.member_stats.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Team members")?;
        for stat in &value.member_stats {
            pretty_kv(
                w,
                &stat.name,
                format!(
                    "{} open, {} overdue, {} due today",
                    stat.open, stat.overdue, stat.due_today
                ),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use worklist_core::model::item::{RawWorkItem, WorkItem};
    use worklist_core::sort::SortOrder;
    use worklist_core::view::WorklistView;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ListArgs,
    }

    fn report_for(items: Vec<RawWorkItem>, hide_overdue: bool) -> WorklistReport {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).expect("date");
        let mut view = WorklistView::new(ViewPreset::MyOpen.config());
        view.filter.hide_overdue = hide_overdue;
        view.replace_items(WorkItem::from_raw_batch(items, today));
        WorklistReport {
            worklist: render(&view),
            team: None,
            member_stats: Vec::new(),
        }
    }

    #[test]
    fn list_args_parse_repeated_sort() {
        let parsed = Wrapper::parse_from([
            "test",
            "--urgency",
            "due-today",
            "--sort",
            "days",
            "--sort",
            "days_remaining",
            "--missing-days",
            "first",
        ]);
        assert_eq!(parsed.args.urgency, Some(UrgencyLevel::DueToday));
        assert_eq!(
            parsed.args.sort,
            vec![SortColumn::DaysRemaining, SortColumn::DaysRemaining]
        );
        assert_eq!(parsed.args.missing_days, Some(MissingDays::First));
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        assert!(Wrapper::try_parse_from(["test", "--sort", "priority"]).is_err());
    }

    #[test]
    fn filter_state_carries_hide_overdue() {
        let args = ListArgs {
            search: Some("globex".to_string()),
            ..ListArgs::default()
        };
        let state = args.filter_state(true);
        assert!(state.hide_overdue);
        assert_eq!(state.search, "globex");
    }

    #[test]
    fn view_config_prefers_flag_over_settings() {
        let ctx = super::super::testing::context();
        let args = ListArgs {
            missing_days: Some(MissingDays::First),
            ..ListArgs::default()
        };
        let config = args.view_config(ViewPreset::Team, &ctx);
        assert_eq!(config.missing_days, MissingDays::First);
        assert_eq!(config.default_sort.order, SortOrder::Asc);
    }

    #[test]
    fn text_output_is_tab_separated() {
        let report_value = report_for(
            vec![RawWorkItem {
                id: "CRM-OPP-1".to_string(),
                party: Some("Globex".to_string()),
                ..RawWorkItem::default()
            }],
            false,
        );
        let mut buf = Vec::new();
        write_text(&report_value, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Urgency\tOpportunity\tCustomer"));
        assert!(lines[1].starts_with("No date\tCRM-OPP-1\tGlobex"));
    }

    #[test]
    fn pretty_output_shows_empty_state_and_cards() {
        let report_value = report_for(Vec::new(), true);
        let mut buf = Vec::new();
        write_pretty(&report_value, false, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("My Opportunities"));
        assert!(text.contains("Total Open: 0"));
        assert!(text.contains("(overdue hidden)"));
    }
}
