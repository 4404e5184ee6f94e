//! `wl kpi`: on-time completion dashboard.

use super::Context;
use crate::output::{OutputMode, pretty_kv, pretty_section, pretty_table, render_mode, report, text_row};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use worklist_core::model::kpi::{KpiGrouping, KpiSummary, MemberKpi, PerformanceBand, rank_badge};
use worklist_core::model::parse_iso_date;
use worklist_core::remote::RemoteSource;

const BAR_WIDTH: u64 = 20;

#[derive(Args, Debug, Clone)]
pub struct KpiArgs {
    /// First day of the period (YYYY-MM-DD).
    #[arg(long, value_parser = parse_iso_date)]
    pub from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD).
    #[arg(long, value_parser = parse_iso_date)]
    pub to: Option<NaiveDate>,

    /// Break results down by employee or by team.
    #[arg(long, default_value_t = KpiGrouping::Employee)]
    pub by: KpiGrouping,
}

#[derive(Debug, Serialize)]
pub struct RankedKpi {
    pub rank: usize,
    pub badge: String,
    pub band: PerformanceBand,
    #[serde(flatten)]
    pub kpi: MemberKpi,
}

#[derive(Debug, Serialize)]
pub struct KpiReport {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub grouping: KpiGrouping,
    pub summary: KpiSummary,
    pub overall_band: PerformanceBand,
    pub breakdown: Vec<RankedKpi>,
}

/// Rank rows by on-time rate, best first. Equal rates keep platform order.
pub fn rank(mut rows: Vec<MemberKpi>) -> Vec<RankedKpi> {
    rows.sort_by(|a, b| b.on_time_rate.total_cmp(&a.on_time_rate));
    rows.into_iter()
        .enumerate()
        .map(|(i, kpi)| RankedKpi {
            rank: i + 1,
            badge: rank_badge(i + 1),
            band: PerformanceBand::from_rate(kpi.on_time_rate),
            kpi,
        })
        .collect()
}

/// On-time cells followed by late cells, scaled to `width`.
pub fn stacked_bar(on_time: u64, late: u64, width: u64) -> String {
    let total = on_time + late;
    if total == 0 {
        return String::new();
    }
    let filled = (on_time * width + total / 2) / total;
    let rest = width.saturating_sub(filled);
    format!(
        "{}{}",
        "█".repeat(usize::try_from(filled).unwrap_or(0)),
        "░".repeat(usize::try_from(rest).unwrap_or(0))
    )
}

pub fn build_report<R: RemoteSource + ?Sized>(
    remote: &R,
    args: &KpiArgs,
    output: OutputMode,
) -> anyhow::Result<KpiReport> {
    let summary = report(output, remote.get_kpi(args.from, args.to))?;
    let breakdown = report(
        output,
        remote.get_kpi_breakdown(args.from, args.to, args.by),
    )?;
    Ok(KpiReport {
        from: args.from,
        to: args.to,
        grouping: args.by,
        overall_band: PerformanceBand::from_rate(summary.on_time_rate),
        summary,
        breakdown: rank(breakdown),
    })
}

pub fn run_kpi(args: &KpiArgs, ctx: &Context) -> anyhow::Result<()> {
    ctx.check_range(args.from, args.to)?;
    let remote = ctx.remote()?;
    let value = build_report(&remote, args, ctx.output)?;
    render_mode(ctx.output, &value, write_text, write_pretty)
}

fn period(value: &KpiReport) -> String {
    let show = |d: Option<NaiveDate>| d.map_or_else(|| "…".to_string(), |d| d.to_string());
    match (value.from, value.to) {
        (None, None) => "all time".to_string(),
        (from, to) => format!("{} to {}", show(from), show(to)),
    }
}

fn median_label(days: Option<f64>) -> String {
    days.map_or_else(|| "-".to_string(), |d| format!("{d:.1}"))
}

fn write_text(value: &KpiReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &value.summary;
    text_row(
        w,
        &[
            "overall".to_string(),
            s.total.to_string(),
            s.completed.to_string(),
            s.completed_on_time.to_string(),
            s.completed_late.to_string(),
            s.still_open.to_string(),
            format!("{:.1}", s.on_time_rate),
            format!("{:.1}", s.overdue_rate),
            median_label(s.median_close_days),
        ],
    )?;
    for row in &value.breakdown {
        text_row(
            w,
            &[
                row.rank.to_string(),
                row.kpi.label().to_string(),
                row.kpi.total.to_string(),
                row.kpi.completed.to_string(),
                row.kpi.completed_on_time.to_string(),
                row.kpi.completed_late.to_string(),
                row.kpi.still_open.to_string(),
                format!("{:.1}", row.kpi.on_time_rate),
                row.band.to_string(),
            ],
        )?;
    }
    Ok(())
}

fn write_pretty(value: &KpiReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &value.summary;
    pretty_section(w, &format!("Opportunity KPI ({})", period(value)))?;
    pretty_kv(w, "Total", s.total.to_string())?;
    pretty_kv(w, "Completed", s.completed.to_string())?;
    pretty_kv(w, "On time", s.completed_on_time.to_string())?;
    pretty_kv(w, "Late", s.completed_late.to_string())?;
    pretty_kv(w, "Still open", s.still_open.to_string())?;
    pretty_kv(
        w,
        "On-time rate",
        format!("{:.1}% ({})", s.on_time_rate, value.overall_band),
    )?;
    pretty_kv(w, "Overdue rate", format!("{:.1}%", s.overdue_rate))?;
    pretty_kv(w, "Median close", median_label(s.median_close_days))?;
    writeln!(w)?;

    if value.breakdown.is_empty() {
        return writeln!(w, "No completed opportunities in this period.");
    }

    let headers: Vec<String> = [
        "Rank",
        value.grouping.column_label(),
        "Total",
        "Completed",
        "On time",
        "Late",
        "Open",
        "Rate",
        "",
    ]
    .iter()
    .map(|h| (*h).to_string())
    .collect();
    let rows: Vec<Vec<String>> = value
        .breakdown
        .iter()
        .map(|row| {
            vec![
                row.badge.clone(),
                row.kpi.label().to_string(),
                row.kpi.total.to_string(),
                row.kpi.completed.to_string(),
                row.kpi.completed_on_time.to_string(),
                row.kpi.completed_late.to_string(),
                row.kpi.still_open.to_string(),
                format!("{:.1}% {}", row.kpi.on_time_rate, row.band),
                stacked_bar(row.kpi.completed_on_time, row.kpi.completed_late, BAR_WIDTH),
            ]
        })
        .collect();
    pretty_table(w, &headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: KpiArgs,
    }

    fn member(name: &str, rate: f64) -> MemberKpi {
        MemberKpi {
            name: Some(name.to_string()),
            on_time_rate: rate,
            ..MemberKpi::default()
        }
    }

    #[test]
    fn kpi_args_parse_dates_and_grouping() {
        let parsed = Wrapper::parse_from(["test", "--from", "2026-01-01", "--by", "team"]);
        assert_eq!(parsed.args.from, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert!(parsed.args.to.is_none());
        assert_eq!(parsed.args.by, KpiGrouping::Team);

        let defaulted = Wrapper::parse_from(["test"]);
        assert_eq!(defaulted.args.by, KpiGrouping::Employee);
        assert!(Wrapper::try_parse_from(["test", "--from", "01/02/2026"]).is_err());
    }

    #[test]
    fn ranking_puts_best_rate_first_and_keeps_ties_stable() {
        let ranked = rank(vec![
            member("Ann", 50.0),
            member("Bob", 95.0),
            member("Cid", 50.0),
            member("Dee", 10.0),
        ]);
        let names: Vec<_> = ranked.iter().map(|r| r.kpi.label()).collect();
        assert_eq!(names, vec!["Bob", "Ann", "Cid", "Dee"]);
        assert_eq!(ranked[0].badge, "gold");
        assert_eq!(ranked[0].band, PerformanceBand::Excellent);
        assert_eq!(ranked[3].badge, "#4");
        assert_eq!(ranked[3].band, PerformanceBand::Poor);
    }

    #[test]
    fn stacked_bar_scales_to_width() {
        assert_eq!(stacked_bar(0, 0, 10), "");
        assert_eq!(stacked_bar(1, 1, 10), "█████░░░░░");
        assert_eq!(stacked_bar(3, 0, 4), "████");
        assert_eq!(stacked_bar(0, 2, 4), "░░░░");
    }

    #[test]
    fn text_output_carries_open_work_and_close_time() {
        let report_value = KpiReport {
            from: None,
            to: None,
            grouping: KpiGrouping::Team,
            summary: KpiSummary {
                total: 12,
                completed: 8,
                still_open: 4,
                overdue_rate: 25.0,
                median_close_days: Some(6.0),
                ..KpiSummary::default()
            },
            overall_band: PerformanceBand::Poor,
            breakdown: rank(vec![MemberKpi {
                completed: 3,
                still_open: 2,
                ..member("Sales", 80.0)
            }]),
        };
        let mut buf = Vec::new();
        write_text(&report_value, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("overall\t12\t8\t0\t0\t4\t0.0\t25.0\t6.0")
        );
        assert_eq!(lines.next(), Some("1\tSales\t0\t3\t0\t0\t2\t80.0\tgood"));
        assert_eq!(median_label(None), "-");
    }

    #[test]
    fn period_label() {
        let report_value = KpiReport {
            from: NaiveDate::from_ymd_opt(2026, 1, 1),
            to: None,
            grouping: KpiGrouping::Employee,
            summary: KpiSummary::default(),
            overall_band: PerformanceBand::Poor,
            breakdown: Vec::new(),
        };
        assert_eq!(period(&report_value), "2026-01-01 to …");
    }
}
