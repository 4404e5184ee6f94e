//! `wl calendar`: opportunities laid out by closing date.

use super::Context;
use crate::output::{pretty_kv, pretty_section, render_mode, report, text_row};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use worklist_core::model::calendar::{
    CalendarEvent, CalendarFilterOptions, CalendarFilters, group_by_day,
};
use worklist_core::model::parse_iso_date;
use worklist_core::remote::RemoteSource;

#[derive(Args, Debug, Clone, Default)]
pub struct CalendarArgs {
    /// First day shown (YYYY-MM-DD).
    #[arg(long, value_parser = parse_iso_date, required_unless_present = "options")]
    pub start: Option<NaiveDate>,

    /// Last day shown (YYYY-MM-DD).
    #[arg(long, value_parser = parse_iso_date, required_unless_present = "options")]
    pub end: Option<NaiveDate>,

    /// Only opportunities with this status.
    #[arg(long)]
    pub status: Option<String>,

    /// Only opportunities owned by this user.
    #[arg(long)]
    pub owner: Option<String>,

    /// Only opportunities with this responsible engineer.
    #[arg(long)]
    pub engineer: Option<String>,

    /// Only opportunities with this urgency level.
    #[arg(long)]
    pub urgency: Option<String>,

    /// List the values accepted by the filters instead of events.
    #[arg(long)]
    pub options: bool,
}

impl CalendarArgs {
    pub fn filters(&self) -> CalendarFilters {
        CalendarFilters {
            status: self.status.clone(),
            opportunity_owner: self.owner.clone(),
            custom_resp_eng: self.engineer.clone(),
            urgency_level: self.urgency.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Serialize)]
pub struct CalendarReport<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub filters: CalendarFilters,
    pub days: Vec<CalendarDay<'a>>,
    /// Events the platform sent without a usable start date.
    pub undated: usize,
}

pub fn build_report(
    start: NaiveDate,
    end: NaiveDate,
    filters: CalendarFilters,
    events: &[CalendarEvent],
) -> CalendarReport<'_> {
    let days: Vec<CalendarDay<'_>> = group_by_day(events)
        .into_iter()
        .map(|(date, events)| CalendarDay { date, events })
        .collect();
    let placed: usize = days.iter().map(|d| d.events.len()).sum();
    CalendarReport {
        start,
        end,
        filters,
        days,
        undated: events.len() - placed,
    }
}

pub fn run_calendar(args: &CalendarArgs, ctx: &Context) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    if args.options {
        let options = report(ctx.output, remote.get_calendar_filter_options())?;
        return render_mode(ctx.output, &options, write_options, write_options);
    }

    let (Some(start), Some(end)) = (args.start, args.end) else {
        anyhow::bail!("--start and --end are required");
    };
    ctx.check_range(Some(start), Some(end))?;

    let filters = args.filters();
    let events = report(
        ctx.output,
        remote.get_calendar_events(start, end, &filters),
    )?;
    let value = build_report(start, end, filters, &events);
    render_mode(ctx.output, &value, write_text, write_pretty)
}

fn describe(event: &CalendarEvent) -> String {
    let details = &event.details;
    let mut parts = vec![event.id.clone(), event.title.clone()];
    if let Some(urgency) = &details.urgency {
        parts.push(format!("[{urgency}]"));
    }
    if let Some(owner) = &details.owner {
        parts.push(format!("owner {owner}"));
    }
    if let Some(engineer) = &details.resp_eng {
        parts.push(format!("engineer {engineer}"));
    }
    parts.join("  ")
}

fn write_text(value: &CalendarReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for day in &value.days {
        for event in &day.events {
            let details = &event.details;
            text_row(
                w,
                &[
                    day.date.to_string(),
                    event.id.clone(),
                    event.title.clone(),
                    details.status.clone().unwrap_or_default(),
                    details.urgency.clone().unwrap_or_default(),
                    details.owner.clone().unwrap_or_default(),
                ],
            )?;
        }
    }
    Ok(())
}

fn write_pretty(value: &CalendarReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Calendar {} to {}", value.start, value.end))?;
    if value.days.is_empty() {
        writeln!(w, "No opportunities close in this period.")?;
    }
    for day in &value.days {
        writeln!(w, "{} ({})", day.date, day.date.format("%a"))?;
        for event in &day.events {
            writeln!(w, "  {}", describe(event))?;
        }
    }
    if value.undated > 0 {
        writeln!(w, "({} events without a date not shown)", value.undated)?;
    }
    Ok(())
}

fn write_options(options: &CalendarFilterOptions, w: &mut dyn Write) -> io::Result<()> {
    pretty_kv(w, "Statuses", options.statuses.join(", "))?;
    pretty_kv(w, "Owners", options.owners.join(", "))?;
    pretty_kv(w, "Engineers", options.resp_engs.join(", "))?;
    pretty_kv(w, "Urgency", options.urgency_levels.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CalendarArgs,
    }

    fn event(id: &str, start: Option<NaiveDate>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("{id} title"),
            start,
            ..CalendarEvent::default()
        }
    }

    #[test]
    fn range_is_required_unless_listing_options() {
        assert!(Wrapper::try_parse_from(["test", "--start", "2026-10-01"]).is_err());
        let parsed = Wrapper::parse_from(["test", "--options"]);
        assert!(parsed.args.options);
        let ranged = Wrapper::parse_from([
            "test",
            "--start",
            "2026-10-01",
            "--end",
            "2026-10-31",
            "--engineer",
            "ana",
        ]);
        assert_eq!(ranged.args.filters().custom_resp_eng.as_deref(), Some("ana"));
        assert!(ranged.args.filters().status.is_none());
    }

    #[test]
    fn report_groups_events_by_day() {
        let d1 = NaiveDate::from_ymd_opt(2026, 10, 20).expect("date");
        let d2 = NaiveDate::from_ymd_opt(2026, 10, 22).expect("date");
        let events = vec![
            event("B", Some(d2)),
            event("A", Some(d1)),
            event("C", Some(d2)),
            event("X", None),
        ];
        let value = build_report(d1, d2, CalendarFilters::default(), &events);
        assert_eq!(value.days.len(), 2);
        assert_eq!(value.days[0].date, d1);
        let second: Vec<_> = value.days[1].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(second, vec!["B", "C"]);
        assert_eq!(value.undated, 1);
    }

    #[test]
    fn text_rows_carry_the_date() {
        let d1 = NaiveDate::from_ymd_opt(2026, 10, 20).expect("date");
        let events = vec![event("A", Some(d1))];
        let value = build_report(d1, d1, CalendarFilters::default(), &events);
        let mut buf = Vec::new();
        write_text(&value, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("2026-10-20\tA\tA title"));
    }
}
