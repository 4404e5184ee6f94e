//! Projection of a view into display rows, header cells and summary cards.
//!
//! Output here is plain data. The CLI turns it into text, tables or JSON.

use super::{Column, SummaryKind, ViewConfig, ViewPreset, WorklistView};
use crate::model::item::{UrgencyLevel, WorkItem};
use crate::sort::SortState;
use crate::urgency;
use serde::Serialize;

pub const NO_DATE: &str = "Not set";
pub const NO_DAYS: &str = "-";
pub const NO_PARTY: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub column: Column,
    pub label: &'static str,
    /// Sort arrow, empty for unsortable columns.
    pub indicator: &'static str,
}

/// One table row, every cell already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: String,
    pub urgency: UrgencyLevel,
    pub badge: String,
    pub customer: String,
    pub status: String,
    pub closing_date: String,
    pub days_remaining: String,
    pub items: String,
    pub assignees: Vec<String>,
    pub highlighted: bool,
    pub task_id: Option<String>,
}

impl RowView {
    /// Text for one column of this row.
    #[must_use]
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Badge => self.badge.clone(),
            Column::Opportunity => self.id.clone(),
            Column::Customer => self.customer.clone(),
            Column::Status => self.status.clone(),
            Column::ClosingDate => self.closing_date.clone(),
            Column::DaysRemaining => self.days_remaining.clone(),
            Column::Items => self.items.clone(),
            Column::Assignees => self.assignees.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedWorklist {
    pub preset: ViewPreset,
    pub summary: Vec<SummaryCard>,
    pub header: Vec<HeaderCell>,
    pub rows: Vec<RowView>,
    /// Friendly message shown instead of the table when there are no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

/// Badge text on completed lists.
#[must_use]
pub fn status_badge(status: &str) -> String {
    match status {
        "Converted" => "✓ Converted".to_string(),
        other => other.to_string(),
    }
}

/// Summary cards for a preset. Counts cover every loaded item, before the
/// view's filters.
#[must_use]
pub fn summarize(kind: SummaryKind, items: &[WorkItem]) -> Vec<SummaryCard> {
    let with_urgency = |levels: &[UrgencyLevel]| {
        items
            .iter()
            .filter(|i| levels.contains(&i.urgency))
            .count()
    };
    let with_status = |status: &str| items.iter().filter(|i| i.status == status).count();
    let card = |label, count| SummaryCard { label, count };

    match kind {
        SummaryKind::Open => vec![
            card("Total Open", items.len()),
            card("Overdue", with_urgency(&[UrgencyLevel::Overdue])),
            card("Due Today", with_urgency(&[UrgencyLevel::DueToday])),
            card("Due Tomorrow", with_urgency(&[UrgencyLevel::Critical])),
        ],
        SummaryKind::Team => vec![
            card("Total Open", items.len()),
            card("Overdue", with_urgency(&[UrgencyLevel::Overdue])),
            card("Due Today", with_urgency(&[UrgencyLevel::DueToday])),
            card(
                "Due in 3 days",
                with_urgency(&[UrgencyLevel::Critical, UrgencyLevel::High]),
            ),
        ],
        SummaryKind::Completed => vec![
            card("Total Completed", items.len()),
            card("Converted", with_status("Converted")),
            card("Closed", with_status("Closed")),
            card("Lost", with_status("Lost")),
        ],
    }
}

fn header(config: &ViewConfig, sort: &SortState) -> Vec<HeaderCell> {
    config
        .columns
        .iter()
        .map(|&column| HeaderCell {
            column,
            label: column.label(),
            indicator: column.sort_column().map_or("", |c| sort.indicator(c)),
        })
        .collect()
}

fn row(config: &ViewConfig, item: &WorkItem) -> RowView {
    let badge = match config.summary {
        SummaryKind::Completed => status_badge(&item.status),
        SummaryKind::Open | SummaryKind::Team => {
            urgency::badge(item.urgency, item.days_remaining)
        }
    };
    RowView {
        id: item.id.clone(),
        urgency: item.urgency,
        badge,
        customer: item.party.clone().unwrap_or_else(|| NO_PARTY.to_string()),
        status: item.status.clone(),
        closing_date: item
            .closing_date
            .map_or_else(|| NO_DATE.to_string(), |d| d.format("%Y-%m-%d").to_string()),
        days_remaining: item
            .days_remaining
            .map_or_else(|| NO_DAYS.to_string(), |d| d.to_string()),
        items: format!("{} items", item.item_count),
        assignees: item.assignees.iter().map(ToString::to_string).collect(),
        highlighted: config.is_highlighted(item.urgency),
        task_id: item.task_id.clone(),
    }
}

fn empty_message(view: &WorklistView) -> &'static str {
    let filter = view.effective_filter();
    let narrowed = !filter.search.trim().is_empty()
        || filter.urgency.is_some()
        || filter.department.is_some()
        || filter.status.is_some();
    match view.config.preset {
        ViewPreset::MyCompleted => "No completed opportunities!",
        _ if narrowed && !view.items.is_empty() => "No opportunities match the current filters.",
        ViewPreset::Team => "No open opportunities for this team!",
        ViewPreset::MyOpen if filter.hide_overdue => {
            "No open opportunities! You have no pending tasks (overdue hidden)."
        }
        ViewPreset::MyOpen => "No open opportunities! You have no pending tasks.",
    }
}

/// Project a view into its display form.
#[must_use]
pub fn render(view: &WorklistView) -> RenderedWorklist {
    let rows: Vec<RowView> = view
        .visible()
        .into_iter()
        .map(|item| row(&view.config, item))
        .collect();
    let empty_message = rows.is_empty().then(|| empty_message(view));
    RenderedWorklist {
        preset: view.config.preset,
        summary: summarize(view.config.summary, &view.items),
        header: header(&view.config, &view.sort),
        rows,
        empty_message,
    }
}
