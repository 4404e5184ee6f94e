//! One parameterised worklist component.
//!
//! The personal open list, the personal completed list and the team list are
//! presets of the same view. Each preset yields a [`ViewConfig`] describing
//! its columns, summary cards, highlight rules and sort defaults. A
//! [`WorklistView`] holds the loaded items together with the session's
//! filter and sort state; nothing about a view lives in globals.

pub mod controller;
pub mod render;

use crate::filter::FilterState;
use crate::model::ParseEnumError;
use crate::model::item::{UrgencyLevel, WorkItem};
use crate::model::normalize;
use crate::sort::{self, MissingDays, SortColumn, SortState};
use serde::Serialize;
use std::{fmt, str::FromStr};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPreset {
    MyOpen,
    MyCompleted,
    Team,
}

impl ViewPreset {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MyOpen => "my_open",
            Self::MyCompleted => "my_completed",
            Self::Team => "team",
        }
    }

    /// Whether the preset asks the platform for completed items.
    #[must_use]
    pub const fn include_completed(self) -> bool {
        matches!(self, Self::MyCompleted)
    }

    #[must_use]
    pub fn config(self) -> ViewConfig {
        match self {
            Self::MyOpen => ViewConfig {
                preset: self,
                columns: vec![
                    Column::Badge,
                    Column::Opportunity,
                    Column::Customer,
                    Column::ClosingDate,
                    Column::DaysRemaining,
                    Column::Items,
                ],
                summary: SummaryKind::Open,
                hide_overdue_applies: true,
                highlight: vec![
                    UrgencyLevel::DueToday,
                    UrgencyLevel::Critical,
                    UrgencyLevel::High,
                ],
                missing_days: MissingDays::Last,
                default_sort: SortState::default(),
            },
            Self::MyCompleted => ViewConfig {
                preset: self,
                columns: vec![
                    Column::Badge,
                    Column::Opportunity,
                    Column::Customer,
                    Column::Status,
                    Column::ClosingDate,
                    Column::Items,
                ],
                summary: SummaryKind::Completed,
                hide_overdue_applies: false,
                highlight: Vec::new(),
                missing_days: MissingDays::Last,
                default_sort: SortState::default(),
            },
            Self::Team => ViewConfig {
                preset: self,
                columns: vec![
                    Column::Badge,
                    Column::Opportunity,
                    Column::Customer,
                    Column::ClosingDate,
                    Column::DaysRemaining,
                    Column::Assignees,
                ],
                summary: SummaryKind::Team,
                hide_overdue_applies: false,
                highlight: vec![UrgencyLevel::DueToday],
                missing_days: MissingDays::Last,
                default_sort: SortState::default(),
            },
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewPreset {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "my_open" | "open" | "mine" => Ok(Self::MyOpen),
            "my_completed" | "completed" => Ok(Self::MyCompleted),
            "team" => Ok(Self::Team),
            _ => Err(ParseEnumError {
                expected: "view preset",
                got: s.to_string(),
            }),
        }
    }
}

/// Table columns a preset may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Urgency badge, or the status badge on completed lists.
    Badge,
    Opportunity,
    Customer,
    Status,
    ClosingDate,
    DaysRemaining,
    Items,
    Assignees,
}

impl Column {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Badge => "Urgency",
            Self::Opportunity => "Opportunity",
            Self::Customer => "Customer",
            Self::Status => "Status",
            Self::ClosingDate => "Closing Date",
            Self::DaysRemaining => "Days Left",
            Self::Items => "Items",
            Self::Assignees => "Assigned To",
        }
    }

    /// The sort column behind this header, if it is sortable.
    #[must_use]
    pub const fn sort_column(self) -> Option<SortColumn> {
        match self {
            Self::Badge => Some(SortColumn::Urgency),
            Self::Opportunity => Some(SortColumn::Opportunity),
            Self::Customer => Some(SortColumn::Customer),
            Self::Status => Some(SortColumn::Status),
            Self::ClosingDate => Some(SortColumn::ClosingDate),
            Self::DaysRemaining => Some(SortColumn::DaysRemaining),
            Self::Items | Self::Assignees => None,
        }
    }
}

/// Which counters the summary cards show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// total / overdue / due today / due tomorrow
    Open,
    /// total / converted / closed / lost
    Completed,
    /// total / overdue / due today / due soon
    Team,
}

/// Static description of one preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewConfig {
    pub preset: ViewPreset,
    pub columns: Vec<Column>,
    pub summary: SummaryKind,
    /// The hide-overdue toggle only exists on the personal open list.
    pub hide_overdue_applies: bool,
    pub highlight: Vec<UrgencyLevel>,
    pub missing_days: MissingDays,
    pub default_sort: SortState,
}

impl ViewConfig {
    #[must_use]
    pub fn with_missing_days(mut self, missing_days: MissingDays) -> Self {
        self.missing_days = missing_days;
        self
    }

    #[must_use]
    pub fn is_highlighted(&self, urgency: UrgencyLevel) -> bool {
        self.highlight.contains(&urgency)
    }
}

/// Loaded items plus the transient state of one view session.
#[derive(Debug, Clone)]
pub struct WorklistView {
    pub config: ViewConfig,
    pub items: Vec<WorkItem>,
    pub filter: FilterState,
    pub sort: SortState,
}

impl WorklistView {
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        let sort = config.default_sort;
        Self {
            config,
            items: Vec::new(),
            filter: FilterState::default(),
            sort,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    /// Swap in a fresh load. Filter and sort state survive reloads.
    pub fn replace_items(&mut self, items: Vec<WorkItem>) {
        debug!(
            preset = %self.config.preset,
            count = items.len(),
            "worklist items replaced"
        );
        self.items = items;
    }

    /// Header click.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
        debug!(column = %self.sort.column, order = ?self.sort.order, "sort toggled");
    }

    /// The filter actually in force: hide-overdue is ignored by presets
    /// that do not offer it.
    #[must_use]
    pub fn effective_filter(&self) -> FilterState {
        let mut filter = self.filter.clone();
        if !self.config.hide_overdue_applies {
            filter.hide_overdue = false;
        }
        filter
    }

    /// Filtered, then sorted, items.
    #[must_use]
    pub fn visible(&self) -> Vec<&WorkItem> {
        let mut rows = self.effective_filter().apply(&self.items);
        sort::sort(&mut rows, self.sort, self.config.missing_days);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::RawWorkItem;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn items(offsets: &[(&str, Option<i64>)]) -> Vec<WorkItem> {
        offsets
            .iter()
            .map(|(id, off)| {
                WorkItem::from_raw(
                    RawWorkItem {
                        id: (*id).to_string(),
                        closing_date: off.map(|d| today() + chrono::Duration::days(d)),
                        ..RawWorkItem::default()
                    },
                    today(),
                )
            })
            .collect()
    }

    #[test]
    fn presets_parse_and_configure() {
        assert_eq!("team".parse::<ViewPreset>().unwrap(), ViewPreset::Team);
        assert_eq!(
            "completed".parse::<ViewPreset>().unwrap(),
            ViewPreset::MyCompleted
        );
        let open = ViewPreset::MyOpen.config();
        assert!(open.hide_overdue_applies);
        assert!(open.is_highlighted(UrgencyLevel::High));
        let team = ViewPreset::Team.config();
        assert!(team.is_highlighted(UrgencyLevel::DueToday));
        assert!(!team.is_highlighted(UrgencyLevel::Critical));
        assert!(team.columns.contains(&Column::Assignees));
        assert!(ViewPreset::MyCompleted.include_completed());
    }

    #[test]
    fn visible_filters_then_sorts() {
        let mut view = WorklistView::new(ViewPreset::MyOpen.config()).with_filter(FilterState {
            hide_overdue: true,
            ..FilterState::default()
        });
        view.replace_items(items(&[
            ("none", None),
            ("late", Some(-2)),
            ("far", Some(20)),
            ("near", Some(1)),
        ]));
        let ids: Vec<_> = view.visible().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far", "none"]);
    }

    #[test]
    fn hide_overdue_ignored_outside_open_list() {
        let mut view = WorklistView::new(ViewPreset::Team.config()).with_filter(FilterState {
            hide_overdue: true,
            ..FilterState::default()
        });
        view.replace_items(items(&[("late", Some(-2)), ("soon", Some(2))]));
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn toggle_sort_reverses_tie_free_rows() {
        let mut view = WorklistView::new(ViewPreset::MyOpen.config());
        view.replace_items(items(&[("a", Some(3)), ("b", Some(1)), ("c", Some(2))]));
        view.toggle_sort(SortColumn::DaysRemaining);
        let asc: Vec<_> = view.visible().iter().map(|i| i.id.clone()).collect();
        view.toggle_sort(SortColumn::DaysRemaining);
        let desc: Vec<_> = view.visible().iter().map(|i| i.id.clone()).collect();
        assert_eq!(asc, vec!["b", "c", "a"]);
        assert_eq!(desc, vec!["a", "c", "b"]);
    }

    #[test]
    fn missing_days_override_flows_into_sort() {
        let config = ViewPreset::MyOpen
            .config()
            .with_missing_days(MissingDays::First);
        let mut view = WorklistView::new(config);
        view.replace_items(items(&[("dated", Some(4)), ("none", None)]));
        view.toggle_sort(SortColumn::DaysRemaining);
        assert_eq!(view.visible()[0].id, "none");
    }
}
