//! Column sorting for worklists.
//!
//! Sorting is stable and has no secondary key: records with equal keys keep
//! the relative order they had before the sort, in both directions.

use crate::model::item::{UrgencyLevel, WorkItem};
use crate::model::{ParseEnumError, normalize};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::{fmt, str::FromStr};

/// Rank used when a record has no urgency at all.
pub const MISSING_URGENCY_RANK: u8 = 99;

/// Sortable columns of the worklist table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Urgency,
    /// The opportunity identifier.
    Opportunity,
    Title,
    Customer,
    Status,
    ClosingDate,
    DaysRemaining,
}

impl SortColumn {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::Opportunity => "opportunity",
            Self::Title => "title",
            Self::Customer => "customer",
            Self::Status => "status",
            Self::ClosingDate => "closing_date",
            Self::DaysRemaining => "days_remaining",
        }
    }

    /// Table header text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgency => "Urgency",
            Self::Opportunity => "Opportunity",
            Self::Title => "Title",
            Self::Customer => "Customer",
            Self::Status => "Status",
            Self::ClosingDate => "Closing Date",
            Self::DaysRemaining => "Days Left",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "urgency" => Ok(Self::Urgency),
            "opportunity" | "id" => Ok(Self::Opportunity),
            "title" | "name" => Ok(Self::Title),
            "customer" | "party" => Ok(Self::Customer),
            "status" => Ok(Self::Status),
            "closing_date" | "date" => Ok(Self::ClosingDate),
            "days_remaining" | "days" | "days_left" => Ok(Self::DaysRemaining),
            _ => Err(ParseEnumError {
                expected: "sort column",
                got: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Header arrow for the active column.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// Where records without `days_remaining` land.
///
/// `Last` substitutes `+9999` (after every real value when ascending);
/// `First` substitutes `-9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDays {
    #[default]
    Last,
    First,
}

impl MissingDays {
    #[must_use]
    pub const fn sentinel(self) -> i64 {
        match self {
            Self::Last => 9999,
            Self::First => -9999,
        }
    }
}

impl FromStr for MissingDays {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "last" => Ok(Self::Last),
            "first" => Ok(Self::First),
            _ => Err(ParseEnumError {
                expected: "missing-days placement",
                got: s.to_string(),
            }),
        }
    }
}

/// Active column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortState {
    #[must_use]
    pub const fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Header click: same column flips the order, another column starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.order = self.order.flipped();
        } else {
            self.column = column;
            self.order = SortOrder::Asc;
        }
    }

    /// Header decoration for `column`.
    #[must_use]
    pub const fn indicator(&self, column: SortColumn) -> &'static str {
        if self.column as u8 == column as u8 {
            self.order.arrow()
        } else {
            "⇅"
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortColumn::ClosingDate, SortOrder::Asc)
    }
}

/// Closing-date key; undated sorts after every date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Dated(NaiveDate),
    Undated,
}

/// Comparable key extracted from one column of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Rank(u8),
    Text(&'a str),
    Date(DateKey),
    Int(i64),
}

/// Records that can be ordered by worklist columns.
pub trait Sortable {
    fn sort_key(&self, column: SortColumn, missing_days: MissingDays) -> SortKey<'_>;
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn sort_key(&self, column: SortColumn, missing_days: MissingDays) -> SortKey<'_> {
        (**self).sort_key(column, missing_days)
    }
}

/// Rank of an urgency, or [`MISSING_URGENCY_RANK`] when there is none.
#[must_use]
pub const fn urgency_rank(urgency: Option<UrgencyLevel>) -> u8 {
    match urgency {
        Some(level) => level.rank(),
        None => MISSING_URGENCY_RANK,
    }
}

impl Sortable for WorkItem {
    fn sort_key(&self, column: SortColumn, missing_days: MissingDays) -> SortKey<'_> {
        match column {
            SortColumn::Urgency => SortKey::Rank(urgency_rank(Some(self.urgency))),
            SortColumn::Opportunity => SortKey::Text(&self.id),
            SortColumn::Title => SortKey::Text(&self.title),
            SortColumn::Customer => SortKey::Text(self.party.as_deref().unwrap_or("")),
            SortColumn::Status => SortKey::Text(&self.status),
            SortColumn::ClosingDate => {
                SortKey::Date(self.closing_date.map_or(DateKey::Undated, DateKey::Dated))
            }
            SortColumn::DaysRemaining => {
                SortKey::Int(self.days_remaining.unwrap_or(missing_days.sentinel()))
            }
        }
    }
}

fn compare<T: Sortable>(a: &T, b: &T, state: SortState, missing_days: MissingDays) -> Ordering {
    let ka = a.sort_key(state.column, missing_days);
    let kb = b.sort_key(state.column, missing_days);
    match state.order {
        SortOrder::Asc => ka.cmp(&kb),
        SortOrder::Desc => kb.cmp(&ka),
    }
}

/// Sort records in place by `state`.
pub fn sort<T: Sortable>(items: &mut [T], state: SortState, missing_days: MissingDays) {
    items.sort_by(|a, b| compare(a, b, state, missing_days));
}
