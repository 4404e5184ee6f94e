//! Client-side filtering of worklists and the assignment roster.
//!
//! Every active criterion must hold (logical AND), so applying criteria one
//! at a time in any order yields the same subset. Filtering never reorders.

use crate::model::item::{AssignmentStatus, UrgencyLevel, WorkItem};
use crate::model::roster::Employee;
use serde::Serialize;

/// What the filter engine needs to know about a record.
pub trait Filterable {
    /// Departments the record belongs to, for the department and status filters.
    fn departments(&self) -> Vec<&str>;

    /// True when the record is tied to a platform user identity.
    fn has_linked_user(&self) -> bool;

    /// Lower-cased text searched by the free-text filter.
    fn search_text(&self) -> String;

    fn urgency(&self) -> Option<UrgencyLevel> {
        None
    }

    fn days_remaining(&self) -> Option<i64> {
        None
    }
}

impl Filterable for WorkItem {
    fn departments(&self) -> Vec<&str> {
        self.department_names().collect()
    }

    fn has_linked_user(&self) -> bool {
        self.assignees.iter().any(|a| a.user.is_some())
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.id,
            self.title,
            self.party.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }

    fn urgency(&self) -> Option<UrgencyLevel> {
        Some(self.urgency)
    }

    fn days_remaining(&self) -> Option<i64> {
        self.days_remaining
    }
}

impl Filterable for Employee {
    fn departments(&self) -> Vec<&str> {
        self.department
            .as_deref()
            .filter(|d| !d.is_empty())
            .into_iter()
            .collect()
    }

    fn has_linked_user(&self) -> bool {
        self.user_id.as_deref().is_some_and(|u| !u.is_empty())
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.employee_name,
            self.user_full_name.as_deref().unwrap_or(""),
            self.designation.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }
}

/// Filter criteria for one view session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Exact department match.
    pub department: Option<String>,
    /// Assigned / unassigned / linked.
    pub status: Option<AssignmentStatus>,
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    /// Exact urgency match.
    pub urgency: Option<UrgencyLevel>,
    /// Drop overdue items. Undated items are never dropped.
    pub hide_overdue: bool,
}

impl FilterState {
    /// Returns true if no filter criteria are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.department.is_none()
            && self.status.is_none()
            && self.search.trim().is_empty()
            && self.urgency.is_none()
            && !self.hide_overdue
    }

    /// Returns true if the record satisfies all active criteria.
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        if let Some(ref department) = self.department {
            if !item.departments().iter().any(|d| *d == department.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            let keep = match status {
                AssignmentStatus::Assigned => !item.departments().is_empty(),
                AssignmentStatus::Unassigned => item.departments().is_empty(),
                AssignmentStatus::Linked => item.has_linked_user(),
            };
            if !keep {
                return false;
            }
        }
        let needle = self.search.trim();
        if !needle.is_empty() && !item.search_text().contains(&needle.to_lowercase()) {
            return false;
        }
        if let Some(urgency) = self.urgency {
            if item.urgency() != Some(urgency) {
                return false;
            }
        }
        if self.hide_overdue && is_overdue(item) {
            return false;
        }
        true
    }

    /// Apply this filter, preserving input order.
    pub fn apply<'a, T: Filterable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

fn is_overdue<T: Filterable + ?Sized>(item: &T) -> bool {
    item.urgency() == Some(UrgencyLevel::Overdue) || item.days_remaining().is_some_and(|d| d < 0)
}

/// Free-function form of [`FilterState::apply`].
pub fn filter<'a, T: Filterable>(items: &'a [T], state: &FilterState) -> Vec<&'a T> {
    state.apply(items)
}
