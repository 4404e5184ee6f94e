use super::{ParseEnumError, lenient_date, normalize, nullable_vec};
use crate::urgency;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use tracing::warn;

/// How close (or overdue) an item's closing date is.
///
/// Variants are declared in their fixed total order, so the derived `Ord`
/// matches [`UrgencyLevel::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Overdue,
    DueToday,
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl UrgencyLevel {
    pub const ALL: [Self; 7] = [
        Self::Overdue,
        Self::DueToday,
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Unknown,
    ];

    /// Position in the fixed order `overdue < due_today < ... < unknown`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Overdue => 0,
            Self::DueToday => 1,
            Self::Critical => 2,
            Self::High => 3,
            Self::Medium => 4,
            Self::Low => 5,
            Self::Unknown => 6,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday => "due_today",
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "overdue" => Ok(Self::Overdue),
            "due_today" => Ok(Self::DueToday),
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseEnumError {
                expected: "urgency",
                got: s.to_string(),
            }),
        }
    }
}

/// Tri-state assignment filter used by the roster and team views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// A department is present.
    Assigned,
    /// No department.
    Unassigned,
    /// Linked to a platform user identity.
    Linked,
}

impl AssignmentStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::Linked => "linked",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "assigned" => Ok(Self::Assigned),
            "unassigned" => Ok(Self::Unassigned),
            "linked" => Ok(Self::Linked),
            _ => Err(ParseEnumError {
                expected: "assignment status",
                got: s.to_string(),
            }),
        }
    }
}

/// One person responsible for a work item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assignee {
    pub employee: Option<String>,
    pub user: Option<String>,
    pub department: Option<String>,
}

impl Assignee {
    /// Employee name, falling back to the user login.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.employee
            .as_deref()
            .or(self.user.as_deref())
            .unwrap_or("")
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.department {
            Some(dept) => write!(f, "{} ({dept})", self.display_name()),
            None => f.write_str(self.display_name()),
        }
    }
}

/// A work item exactly as the platform sends it.
///
/// Derived fields may be absent; [`WorkItem::from_raw`] fills them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawWorkItem {
    #[serde(alias = "opportunity", alias = "opportunity_name")]
    pub id: String,
    pub title: Option<String>,
    #[serde(alias = "customer", alias = "party_name")]
    pub party: Option<String>,
    #[serde(alias = "expected_closing", deserialize_with = "lenient_date")]
    pub closing_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_urgency")]
    pub urgency: Option<UrgencyLevel>,
    pub days_remaining: Option<i64>,
    #[serde(alias = "opportunity_status")]
    pub status: Option<String>,
    pub department: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub assignees: Vec<Assignee>,
    #[serde(deserialize_with = "nullable_vec")]
    pub items: Vec<serde_json::Value>,
    #[serde(alias = "todo_name", alias = "todo")]
    pub task_id: Option<String>,
}

/// Unrecognised urgency strings deserialize as "absent" rather than failing.
fn lenient_urgency<'de, D>(deserializer: D) -> Result<Option<UrgencyLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// A normalized work item: every item has exactly one urgency, and
/// `urgency == Unknown` iff `closing_date` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub party: Option<String>,
    pub closing_date: Option<NaiveDate>,
    pub urgency: UrgencyLevel,
    pub days_remaining: Option<i64>,
    pub status: String,
    pub department: Option<String>,
    pub assignees: Vec<Assignee>,
    pub item_count: usize,
    pub task_id: Option<String>,
}

impl WorkItem {
    /// Normalize a platform record against `today`.
    ///
    /// The platform's urgency is trusted when present; it is only recomputed
    /// locally when missing, or when it contradicts the date invariant.
    #[must_use]
    pub fn from_raw(raw: RawWorkItem, today: NaiveDate) -> Self {
        let (urgency, days_remaining) = match raw.closing_date {
            None => {
                if raw.urgency.is_some_and(|u| u != UrgencyLevel::Unknown) {
                    warn!(item = %raw.id, "undated item carried urgency {:?}; forcing unknown", raw.urgency);
                }
                (UrgencyLevel::Unknown, None)
            }
            Some(date) => {
                let urgency = match raw.urgency {
                    Some(level) if level != UrgencyLevel::Unknown => level,
                    _ => urgency::classify(Some(date), today),
                };
                let days = raw
                    .days_remaining
                    .unwrap_or_else(|| urgency::days_between(date, today));
                (urgency, Some(days))
            }
        };

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| raw.id.clone());

        Self {
            title,
            party: raw.party.filter(|p| !p.is_empty()),
            closing_date: raw.closing_date,
            urgency,
            days_remaining,
            status: raw.status.unwrap_or_default(),
            department: raw.department.filter(|d| !d.is_empty()),
            item_count: raw.items.len(),
            assignees: raw.assignees,
            task_id: raw.task_id,
            id: raw.id,
        }
    }

    /// Normalize a whole payload.
    #[must_use]
    pub fn from_raw_batch(raw: Vec<RawWorkItem>, today: NaiveDate) -> Vec<Self> {
        raw.into_iter().map(|r| Self::from_raw(r, today)).collect()
    }

    /// Own department if present, otherwise the assignees' departments.
    pub fn department_names(&self) -> impl Iterator<Item = &str> {
        let own = self.department.as_deref();
        let from_assignees = self
            .assignees
            .iter()
            .filter(move |_| own.is_none())
            .filter_map(|a| a.department.as_deref());
        own.into_iter().chain(from_assignees)
    }
}
