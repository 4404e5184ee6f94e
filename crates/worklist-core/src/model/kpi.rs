use super::{ParseEnumError, normalize, nullable_f64, nullable_u64, nullable_vec};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// On-time completion metrics for one employee or team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberKpi {
    #[serde(alias = "employee_name", alias = "team", alias = "user_name")]
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable_u64")]
    pub total: u64,
    #[serde(deserialize_with = "nullable_u64")]
    pub completed: u64,
    #[serde(alias = "on_time", deserialize_with = "nullable_u64")]
    pub completed_on_time: u64,
    #[serde(alias = "late", deserialize_with = "nullable_u64")]
    pub completed_late: u64,
    #[serde(alias = "open", deserialize_with = "nullable_u64")]
    pub still_open: u64,
    #[serde(deserialize_with = "nullable_f64")]
    pub on_time_rate: f64,
}

impl MemberKpi {
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// Overall KPI payload for a date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSummary {
    #[serde(deserialize_with = "nullable_u64")]
    pub total: u64,
    #[serde(alias = "total_closed", deserialize_with = "nullable_u64")]
    pub completed: u64,
    #[serde(deserialize_with = "nullable_u64")]
    pub completed_on_time: u64,
    #[serde(deserialize_with = "nullable_u64")]
    pub completed_late: u64,
    #[serde(deserialize_with = "nullable_u64")]
    pub still_open: u64,
    #[serde(deserialize_with = "nullable_f64")]
    pub on_time_rate: f64,
    /// Share of assigned opportunities past their closing date, in percent.
    #[serde(deserialize_with = "nullable_f64")]
    pub overdue_rate: f64,
    /// `None` until at least one opportunity has closed in the period.
    pub median_close_days: Option<f64>,
    #[serde(alias = "user_metrics", deserialize_with = "nullable_vec")]
    pub per_member: Vec<MemberKpi>,
}

/// How the KPI breakdown is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiGrouping {
    #[default]
    Employee,
    Team,
}

impl KpiGrouping {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Team => "team",
        }
    }

    /// Heading of the name column.
    #[must_use]
    pub const fn column_label(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Team => "Team",
        }
    }
}

impl fmt::Display for KpiGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KpiGrouping {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "employee" | "by_employee" => Ok(Self::Employee),
            "team" | "by_team" => Ok(Self::Team),
            _ => Err(ParseEnumError {
                expected: "kpi grouping",
                got: s.to_string(),
            }),
        }
    }
}

/// Colour band of an on-time rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceBand {
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            Self::Excellent
        } else if rate >= 75.0 {
            Self::Good
        } else if rate >= 50.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medal label for the top three ranks, plain `#n` otherwise.
#[must_use]
pub fn rank_badge(rank: usize) -> String {
    match rank {
        1 => "gold".to_string(),
        2 => "silver".to_string(),
        3 => "bronze".to_string(),
        n => format!("#{n}"),
    }
}
