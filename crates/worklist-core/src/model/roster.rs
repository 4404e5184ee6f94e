use super::nullable_vec;
use serde::{Deserialize, Serialize};

/// An active employee and their current team (department) link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    #[serde(alias = "name")]
    pub id: String,
    pub employee_name: String,
    pub user_id: Option<String>,
    pub user_full_name: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
}

impl Employee {
    /// Label shown in the linked-user column.
    #[must_use]
    pub fn user_label(&self) -> Option<&str> {
        self.user_full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.user_id.as_deref())
    }
}

/// A team the roster can be assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Department {
    pub name: String,
    pub department_name: Option<String>,
}

impl Department {
    #[must_use]
    pub fn label(&self) -> &str {
        self.department_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Headcount per department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentCount {
    pub department: String,
    pub count: u64,
}

/// Roster totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterTotals {
    pub total_employees: u64,
    pub assigned: u64,
    pub unassigned: u64,
    pub linked_to_user: u64,
}

/// Payload of the roster statistics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeStats {
    pub stats: RosterTotals,
    #[serde(deserialize_with = "nullable_vec")]
    pub department_breakdown: Vec<DepartmentCount>,
}
