//! The remote platform, seen from the client.
//!
//! Every page is a thin layer over these calls. The platform computes
//! urgency, KPI aggregates and team membership; the client only reads
//! those fields and submits simple mutations back.

use crate::error::ErrorCode;
use crate::model::calendar::{CalendarEvent, CalendarFilterOptions, CalendarFilters};
use crate::model::item::RawWorkItem;
use crate::model::kpi::{KpiGrouping, KpiSummary, MemberKpi};
use crate::model::nullable_vec;
use crate::model::roster::{Department, Employee, EmployeeStats};
use crate::model::team::TeamWorklist;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of one remote call. Terminal to the action that issued it.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("could not reach the platform: {0}")]
    Transport(String),

    #[error("{method} was rejected{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Rejected {
        method: String,
        status: Option<u16>,
        message: String,
    },

    #[error("unexpected payload from {method}: {detail}")]
    Payload { method: String, detail: String },
}

impl RemoteError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::RemoteUnreachable,
            Self::Rejected { .. } => ErrorCode::RemoteRejected,
            Self::Payload { .. } => ErrorCode::RemotePayloadInvalid,
        }
    }
}

/// One staged assignment as sent to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub employee: String,
    pub department: String,
}

/// Outcome reported by a mutation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    /// Some items of a batch failed.
    Partial,
    /// Department creation only: the name is already taken.
    Exists,
    #[serde(alias = "error")]
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Blocking client for the platform's endpoints.
///
/// Implementations must not retry: a failed call is reported once and the
/// user re-triggers the action.
pub trait RemoteSource {
    /// The viewer's own work items, open or completed.
    fn get_worklist(&self, include_completed: bool) -> Result<Vec<RawWorkItem>, RemoteError>;

    /// Work items of one team, or of every team visible to the viewer.
    fn get_team_worklist(
        &self,
        team: Option<&str>,
        include_completed: bool,
    ) -> Result<TeamWorklist, RemoteError>;

    fn get_available_teams(&self) -> Result<Vec<String>, RemoteError>;

    /// Department of the viewer's active employee record, if any.
    fn get_viewer_department(&self) -> Result<Option<String>, RemoteError>;

    fn get_kpi(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<KpiSummary, RemoteError>;

    fn get_kpi_breakdown(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        by: KpiGrouping,
    ) -> Result<Vec<MemberKpi>, RemoteError>;

    fn get_calendar_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filters: &CalendarFilters,
    ) -> Result<Vec<CalendarEvent>, RemoteError>;

    fn get_calendar_filter_options(&self) -> Result<CalendarFilterOptions, RemoteError>;

    fn get_employees(&self) -> Result<Vec<Employee>, RemoteError>;

    fn get_departments(&self) -> Result<Vec<Department>, RemoteError>;

    fn get_employee_stats(&self) -> Result<EmployeeStats, RemoteError>;

    /// Send a whole batch of assignments in one request.
    fn bulk_assign(&self, batch: &[AssignmentRequest]) -> Result<BulkAssignResponse, RemoteError>;

    fn create_group(&self, name: &str) -> Result<GroupResponse, RemoteError>;

    fn close_task(&self, task_id: &str) -> Result<TaskResponse, RemoteError>;
}
