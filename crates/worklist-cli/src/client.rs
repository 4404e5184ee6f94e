//! Blocking HTTP client for the platform's whitelisted RPC methods.
//!
//! Every call is `POST {base}/api/method/{method}` with a JSON body of named
//! arguments. Successful responses wrap the payload as `{"message": ...}`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, trace};
use worklist_core::config::Connection;
use worklist_core::model::calendar::{CalendarEvent, CalendarFilterOptions, CalendarFilters};
use worklist_core::model::item::RawWorkItem;
use worklist_core::model::kpi::{KpiGrouping, KpiSummary, MemberKpi};
use worklist_core::model::roster::{Department, Employee, EmployeeStats};
use worklist_core::model::team::TeamWorklist;
use worklist_core::remote::{
    AssignmentRequest, BulkAssignResponse, GroupResponse, RemoteError, RemoteSource, TaskResponse,
};

const API: &str = "opportunity_management.opportunity_management.api";
const ASSIGNMENT_PAGE: &str =
    "opportunity_management.opportunity_management.page.employee_team_assignment.employee_team_assignment";
const CALENDAR_PAGE: &str =
    "opportunity_management.opportunity_management.page.opportunity_calendar.opportunity_calendar";

pub struct HttpRemote {
    agent: ureq::Agent,
    base: String,
    authorization: Option<String>,
}

impl HttpRemote {
    pub fn new(connection: &Connection) -> Result<Self> {
        let authorization = match (&connection.api_key, &connection.api_secret) {
            (Some(key), Some(secret)) => Some(format!("token {key}:{secret}")),
            (None, None) => None,
            _ => anyhow::bail!("WL_API_KEY and WL_API_SECRET must be set together"),
        };
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(connection.timeout_secs))
            .user_agent(concat!("worklist-cli/", env!("CARGO_PKG_VERSION")))
            .build();
        url_base(&connection.url).map(|base| Self {
            agent,
            base,
            authorization,
        })
    }

    fn post(&self, method: &str, args: &Value) -> Result<Value, RemoteError> {
        let url = format!("{}/api/method/{method}", self.base);
        debug!(%method, "calling platform");
        trace!(%args, "request arguments");

        let mut request = self
            .agent
            .post(&url)
            .set("Accept", "application/json");
        if let Some(auth) = &self.authorization {
            request = request.set("Authorization", auth);
        }

        let response = match request.send_json(args) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(RemoteError::Rejected {
                    method: short_name(method).to_string(),
                    status: Some(status),
                    message: server_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
                });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(RemoteError::Transport(err.to_string()));
            }
        };

        let body: Value = response.into_json().map_err(|e| RemoteError::Payload {
            method: short_name(method).to_string(),
            detail: e.to_string(),
        })?;
        Ok(body.get("message").cloned().unwrap_or(Value::Null))
    }

    /// Call a method whose payload must be present.
    fn call<T: DeserializeOwned>(&self, method: &str, args: &Value) -> Result<T, RemoteError> {
        let message = self.post(method, args)?;
        decode(method, message)
    }

    /// Call a method where a `null` payload means "nothing".
    fn call_or_default<T: DeserializeOwned + Default>(
        &self,
        method: &str,
        args: &Value,
    ) -> Result<T, RemoteError> {
        match self.post(method, args)? {
            Value::Null => Ok(T::default()),
            message => decode(method, message),
        }
    }
}

fn url_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(anyhow::anyhow!("server URL must start with http:// or https://"))
            .with_context(|| format!("invalid server URL '{raw}'"))
    }
}

fn short_name(method: &str) -> &str {
    method.rsplit('.').next().unwrap_or(method)
}

fn decode<T: DeserializeOwned>(method: &str, message: Value) -> Result<T, RemoteError> {
    serde_json::from_value(message).map_err(|e| RemoteError::Payload {
        method: short_name(method).to_string(),
        detail: e.to_string(),
    })
}

/// Best human-readable text from an error body.
///
/// The platform puts user-facing messages in `_server_messages`, a JSON
/// string holding a list of JSON strings, and the raw traceback in
/// `exception`.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let from_server_messages = value
        .get("_server_messages")
        .and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    serde_json::from_str::<Value>(entry)
                        .ok()
                        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                        .unwrap_or_else(|| entry.clone())
                })
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|joined| !joined.is_empty());

    from_server_messages.or_else(|| {
        ["exception", "message", "exc_type"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(|text| text.lines().next_back().unwrap_or(text).trim().to_string())
    })
}

fn date_arg(date: Option<NaiveDate>) -> Value {
    date.map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string()))
}

impl RemoteSource for HttpRemote {
    fn get_worklist(&self, include_completed: bool) -> Result<Vec<RawWorkItem>, RemoteError> {
        self.call_or_default(
            &format!("{API}.get_my_opportunities"),
            &json!({ "include_completed": include_completed }),
        )
    }

    fn get_team_worklist(
        &self,
        team: Option<&str>,
        include_completed: bool,
    ) -> Result<TeamWorklist, RemoteError> {
        let mut args = json!({ "include_completed": include_completed });
        if let Some(team) = team {
            args["team"] = Value::String(team.to_string());
        }
        self.call_or_default(&format!("{API}.get_team_opportunities"), &args)
    }

    fn get_available_teams(&self) -> Result<Vec<String>, RemoteError> {
        self.call_or_default(&format!("{API}.get_available_teams"), &json!({}))
    }

    fn get_viewer_department(&self) -> Result<Option<String>, RemoteError> {
        let user: Option<String> =
            self.call_or_default("frappe.auth.get_logged_user", &json!({}))?;
        let Some(user) = user.filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let record: Value = self.call_or_default(
            "frappe.client.get_value",
            &json!({
                "doctype": "Employee",
                "filters": { "user_id": user, "status": "Active" },
                "fieldname": "department",
            }),
        )?;
        Ok(record
            .get("department")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map(String::from))
    }

    fn get_kpi(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<KpiSummary, RemoteError> {
        self.call_or_default(
            &format!("{API}.get_opportunity_kpi"),
            &json!({ "from_date": date_arg(from), "to_date": date_arg(to) }),
        )
    }

    fn get_kpi_breakdown(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        by: KpiGrouping,
    ) -> Result<Vec<MemberKpi>, RemoteError> {
        let method = match by {
            KpiGrouping::Employee => "get_kpi_by_employee",
            KpiGrouping::Team => "get_kpi_by_team",
        };
        self.call_or_default(
            &format!("{API}.{method}"),
            &json!({ "from_date": date_arg(from), "to_date": date_arg(to) }),
        )
    }

    fn get_calendar_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filters: &CalendarFilters,
    ) -> Result<Vec<CalendarEvent>, RemoteError> {
        let filters = serde_json::to_string(filters).map_err(|e| RemoteError::Payload {
            method: "get_calendar_events".to_string(),
            detail: e.to_string(),
        })?;
        self.call_or_default(
            &format!("{CALENDAR_PAGE}.get_calendar_events"),
            &json!({
                "start": date_arg(Some(start)),
                "end": date_arg(Some(end)),
                "filters": filters,
            }),
        )
    }

    fn get_calendar_filter_options(&self) -> Result<CalendarFilterOptions, RemoteError> {
        self.call_or_default(&format!("{CALENDAR_PAGE}.get_filter_options"), &json!({}))
    }

    fn get_employees(&self) -> Result<Vec<Employee>, RemoteError> {
        self.call_or_default(
            &format!("{ASSIGNMENT_PAGE}.get_employees_with_teams"),
            &json!({}),
        )
    }

    fn get_departments(&self) -> Result<Vec<Department>, RemoteError> {
        self.call_or_default(&format!("{ASSIGNMENT_PAGE}.get_all_departments"), &json!({}))
    }

    fn get_employee_stats(&self) -> Result<EmployeeStats, RemoteError> {
        self.call_or_default(&format!("{ASSIGNMENT_PAGE}.get_employee_stats"), &json!({}))
    }

    fn bulk_assign(&self, batch: &[AssignmentRequest]) -> Result<BulkAssignResponse, RemoteError> {
        let assignments = serde_json::to_string(batch).map_err(|e| RemoteError::Payload {
            method: "bulk_assign_employees".to_string(),
            detail: e.to_string(),
        })?;
        self.call(
            &format!("{ASSIGNMENT_PAGE}.bulk_assign_employees"),
            &json!({ "assignments": assignments }),
        )
    }

    fn create_group(&self, name: &str) -> Result<GroupResponse, RemoteError> {
        self.call(
            &format!("{ASSIGNMENT_PAGE}.create_department"),
            &json!({ "department_name": name }),
        )
    }

    fn close_task(&self, task_id: &str) -> Result<TaskResponse, RemoteError> {
        self.call(
            &format!("{API}.close_opportunity_todo"),
            &json!({ "todo_name": task_id }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_messages_are_unwrapped() {
        let body = json!({
            "exc_type": "PermissionError",
            "_server_messages": serde_json::to_string(&vec![
                json!({"message": "Not permitted"}).to_string(),
            ])
            .expect("encode"),
        })
        .to_string();
        assert_eq!(server_message(&body).as_deref(), Some("Not permitted"));
    }

    #[test]
    fn exception_falls_back_to_last_traceback_line() {
        let body = json!({
            "exception": "Traceback (most recent call last):\n  ...\nfrappe.exceptions.ValidationError: Invalid team",
        })
        .to_string();
        assert_eq!(
            server_message(&body).as_deref(),
            Some("frappe.exceptions.ValidationError: Invalid team")
        );
    }

    #[test]
    fn non_json_bodies_have_no_message() {
        assert!(server_message("<html>502 Bad Gateway</html>").is_none());
    }

    #[test]
    fn method_names_are_shortened_for_errors() {
        assert_eq!(short_name(&format!("{API}.get_my_opportunities")), "get_my_opportunities");
        assert_eq!(short_name("ping"), "ping");
    }

    #[test]
    fn url_base_requires_scheme() {
        assert_eq!(
            url_base("https://erp.example.com/").expect("valid"),
            "https://erp.example.com"
        );
        assert!(url_base("erp.example.com").is_err());
    }

    #[test]
    fn half_configured_credentials_are_rejected() {
        let conn = Connection {
            url: "http://127.0.0.1:9".to_string(),
            api_key: Some("key".to_string()),
            api_secret: None,
            timeout_secs: 1,
        };
        assert!(HttpRemote::new(&conn).is_err());
    }

    #[test]
    fn dates_are_sent_as_iso_strings() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).expect("date");
        assert_eq!(date_arg(Some(day)), json!("2026-10-19"));
        assert_eq!(date_arg(None), Value::Null);
    }
}
