#![allow(dead_code)]

use chrono::NaiveDate;
use proptest::prelude::*;
use std::cell::Cell;
use worklist_core::model::calendar::{CalendarEvent, CalendarFilterOptions, CalendarFilters};
use worklist_core::model::item::{Assignee, RawWorkItem, UrgencyLevel, WorkItem};
use worklist_core::model::kpi::{KpiGrouping, KpiSummary, MemberKpi};
use worklist_core::model::roster::{Department, Employee, EmployeeStats};
use worklist_core::model::team::TeamWorklist;
use worklist_core::remote::{
    AssignmentRequest, BulkAssignResponse, GroupResponse, RemoteError, RemoteSource, TaskResponse,
};

pub const DEPARTMENTS: [&str; 3] = ["Sales", "Ops", "Field Service"];

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub fn day(offset: i64) -> NaiveDate {
    today() + chrono::Duration::days(offset)
}

pub fn arb_urgency() -> impl Strategy<Value = UrgencyLevel> {
    prop::sample::select(UrgencyLevel::ALL.to_vec())
}

pub fn arb_department() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(DEPARTMENTS.to_vec()).prop_map(String::from))
}

/// A platform record. Urgency is left out half the time so local
/// classification is exercised too.
pub fn arb_raw_item() -> impl Strategy<Value = RawWorkItem> {
    (
        "[A-Z]{3}-[0-9]{4}",
        "[a-z]{1,8}( [a-z]{1,8})?",
        prop::option::of("[A-Z][a-z]{2,10}"),
        prop::option::of(-30_i64..60),
        prop::option::of(arb_urgency()),
        arb_department(),
        arb_department(),
    )
        .prop_map(|(id, title, party, offset, urgency, department, assignee_dept)| RawWorkItem {
            id,
            title: Some(title),
            party,
            closing_date: offset.map(day),
            urgency,
            department,
            assignees: vec![Assignee {
                employee: Some("Ann".to_string()),
                user: None,
                department: assignee_dept,
            }],
            ..RawWorkItem::default()
        })
}

pub fn arb_items(max: usize) -> impl Strategy<Value = Vec<WorkItem>> {
    prop::collection::vec(arb_raw_item(), 0..max)
        .prop_map(|raws| WorkItem::from_raw_batch(raws, today()))
}

/// Items whose `days_remaining` are pairwise distinct.
pub fn arb_tie_free_items(max: usize) -> impl Strategy<Value = Vec<WorkItem>> {
    prop::collection::btree_set(-30_i64..90, 0..max)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|offsets| {
            offsets
                .into_iter()
                .enumerate()
                .map(|(i, offset)| {
                    WorkItem::from_raw(
                        RawWorkItem {
                            id: format!("OPP-{i:04}"),
                            closing_date: Some(day(offset)),
                            ..RawWorkItem::default()
                        },
                        today(),
                    )
                })
                .collect()
        })
}

/// A platform that counts calls and answers nothing useful.
#[derive(Default)]
pub struct CountingRemote {
    pub calls: Cell<usize>,
}

impl CountingRemote {
    fn hit(&self) -> Result<(), RemoteError> {
        self.calls.set(self.calls.get() + 1);
        Err(RemoteError::Transport("offline".to_string()))
    }
}

impl RemoteSource for CountingRemote {
    fn get_worklist(&self, _include_completed: bool) -> Result<Vec<RawWorkItem>, RemoteError> {
        self.hit().map(|()| Vec::new())
    }

    fn get_team_worklist(
        &self,
        _team: Option<&str>,
        _include_completed: bool,
    ) -> Result<TeamWorklist, RemoteError> {
        self.hit().map(|()| TeamWorklist::default())
    }

    fn get_available_teams(&self) -> Result<Vec<String>, RemoteError> {
        self.hit().map(|()| Vec::new())
    }

    fn get_viewer_department(&self) -> Result<Option<String>, RemoteError> {
        self.hit().map(|()| None)
    }

    fn get_kpi(
        &self,
        _from: Option<NaiveDate>,
        _to: Option<NaiveDate>,
    ) -> Result<KpiSummary, RemoteError> {
        self.hit().map(|()| KpiSummary::default())
    }

    fn get_kpi_breakdown(
        &self,
        _from: Option<NaiveDate>,
        _to: Option<NaiveDate>,
        _by: KpiGrouping,
    ) -> Result<Vec<MemberKpi>, RemoteError> {
        self.hit().map(|()| Vec::new())
    }

    fn get_calendar_events(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _filters: &CalendarFilters,
    ) -> Result<Vec<CalendarEvent>, RemoteError> {
        self.hit().map(|()| Vec::new())
    }

    fn get_calendar_filter_options(&self) -> Result<CalendarFilterOptions, RemoteError> {
        self.hit().map(|()| CalendarFilterOptions::default())
    }

    fn get_employees(&self) -> Result<Vec<Employee>, RemoteError> {
        self.hit().map(|()| Vec::new())
    }

    fn get_departments(&self) -> Result<Vec<Department>, RemoteError> {
        self.hit().map(|()| Vec::new())
    }

    fn get_employee_stats(&self) -> Result<EmployeeStats, RemoteError> {
        self.hit().map(|()| EmployeeStats::default())
    }

    fn bulk_assign(&self, _batch: &[AssignmentRequest]) -> Result<BulkAssignResponse, RemoteError> {
        self.hit().map(|()| unreachable!())
    }

    fn create_group(&self, _name: &str) -> Result<GroupResponse, RemoteError> {
        self.hit().map(|()| unreachable!())
    }

    fn close_task(&self, _task_id: &str) -> Result<TaskResponse, RemoteError> {
        self.hit().map(|()| unreachable!())
    }
}
