use super::item::{RawWorkItem, UrgencyLevel, WorkItem};
use super::nullable_u64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-member counters shown under the team table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberStat {
    #[serde(alias = "employee", alias = "user")]
    pub name: String,
    #[serde(alias = "total", deserialize_with = "nullable_u64")]
    pub open: u64,
    #[serde(deserialize_with = "nullable_u64")]
    pub overdue: u64,
    #[serde(deserialize_with = "nullable_u64")]
    pub due_today: u64,
}

/// Team worklist payload.
///
/// Older deployments answer with a bare item list; newer ones wrap it with
/// member statistics. Both shapes deserialize into this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "TeamPayload")]
pub struct TeamWorklist {
    pub items: Vec<RawWorkItem>,
    pub member_stats: Vec<MemberStat>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TeamPayload {
    Flat(Vec<RawWorkItem>),
    Wrapped {
        #[serde(default, deserialize_with = "super::nullable_vec")]
        items: Vec<RawWorkItem>,
        #[serde(default, deserialize_with = "super::nullable_vec")]
        member_stats: Vec<MemberStat>,
    },
}

impl From<TeamPayload> for TeamWorklist {
    fn from(payload: TeamPayload) -> Self {
        match payload {
            TeamPayload::Flat(items) => Self {
                items,
                member_stats: Vec::new(),
            },
            TeamPayload::Wrapped {
                items,
                member_stats,
            } => Self {
                items,
                member_stats,
            },
        }
    }
}

/// Count open, overdue and due-today items per assignee.
///
/// Used when the platform did not send member statistics. Items without
/// assignees are not attributed to anyone.
#[must_use]
pub fn member_stats_from_items(items: &[WorkItem]) -> Vec<MemberStat> {
    let mut by_name: BTreeMap<&str, MemberStat> = BTreeMap::new();
    for item in items {
        for assignee in &item.assignees {
            let name = assignee.display_name();
            if name.is_empty() {
                continue;
            }
            let stat = by_name.entry(name).or_insert_with(|| MemberStat {
                name: name.to_string(),
                ..MemberStat::default()
            });
            stat.open += 1;
            match item.urgency {
                UrgencyLevel::Overdue => stat.overdue += 1,
                UrgencyLevel::DueToday => stat.due_today += 1,
                _ => {}
            }
        }
    }
    by_name.into_values().collect()
}
