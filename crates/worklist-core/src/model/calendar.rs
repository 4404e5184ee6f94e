use super::{lenient_date, nullable_vec};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Details attached to a calendar entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDetails {
    pub opportunity_name: Option<String>,
    pub status: Option<String>,
    pub owner: Option<String>,
    pub resp_eng: Option<String>,
    pub urgency: Option<String>,
    pub amount: Option<f64>,
    pub party: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub closing_date: Option<NaiveDate>,
}

/// One all-day calendar entry, placed on the closing date when known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "lenient_date")]
    pub start: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub end: Option<NaiveDate>,
    #[serde(rename = "allDay")]
    pub all_day: bool,
    #[serde(rename = "extendedProps")]
    pub details: EventDetails,
}

/// Optional server-side filters for the calendar query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_resp_eng: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<String>,
}

impl CalendarFilters {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.opportunity_owner.is_none()
            && self.custom_resp_eng.is_none()
            && self.urgency_level.is_none()
    }
}

/// Values offered by the calendar's filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarFilterOptions {
    #[serde(deserialize_with = "nullable_vec")]
    pub owners: Vec<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub resp_engs: Vec<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub statuses: Vec<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub urgency_levels: Vec<String>,
}

/// Bucket events by day. Events without a start date are dropped.
#[must_use]
pub fn group_by_day(events: &[CalendarEvent]) -> BTreeMap<NaiveDate, Vec<&CalendarEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
    for event in events {
        if let Some(day) = event.start {
            days.entry(day).or_default().push(event);
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_parses_fullcalendar_shape() {
        let event: CalendarEvent = serde_json::from_str(
            r##"{
                "id": "CRM-OPP-0001",
                "title": "Acme - $1,200.00",
                "start": "2026-10-21",
                "end": "2026-10-21",
                "allDay": true,
                "backgroundColor": "#dc3545",
                "extendedProps": {
                    "opportunity_name": "CRM-OPP-0001",
                    "status": "Open",
                    "urgency": "Urgent",
                    "amount": 1200.0,
                    "closing_date": null
                }
            }"##,
        )
        .unwrap();
        assert_eq!(event.start, NaiveDate::from_ymd_opt(2026, 10, 21));
        assert!(event.all_day);
        assert_eq!(event.details.urgency.as_deref(), Some("Urgent"));
        assert!(event.details.closing_date.is_none());
    }

    #[test]
    fn filters_skip_unset_fields() {
        let filters = CalendarFilters {
            status: Some("Open".into()),
            ..CalendarFilters::default()
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            serde_json::json!({"status": "Open"})
        );
        assert!(CalendarFilters::default().is_empty());
    }

    #[test]
    fn group_by_day_orders_days_and_drops_undated() {
        let on = |id: &str, day: Option<NaiveDate>| CalendarEvent {
            id: id.into(),
            start: day,
            ..CalendarEvent::default()
        };
        let d1 = NaiveDate::from_ymd_opt(2026, 10, 20);
        let d2 = NaiveDate::from_ymd_opt(2026, 10, 22);
        let events = vec![on("b", d2), on("a", d1), on("c", d2), on("x", None)];
        let grouped = group_by_day(&events);
        let keys: Vec<_> = grouped.keys().copied().collect();
        assert_eq!(keys, vec![d1.unwrap(), d2.unwrap()]);
        let ids: Vec<_> = grouped[&d2.unwrap()].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
