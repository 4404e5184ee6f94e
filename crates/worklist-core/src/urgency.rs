//! Urgency classification of closing dates.
//!
//! The boundary table is a contract shared with the platform's badge text
//! and summary counts:
//!
//! | closing date          | level       |
//! |-----------------------|-------------|
//! | none                  | `unknown`   |
//! | before today          | `overdue`   |
//! | today                 | `due_today` |
//! | today + 1             | `critical`  |
//! | today + 2 ..= today + 3 | `high`    |
//! | today + 4 ..= today + 7 | `medium`  |
//! | later                 | `low`       |

use crate::model::item::UrgencyLevel;
use chrono::NaiveDate;

/// Signed number of days from `today` until `date` (negative when overdue).
#[must_use]
pub fn days_between(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

/// Map a closing date to its urgency level relative to `today`.
#[must_use]
pub fn classify(closing_date: Option<NaiveDate>, today: NaiveDate) -> UrgencyLevel {
    let Some(date) = closing_date else {
        return UrgencyLevel::Unknown;
    };
    match days_between(date, today) {
        d if d < 0 => UrgencyLevel::Overdue,
        0 => UrgencyLevel::DueToday,
        1 => UrgencyLevel::Critical,
        2..=3 => UrgencyLevel::High,
        4..=7 => UrgencyLevel::Medium,
        _ => UrgencyLevel::Low,
    }
}

/// Badge text for an urgency level.
#[must_use]
pub fn badge(urgency: UrgencyLevel, days_remaining: Option<i64>) -> String {
    match urgency {
        UrgencyLevel::Overdue => {
            format!("OVERDUE ({} days)", days_remaining.unwrap_or(0).abs())
        }
        UrgencyLevel::DueToday => "DUE TODAY".to_string(),
        UrgencyLevel::Critical => "Tomorrow".to_string(),
        UrgencyLevel::High => "3 days".to_string(),
        UrgencyLevel::Medium => "7 days".to_string(),
        UrgencyLevel::Low => match days_remaining {
            Some(days) => format!("{days} days"),
            None => "No date".to_string(),
        },
        UrgencyLevel::Unknown => "No date".to_string(),
    }
}
