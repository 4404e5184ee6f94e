//! Staged assignments and the mutations sent back to the platform.
//!
//! A row's assignment control moves `Unset -> Pending(dept) -> Unset` when
//! the selector is cleared, or leaves the pending set when a batch carrying
//! it is accepted. Only one batch may be in flight at a time.

use crate::error::ErrorCode;
use crate::remote::{AssignmentRequest, RemoteError, RemoteSource, ResponseStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    InFlight,

    #[error("department name must not be empty")]
    EmptyName,

    #[error("the platform refused the request: {0}")]
    Refused(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl SubmitError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InFlight => ErrorCode::SubmitInFlight,
            Self::EmptyName => ErrorCode::EmptyDepartmentName,
            Self::Refused(_) => ErrorCode::RemoteRejected,
            Self::Remote(e) => e.code(),
        }
    }
}

/// State of one row's assignment selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAssignment<'a> {
    Unset,
    Pending(&'a str),
}

/// Employee id -> chosen department, in employee order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingAssignments {
    entries: BTreeMap<String, String>,
}

impl PendingAssignments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a department for `employee`, or clear the selection with
    /// `None` (an empty name also clears).
    pub fn stage(&mut self, employee: &str, department: Option<&str>) {
        match department.map(str::trim).filter(|d| !d.is_empty()) {
            Some(dept) => {
                self.entries.insert(employee.to_string(), dept.to_string());
            }
            None => {
                self.entries.remove(employee);
            }
        }
    }

    #[must_use]
    pub fn state(&self, employee: &str) -> RowAssignment<'_> {
        self.entries
            .get(employee)
            .map_or(RowAssignment::Unset, |d| RowAssignment::Pending(d))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The request body for the whole set.
    #[must_use]
    pub fn batch(&self) -> Vec<AssignmentRequest> {
        self.entries
            .iter()
            .map(|(employee, department)| AssignmentRequest {
                employee: employee.clone(),
                department: department.clone(),
            })
            .collect()
    }
}

/// Result of a submit that reached a conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Nothing was staged; no request was made.
    NothingPending,
    /// Every assignment was applied.
    Applied { message: String, count: u64 },
    /// Some assignments failed. Reported as one aggregate message.
    Partial {
        message: String,
        applied: u64,
        failed: u64,
        errors: Vec<String>,
    },
}

impl SubmitOutcome {
    /// Whether the caller should reload the roster.
    #[must_use]
    pub const fn needs_reload(&self) -> bool {
        !matches!(self, Self::NothingPending)
    }
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends staged assignments, one batch at a time.
#[derive(Debug, Default)]
pub struct Submitter {
    in_flight: AtomicBool,
}

impl Submitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<InFlight<'_>, SubmitError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SubmitError::InFlight)?;
        Ok(InFlight(&self.in_flight))
    }

    /// Submit every pending assignment as one request.
    ///
    /// Accepted batches (fully or partly) clear `pending`. A refused batch or
    /// a transport failure leaves it untouched. Nothing is retried.
    ///
    /// # Errors
    ///
    /// [`SubmitError::InFlight`] when another submit is running,
    /// [`SubmitError::Refused`] when the platform answers with a failure,
    /// [`SubmitError::Remote`] when the call itself fails.
    pub fn submit<R: RemoteSource + ?Sized>(
        &self,
        pending: &mut PendingAssignments,
        remote: &R,
    ) -> Result<SubmitOutcome, SubmitError> {
        if pending.is_empty() {
            info!("no pending assignments; nothing submitted");
            return Ok(SubmitOutcome::NothingPending);
        }
        let _guard = self.acquire()?;

        let batch = pending.batch();
        info!(count = batch.len(), "submitting assignment batch");
        let response = remote.bulk_assign(&batch)?;

        match response.status {
            ResponseStatus::Success => {
                pending.clear();
                Ok(SubmitOutcome::Applied {
                    message: response.message,
                    count: response.success_count,
                })
            }
            ResponseStatus::Partial => {
                warn!(
                    failed = response.error_count,
                    "assignment batch partially applied"
                );
                pending.clear();
                Ok(SubmitOutcome::Partial {
                    message: response.message,
                    applied: response.success_count,
                    failed: response.error_count,
                    errors: response.errors,
                })
            }
            ResponseStatus::Exists | ResponseStatus::Failure => {
                Err(SubmitError::Refused(response.message))
            }
        }
    }
}

/// Outcome of a department creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum GroupOutcome {
    Created(String),
    /// The name is taken. Not an error, but nothing was created.
    AlreadyExists(String),
}

/// Create a department. The name is trimmed; an empty name is rejected
/// without contacting the platform.
///
/// # Errors
///
/// [`SubmitError::EmptyName`], [`SubmitError::Refused`] or the remote failure.
pub fn create_group<R: RemoteSource + ?Sized>(
    remote: &R,
    name: &str,
) -> Result<GroupOutcome, SubmitError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SubmitError::EmptyName);
    }
    let response = remote.create_group(name)?;
    match response.status {
        ResponseStatus::Success => {
            info!(department = name, "department created");
            Ok(GroupOutcome::Created(response.message))
        }
        ResponseStatus::Exists => Ok(GroupOutcome::AlreadyExists(response.message)),
        ResponseStatus::Partial | ResponseStatus::Failure => {
            Err(SubmitError::Refused(response.message))
        }
    }
}

/// Close one worklist task. Returns the platform's confirmation text.
///
/// # Errors
///
/// [`SubmitError::Refused`] or the remote failure.
pub fn close_task<R: RemoteSource + ?Sized>(
    remote: &R,
    task_id: &str,
) -> Result<String, SubmitError> {
    let response = remote.close_task(task_id)?;
    let message = response.message.unwrap_or_default();
    if response.status == ResponseStatus::Success {
        info!(task = task_id, "task closed");
        Ok(message)
    } else {
        Err(SubmitError::Refused(message))
    }
}
