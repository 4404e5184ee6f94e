//! Loads worklists through a [`RemoteSource`] and owns the resulting view.
//!
//! Every load is tagged with a generation number. When a load finishes after
//! a newer one was started, its result is dropped instead of overwriting the
//! newer state.

use super::{ViewConfig, ViewPreset, WorklistView};
use crate::model::item::WorkItem;
use crate::model::team::{MemberStat, member_stats_from_items};
use crate::remote::{RemoteError, RemoteSource};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Handle for one in-progress load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// A normalized worklist payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedWorklist {
    pub items: Vec<WorkItem>,
    pub member_stats: Vec<MemberStat>,
}

/// Team shown when the viewer picks none: their own department when it is
/// one of the available teams, otherwise every team.
///
/// # Errors
///
/// Propagates the first failed remote call.
pub fn default_team<R: RemoteSource + ?Sized>(remote: &R) -> Result<Option<String>, RemoteError> {
    let teams = remote.get_available_teams()?;
    if teams.is_empty() {
        return Ok(None);
    }
    let department = remote.get_viewer_department()?;
    Ok(department.filter(|d| teams.iter().any(|t| t == d)))
}

pub struct WorklistController<R: RemoteSource> {
    remote: R,
    view: WorklistView,
    team: Option<String>,
    member_stats: Vec<MemberStat>,
    generation: u64,
}

impl<R: RemoteSource> WorklistController<R> {
    pub fn new(remote: R, config: ViewConfig) -> Self {
        Self {
            remote,
            view: WorklistView::new(config),
            team: None,
            member_stats: Vec::new(),
            generation: 0,
        }
    }

    pub const fn view(&self) -> &WorklistView {
        &self.view
    }

    pub const fn view_mut(&mut self) -> &mut WorklistView {
        &mut self.view
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    #[must_use]
    pub fn member_stats(&self) -> &[MemberStat] {
        &self.member_stats
    }

    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Team for the team preset; `None` means all teams.
    pub fn set_team(&mut self, team: Option<String>) {
        self.team = team.filter(|t| !t.trim().is_empty());
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Fetch and normalize the preset's items. Does not touch the view.
    ///
    /// # Errors
    ///
    /// Returns the remote failure unchanged.
    pub fn fetch(&self, ticket: LoadTicket, today: NaiveDate) -> Result<LoadedWorklist, RemoteError> {
        let preset = self.view.config.preset;
        debug!(%preset, generation = ticket.generation, team = ?self.team, "fetching worklist");
        match preset {
            ViewPreset::MyOpen | ViewPreset::MyCompleted => {
                let raw = self.remote.get_worklist(preset.include_completed())?;
                Ok(LoadedWorklist {
                    items: WorkItem::from_raw_batch(raw, today),
                    member_stats: Vec::new(),
                })
            }
            ViewPreset::Team => {
                let payload = self.remote.get_team_worklist(self.team.as_deref(), false)?;
                let items = WorkItem::from_raw_batch(payload.items, today);
                let member_stats = if payload.member_stats.is_empty() {
                    member_stats_from_items(&items)
                } else {
                    payload.member_stats
                };
                Ok(LoadedWorklist {
                    items,
                    member_stats,
                })
            }
        }
    }

    /// Install a finished load. Returns `false` and leaves the view
    /// untouched when a newer load was started after `ticket`.
    pub fn apply_load(&mut self, ticket: LoadTicket, loaded: LoadedWorklist) -> bool {
        if ticket.generation != self.generation {
            warn!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded worklist response"
            );
            return false;
        }
        self.view.replace_items(loaded.items);
        self.member_stats = loaded.member_stats;
        true
    }

    /// Fetch and install in one step.
    ///
    /// # Errors
    ///
    /// Returns the remote failure; the previous items stay in place.
    pub fn reload(&mut self, today: NaiveDate) -> Result<(), RemoteError> {
        let ticket = self.begin_load();
        let loaded = self.fetch(ticket, today)?;
        self.apply_load(ticket, loaded);
        Ok(())
    }
}
