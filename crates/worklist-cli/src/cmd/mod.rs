pub mod assign;
pub mod calendar;
pub mod close;
pub mod completions;
pub mod department;
pub mod employees;
pub mod kpi;
pub mod list;
pub mod mine;
pub mod team;

use crate::client::HttpRemote;
use crate::output::{CliError, OutputMode, render_error};
use chrono::NaiveDate;
use worklist_core::config::{EffectiveConfig, WorklistConfig};
use worklist_core::error::ErrorCode;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub output: OutputMode,
    pub quiet: bool,
    pub settings: EffectiveConfig,
}

impl Context {
    pub const fn worklist(&self) -> &WorklistConfig {
        &self.settings.user.worklist
    }

    /// Build the platform client, reporting a missing or broken server config.
    pub fn remote(&self) -> anyhow::Result<HttpRemote> {
        let built = self
            .settings
            .connection()
            .and_then(|connection| HttpRemote::new(&connection));
        if let Err(err) = &built {
            render_error(
                self.output,
                &CliError::coded(ErrorCode::NotConfigured, format!("{err:#}")),
            )?;
        }
        built
    }

    /// Local calendar date; urgency is always relative to it.
    pub fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Reject an inverted date range before any request is made.
    pub fn check_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<()> {
        match (from, to) {
            (Some(from), Some(to)) if from > to => {
                let message = format!("start date {from} is after end date {to}");
                render_error(self.output, &CliError::coded(ErrorCode::InvalidDate, &message))?;
                anyhow::bail!(message)
            }
            _ => Ok(()),
        }
    }
}
