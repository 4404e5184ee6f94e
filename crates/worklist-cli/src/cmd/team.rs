//! `wl team`: open opportunities of one team, or of every visible team.

use super::Context;
use super::list::{ListArgs, run_list};
use crate::output::report;
use clap::Args;
use tracing::debug;
use worklist_core::view::ViewPreset;
use worklist_core::view::controller::{WorklistController, default_team};

#[derive(Args, Debug, Clone, Default)]
pub struct TeamArgs {
    /// Team (department) to show. Defaults to your own department.
    #[arg(long, conflicts_with = "all")]
    pub team: Option<String>,

    /// Show every team you can see.
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub list: ListArgs,
}

pub fn run_team(args: &TeamArgs, ctx: &Context) -> anyhow::Result<()> {
    let remote = ctx.remote()?;

    let team = if args.all {
        None
    } else if let Some(team) = &args.team {
        Some(team.clone())
    } else {
        let picked = report(ctx.output, default_team(&remote))?;
        debug!(team = ?picked, "default team resolved");
        picked
    };

    let mut controller =
        WorklistController::new(remote, args.list.view_config(ViewPreset::Team, ctx));
    controller.set_team(team);
    // Overdue items stay visible on team lists.
    run_list(ctx, controller, &args.list, false)
}
