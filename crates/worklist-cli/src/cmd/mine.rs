//! `wl mine`: the viewer's own open or completed opportunities.

use super::Context;
use super::list::{ListArgs, run_list};
use clap::Args;
use worklist_core::view::ViewPreset;
use worklist_core::view::controller::WorklistController;

#[derive(Args, Debug, Clone, Default)]
pub struct MineArgs {
    /// Show completed opportunities instead of open ones.
    #[arg(long)]
    pub completed: bool,

    /// Include overdue items (hidden by default unless the config says otherwise).
    #[arg(long)]
    pub show_overdue: bool,

    #[command(flatten)]
    pub list: ListArgs,
}

impl MineArgs {
    pub const fn preset(&self) -> ViewPreset {
        if self.completed {
            ViewPreset::MyCompleted
        } else {
            ViewPreset::MyOpen
        }
    }

    pub const fn hide_overdue(&self, configured: bool) -> bool {
        configured && !self.show_overdue
    }
}

pub fn run_mine(args: &MineArgs, ctx: &Context) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    let preset = args.preset();
    let controller = WorklistController::new(remote, args.list.view_config(preset, ctx));
    run_list(
        ctx,
        controller,
        &args.list,
        args.hide_overdue(ctx.worklist().hide_overdue),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: MineArgs,
    }

    #[test]
    fn mine_args_parse_with_list_filters() {
        let parsed = Wrapper::parse_from(["test", "--completed", "--search", "acme"]);
        assert!(parsed.args.completed);
        assert_eq!(parsed.args.preset(), ViewPreset::MyCompleted);
        assert_eq!(parsed.args.list.search.as_deref(), Some("acme"));
    }

    #[test]
    fn show_overdue_overrides_config() {
        let parsed = Wrapper::parse_from(["test", "--show-overdue"]);
        assert_eq!(parsed.args.preset(), ViewPreset::MyOpen);
        assert!(!parsed.args.hide_overdue(true));

        let default = MineArgs::default();
        assert!(default.hide_overdue(true));
        assert!(!default.hide_overdue(false));
    }
}
