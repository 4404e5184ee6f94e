//! `wl close`: mark one worklist task as done on the platform.

use super::Context;
use crate::output::{render_success, report};
use clap::Args;
use worklist_core::assign::close_task;

#[derive(Args, Debug, Clone)]
pub struct CloseArgs {
    /// Task id (the `task_id` column of `wl mine --json`).
    pub task: String,
}

pub fn run_close(args: &CloseArgs, ctx: &Context) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    let message = report(ctx.output, close_task(&remote, &args.task))?;
    let message = if message.is_empty() {
        format!("Closed {}", args.task)
    } else {
        message
    };
    render_success(ctx.output, &message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_args_parses_task() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CloseArgs,
        }
        let w = Wrapper::parse_from(["test", "TODO-0042"]);
        assert_eq!(w.args.task, "TODO-0042");
    }
}
