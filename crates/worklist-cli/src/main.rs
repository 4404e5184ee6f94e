#![forbid(unsafe_code)]

mod client;
mod cmd;
mod output;

use clap::error::ContextKind;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use worklist_core::config::resolve_config;
use worklist_core::error::ErrorCode;
use worklist_core::model::ParseEnumError;

#[derive(Parser, Debug)]
#[command(
    name = "wl",
    author,
    version,
    about = "wl: opportunity worklists, team assignment and KPIs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Mode used before the config file has been read.
    fn fallback_output(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            self.format.unwrap_or(OutputMode::Text)
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Worklists",
        about = "List your own opportunities",
        long_about = "List the opportunities assigned to you, most urgent first.\n\n\
                      Overdue items are hidden unless --show-overdue is given or \
                      [worklist] hide_overdue = false is set in the config.",
        after_help = "EXAMPLES:\n    # Open opportunities, including overdue ones\n    wl mine --show-overdue\n\n    # Completed opportunities as JSON\n    wl mine --completed --json\n\n    # Sort by days left, descending (second click flips)\n    wl mine --sort days --sort days"
    )]
    Mine(cmd::mine::MineArgs),

    #[command(
        next_help_heading = "Worklists",
        about = "List a team's open opportunities",
        long_about = "List open opportunities of one team. Without --team, your own \
                      department is used when it is one of the teams you can see.",
        after_help = "EXAMPLES:\n    # Your department's worklist\n    wl team\n\n    # Every team you can see\n    wl team --all\n\n    # One team, only items due today\n    wl team --team Sales --urgency due_today"
    )]
    Team(cmd::team::TeamArgs),

    #[command(
        next_help_heading = "Insights",
        about = "Show on-time completion KPIs",
        long_about = "Show overall on-time completion and a ranked breakdown by employee or team.",
        after_help = "EXAMPLES:\n    # This year, by employee\n    wl kpi --from 2026-01-01 --to 2026-12-31\n\n    # All time, by team\n    wl kpi --by team"
    )]
    Kpi(cmd::kpi::KpiArgs),

    #[command(
        next_help_heading = "Insights",
        about = "Show opportunities by closing date",
        long_about = "Show opportunities closing in a date range, grouped by day.",
        after_help = "EXAMPLES:\n    # October, only one engineer\n    wl calendar --start 2026-10-01 --end 2026-10-31 --engineer ana@example.com\n\n    # Values accepted by the filters\n    wl calendar --options"
    )]
    Calendar(cmd::calendar::CalendarArgs),

    #[command(
        next_help_heading = "Team assignment",
        about = "List employees and their departments",
        long_about = "List the employee roster with headcount stats. Filters combine.",
        after_help = "EXAMPLES:\n    # Employees without a department\n    wl employees --status unassigned\n\n    # Search one department\n    wl employees --department Sales --search ann"
    )]
    Employees(cmd::employees::EmployeesArgs),

    #[command(
        next_help_heading = "Team assignment",
        about = "Assign employees to departments",
        long_about = "Stage EMPLOYEE=DEPARTMENT pairs and submit them as one batch. \
                      Without --yes the batch is only previewed.",
        after_help = "EXAMPLES:\n    # Preview\n    wl assign HR-EMP-0001=Sales HR-EMP-0002=Ops\n\n    # Submit\n    wl assign HR-EMP-0001=Sales --yes"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Team assignment",
        about = "Create a department",
        after_help = "EXAMPLES:\n    wl create-department \"Field Service\""
    )]
    CreateDepartment(cmd::department::CreateDepartmentArgs),

    #[command(
        next_help_heading = "Tasks",
        about = "Close a worklist task",
        after_help = "EXAMPLES:\n    # Task ids are in the task_id field of `wl mine --json`\n    wl close TODO-0042"
    )]
    Close(cmd::close::CloseArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    wl completions bash > ~/.local/share/bash-completion/completions/wl"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "worklist=debug,info"
        } else {
            "worklist=info,warn"
        })
    });

    let format = env::var("WL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Error code for a value one of our own parsers rejected. Other usage
/// errors stay with clap.
fn usage_error(err: &clap::Error) -> Option<CliError> {
    let source = std::error::Error::source(err)?;
    let code = if source.is::<ParseEnumError>() {
        ErrorCode::InvalidEnumValue
    } else if source.is::<chrono::ParseError>() {
        ErrorCode::InvalidDate
    } else {
        return None;
    };
    let message = match err.get(ContextKind::InvalidArg) {
        Some(arg) => format!("{arg}: {source}"),
        None => source.to_string(),
    };
    Some(CliError::coded(code, message))
}

/// Whether JSON output was asked for on a command line clap could not parse.
fn json_requested(args: &[String]) -> bool {
    args.iter().enumerate().any(|(i, arg)| {
        arg == "--json"
            || arg == "--format=json"
            || (arg == "--format" && args.get(i + 1).is_some_and(|next| next == "json"))
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let Some(error) = usage_error(&err) else {
                err.exit();
            };
            let args: Vec<String> = env::args().collect();
            let mode = if json_requested(&args) {
                OutputMode::Json
            } else {
                OutputMode::Text
            };
            render_error(mode, &error)?;
            anyhow::bail!(error.message);
        }
    };

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let settings = match resolve_config(cli.json, cli.format.map(OutputMode::as_str)) {
        Ok(settings) => settings,
        Err(err) => {
            render_error(
                cli.fallback_output(),
                &CliError::coded(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };
    let ctx = cmd::Context {
        output: OutputMode::from_resolved(&settings.resolved_output),
        quiet: cli.quiet,
        settings,
    };

    match &cli.command {
        Commands::Mine(args) => cmd::mine::run_mine(args, &ctx),
        Commands::Team(args) => cmd::team::run_team(args, &ctx),
        Commands::Kpi(args) => cmd::kpi::run_kpi(args, &ctx),
        Commands::Calendar(args) => cmd::calendar::run_calendar(args, &ctx),
        Commands::Employees(args) => cmd::employees::run_employees(args, &ctx),
        Commands::Assign(args) => cmd::assign::run_assign(args, &ctx),
        Commands::CreateDepartment(args) => cmd::department::run_create_department(args, &ctx),
        Commands::Close(args) => cmd::close::run_close(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklist_core::sort::SortColumn;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn completions_register_the_binary_name() {
        let mut command = Cli::command();
        assert_eq!(command.get_name(), "wl");
        let mut buf = Vec::new();
        cmd::completions::write_completions(clap_complete::Shell::Bash, &mut command, &mut buf)
            .expect("generate");
        let script = String::from_utf8(buf).expect("utf8");
        assert!(script.contains("complete -F _wl"));
        assert!(!script.contains("worklist-cli"));
    }

    #[test]
    fn bad_enum_and_date_values_get_codes() {
        let err = Cli::try_parse_from(["wl", "mine", "--urgency", "soonish"]).expect_err("invalid");
        let error = usage_error(&err).expect("coded");
        assert_eq!(error.error_code.as_deref(), Some("E2001"));
        assert!(error.message.contains("soonish"));

        let err = Cli::try_parse_from(["wl", "kpi", "--from", "01/02/2026"]).expect_err("invalid");
        let error = usage_error(&err).expect("coded");
        assert_eq!(error.error_code.as_deref(), Some("E2002"));
        assert!(error.message.contains("--from"));

        let err = Cli::try_parse_from(["wl", "mine", "--bogus"]).expect_err("invalid");
        assert!(usage_error(&err).is_none());
    }

    #[test]
    fn json_mode_detected_from_raw_args() {
        let args = |raw: &[&str]| raw.iter().map(|a| (*a).to_string()).collect::<Vec<_>>();
        assert!(json_requested(&args(&["wl", "mine", "--json"])));
        assert!(json_requested(&args(&["wl", "--format", "json", "kpi"])));
        assert!(json_requested(&args(&["wl", "--format=json", "kpi"])));
        assert!(!json_requested(&args(&["wl", "--format", "text", "kpi"])));
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["wl", "mine", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.fallback_output(), OutputMode::Json);
    }

    #[test]
    fn format_flag_accepts_aliases() {
        let cli = Cli::parse_from(["wl", "--format", "human", "kpi"]);
        assert_eq!(cli.format, Some(OutputMode::Pretty));
        assert!(Cli::try_parse_from(["wl", "--format", "yaml", "kpi"]).is_err());
    }

    #[test]
    fn repeated_sort_flags_are_kept_in_order() {
        let cli = Cli::parse_from(["wl", "team", "--sort", "urgency", "--sort", "customer"]);
        let Commands::Team(args) = cli.command else {
            panic!("expected team command");
        };
        assert_eq!(
            args.list.sort,
            vec![SortColumn::Urgency, SortColumn::Customer]
        );
    }

    #[test]
    fn create_department_is_kebab_case() {
        let cli = Cli::parse_from(["wl", "create-department", "Field Service"]);
        assert!(matches!(cli.command, Commands::CreateDepartment(_)));
    }
}
