use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use git_tidy::cli::{self, BranchCleanupArgs, RunOutcome, TagCleanupArgs};
use git_tidy::config::{self, Config};
use git_tidy::git::Git2Repository;
use git_tidy::hosting::GhCli;
use git_tidy::ui;

#[derive(Parser)]
#[command(
    name = "git-tidy",
    version,
    about = "Delete obsolete release tags and merged remote branches"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Remote to clean up [default: origin]")]
    remote: Option<String>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Delete old four-digit release tags beyond the retention count
    Tags(TagsArgs),
    /// Delete remote branches already merged into the default branch
    Branches(BranchesArgs),
}

#[derive(Args)]
struct TagsArgs {
    #[arg(long, value_name = "N", help = "Number of newest tags to keep [default: 50]")]
    keep: Option<usize>,

    #[arg(long, value_name = "N", help = "Only delete tags older than N months [default: 6]")]
    months: Option<u32>,

    #[arg(long, help = "Delete the tags instead of only reporting them")]
    apply: bool,
}

#[derive(Args)]
struct BranchesArgs {
    #[arg(long, help = "Delete the branches instead of only reporting them")]
    apply: bool,

    #[arg(long, value_name = "NAME", help = "Only consider this remote branch")]
    branch: Option<String>,

    #[arg(long, value_name = "PATH", help = "Issue export CSV [default: issues.csv]")]
    issues: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let remote = cli.remote.unwrap_or_else(|| config.remote.clone());

    let result = match cli.command {
        Command::Tags(args) => run_tags(&repo, &config, remote, args),
        Command::Branches(args) => run_branches(&repo, &config, remote, args),
    };

    match result {
        Ok(outcome) => {
            let code = outcome.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run_tags(
    repo: &Git2Repository,
    config: &Config,
    remote: String,
    args: TagsArgs,
) -> git_tidy::Result<RunOutcome> {
    let args = TagCleanupArgs {
        remote,
        keep: args.keep.unwrap_or(config.tags.keep),
        months: args.months.unwrap_or(config.tags.months),
        apply: args.apply,
    };
    let (_, outcome) = cli::run_tag_cleanup(repo, &args, chrono::Utc::now())?;
    Ok(outcome)
}

fn run_branches(
    repo: &Git2Repository,
    config: &Config,
    remote: String,
    args: BranchesArgs,
) -> git_tidy::Result<RunOutcome> {
    let args = BranchCleanupArgs {
        remote,
        branch: args.branch,
        issues_file: args
            .issues
            .unwrap_or_else(|| PathBuf::from(&config.branches.issues_file)),
        protected: config.branches.protected.clone(),
        apply: args.apply,
    };
    let hosting = GhCli::detect();
    let (_, outcome) = cli::run_branch_cleanup(repo, &hosting, &args)?;
    Ok(outcome)
}
