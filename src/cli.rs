//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main`, folded
//! together with the config into `GetOptions`/`SetOptions`, and never
//! consulted again.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser};

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "scrum",
    about   = "Post and read daily scrum updates",
    version,
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Path to the configuration file.
    ///
    /// Defaults to `scrum/config.toml` under the platform config directory
    /// (`~/.config` on Linux).
    #[arg(short, long, global = true, env = "SCRUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration and exit.
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Log debug output to stderr.
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Subcommand>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Subcommand {
    /// Get scrum information, either for yourself or teammates.
    ///
    /// Examples:
    ///   scrum get                        # my scrum for today
    ///   scrum get -t -u other.username   # other.username's scrum for tomorrow
    ///   scrum get -a -y                  # everyone's scrum from yesterday
    #[command(visible_alias = "fetch")]
    Get(GetArgs),

    /// Set your scrum status.
    ///
    /// Examples:
    ///   scrum set -u alice -i notes.txt  # post notes.txt for today
    ///   scrum set -u alice -s 3          # sick for three days starting today
    #[command(visible_alias = "post")]
    Set(SetArgs),
}

#[derive(Args, Debug, Default)]
pub struct GetArgs {
    /// Get scrum for all users.  `--user` is ignored.
    #[arg(short, long)]
    pub all: bool,

    /// Date for scrum (YYYY-MM-DD).  Defaults to today.
    #[arg(short = 'D', long)]
    pub date: Option<NaiveDate>,

    /// Get scrum for the next day.
    #[arg(short, long)]
    pub tomorrow: bool,

    /// Get scrum for the previous day.
    #[arg(short, long)]
    pub yesterday: bool,

    /// Get scrum for the specified user.
    #[arg(short, long, env = "USER", default_value = "")]
    pub user: String,

    /// Read the output through a pager ($PAGER, less or more).
    #[arg(short = 'P', long, overrides_with = "no_pager")]
    pub use_pager: bool,

    /// Write straight to stdout.
    #[arg(long)]
    pub no_pager: bool,

    /// Show mtime data in UTC.
    #[arg(short = 'Z', long)]
    pub utc: bool,
}

#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// User to scrum as.
    #[arg(short, long, env = "USER", default_value = "")]
    pub user: String,

    /// Force overwrite of any present scrum.
    #[arg(short, long)]
    pub force: bool,

    /// Base date (YYYY-MM-DD).  Defaults to today.
    #[arg(short = 'D', long)]
    pub date: Option<NaiveDate>,

    /// Scrum for tomorrow.
    #[arg(short, long)]
    pub tomorrow: bool,

    /// Scrum for n days from the base date (negative to backdate).
    #[arg(short, long, allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Sick leave for n days.
    #[arg(short, long)]
    pub sick: Option<u32>,

    /// Vacation for n days.
    #[arg(short, long)]
    pub vacation: Option<u32>,

    /// File to read scrum from (`-` for stdin).
    #[arg(short = 'i', long)]
    pub file: Option<PathBuf>,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
