//! `scrum`: post and read daily scrum updates kept in object storage.
//!
//! # Overview
//!
//! Every update is a small text object at `stor/scrum/<YYYY>/<MM>/<DD>/<user>`.
//! `scrum set` uploads one (or one per day of a sick/vacation leave) and
//! `scrum get` reads a single user's entry or everyone's for a day, through a
//! pager by default.
//!
//! # Usage
//!
//! ```text
//! scrum set -u alice -i notes.txt     # post notes.txt as today's status
//! scrum set -u alice -t -f -i n.txt   # overwrite tomorrow's status
//! scrum set -u alice -v 5             # on vacation for the next five days
//! scrum get                           # my status for today ($USER)
//! scrum get -u bob -y                 # bob's status from yesterday
//! scrum get -a -D 2024-03-01          # everyone on a given day
//! scrum --print-config                # show the resolved configuration
//! ```
//!
//! # Module layout
//!
//! | Module              | Responsibility                                   |
//! |---------------------|--------------------------------------------------|
//! | [`cli`]             | Argument types parsed by clap                    |
//! | [`config`]          | `Config` struct + TOML loader                    |
//! | [`error`]           | Flag validation errors                           |
//! | [`logging`]         | tracing subscriber setup                         |
//! | [`path`]            | Date + username → object path                    |
//! | [`storage`]         | Storage trait and the fs / S3 backends           |
//! | [`pager`]           | `$PAGER` process or stdout                       |
//! | [`ui`]              | Entry headers, separators, spinner               |
//! | [`commands::get`]   | `scrum get`                                      |
//! | [`commands::set`]   | `scrum set`                                      |

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod path;
mod pager;
mod storage;
mod ui;

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser};
use cli::{Cli, Subcommand};
use commands::{get::GetOptions, set::SetOptions};
use config::{Config, IgnoreSet, default_config_path, load_config};
use tracing::{debug, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let explicit = cli.config.is_some();
    let config_path = cli.config.clone().or_else(default_config_path);
    let loaded = match &config_path {
        Some(path) => load_config(path)?,
        None => None,
    };
    let missing = loaded.is_none();
    let cfg: Config = loaded.unwrap_or_default();

    logging::init(&cfg.log, cli.verbose, cli.quiet)?;
    if missing {
        let shown = config_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if explicit {
            warn!(path = %shown, "config file not found, using defaults");
        } else {
            debug!(path = %shown, "no config file, using defaults");
        }
    }

    if !cfg.log.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if cli.print_config {
        println!("{cfg:#?}");
        return Ok(());
    }

    let today = Local::now().date_naive();

    match &cli.command {
        // ── scrum get ─────────────────────────────────────────────────────────
        Some(Subcommand::Get(args)) => {
            let opts = GetOptions::from_args(args, &cfg.get, today)?;
            let ignore = IgnoreSet::from(&cfg.ignore);
            let storage = storage::open(&cfg.storage)?;
            commands::get::run(storage.as_ref(), &opts, &ignore)?;
        },

        // ── scrum set ─────────────────────────────────────────────────────────
        Some(Subcommand::Set(args)) => {
            let opts = SetOptions::from_args(args, today)?;
            let storage = storage::open(&cfg.storage)?;
            let report = commands::set::run(storage.as_ref(), &opts)?;
            if report.written.is_empty() && !report.skipped.is_empty() {
                eprintln!("Nothing posted; pass -f to overwrite existing entries.");
            }
        },

        None => Cli::command().print_help()?,
    }

    Ok(())
}
