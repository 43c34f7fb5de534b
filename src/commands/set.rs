//! `scrum set`: post a status for one day, or leave for a range of days.
//!
//! # Per-day decision
//!
//! | Probe result        | no `--force`           | `--force`            |
//! |---------------------|------------------------|----------------------|
//! | directory missing   | create dirs, write     | create dirs, write   |
//! | object missing      | write                  | write                |
//! | object exists       | warn, skip this day    | overwrite            |
//! | any other error     | abort the command      | write                |
//!
//! The body is loaded once, before any storage call, and written in full to
//! each day's object.

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use console::style;
use tracing::{debug, info, warn};

use crate::{
    cli::SetArgs,
    error::UsageError,
    path::{DayOffset, ObjectPath, Username, add_days},
    storage::{Probe, Storage, StorageError, probe},
    ui::make_spinner,
};

/// Date layout used in leave messages and progress output.
pub const DATE_LAYOUT: &str = "%Y/%m/%d";

// ─── Options ──────────────────────────────────────────────────────────────────

/// Where the posted text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Sick { until: NaiveDate },
    Vacation { until: NaiveDate },
    File(PathBuf),
    Stdin,
}

impl BodySource {
    /// Literal text for leave bodies; `None` for file-backed ones.
    pub fn leave_message(&self) -> Option<String> {
        match self {
            Self::Sick { until } => Some(format!("Sick leave until {}\n", until.format(DATE_LAYOUT))),
            Self::Vacation { until } => Some(format!("Vacation until {}\n", until.format(DATE_LAYOUT))),
            Self::File(_) | Self::Stdin => None,
        }
    }
}

/// Everything `set` needs, resolved once from flags.
#[derive(Debug, Clone)]
pub struct SetOptions {
    pub user: Username,
    /// First day to post for.
    pub start: NaiveDate,
    /// Number of consecutive days, at least 1.
    pub days: u32,
    pub force: bool,
    pub body: BodySource,
}

impl SetOptions {
    pub fn from_args(args: &SetArgs, today: NaiveDate) -> Result<Self, UsageError> {
        let user = Username::new(&args.user)?;

        for (flag, value) in [("--sick", args.sick), ("--vacation", args.vacation)] {
            if value == Some(0) {
                return Err(UsageError::ZeroDays { flag });
            }
        }

        // --tomorrow takes precedence over --days.
        let offset = match (args.tomorrow, args.days) {
            (true, _) => DayOffset::Tomorrow,
            (false, Some(n)) => DayOffset::Days(n),
            (false, None) => DayOffset::Today,
        };
        let start = offset.apply(args.date.unwrap_or(today))?;

        let leave = args.sick.unwrap_or(0).max(args.vacation.unwrap_or(0));
        let until = add_days(start, i64::from(leave))?;

        let body = if args.sick.is_some() {
            BodySource::Sick { until }
        } else if args.vacation.is_some() {
            BodySource::Vacation { until }
        } else {
            match &args.file {
                Some(path) if path.as_os_str() == "-" => BodySource::Stdin,
                Some(path) => BodySource::File(path.clone()),
                None => return Err(UsageError::MissingBody),
            }
        };

        Ok(Self {
            user,
            start,
            days: leave.max(1),
            force: args.force,
            body,
        })
    }
}

// ─── Decision ─────────────────────────────────────────────────────────────────

/// What to do for one day once its path has been probed.
#[derive(Debug)]
pub enum Action {
    CreateDirsThenWrite,
    Write,
    Skip,
    Abort(StorageError),
}

pub fn decide(probe: Probe, force: bool) -> Action {
    match probe {
        Probe::DirMissing => Action::CreateDirsThenWrite,
        Probe::NotFound => Action::Write,
        Probe::Exists if force => Action::Write,
        Probe::Exists => Action::Skip,
        Probe::Failed(_) if force => Action::Write,
        Probe::Failed(e) => Action::Abort(e),
    }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Paths touched by a `set` run.
#[derive(Debug, Default)]
pub struct SetReport {
    pub written: Vec<ObjectPath>,
    pub skipped: Vec<ObjectPath>,
}

pub fn run(storage: &dyn Storage, opts: &SetOptions) -> Result<SetReport> {
    let body = load_body(&opts.body)?;
    let mut report = SetReport::default();

    for day in 0..opts.days {
        let date = add_days(opts.start, i64::from(day))?;
        let path = ObjectPath::entry(date, &opts.user);

        let probed = probe(storage, &path);
        debug!(path = %path, probe = ?probed, "checked for existing scrum");

        match decide(probed, opts.force) {
            Action::Abort(e) => {
                return Err(e).with_context(|| format!("unable to get object {path}"));
            },
            Action::Skip => {
                warn!(path = %path, "scrum already exists, specify -f to override");
                report.skipped.push(path);
                continue;
            },
            Action::CreateDirsThenWrite => create_dirs(storage, &path)?,
            Action::Write => {},
        }

        let label = format!("Scrumming for {}", date.format(DATE_LAYOUT));
        info!(path = %path, "{label}");
        let spinner = make_spinner(&label);
        let result = storage.put_object(&path, &mut body.as_slice());
        spinner.finish_and_clear();
        result.with_context(|| format!("unable to put object {path}"))?;

        println!("  {}  {}", style("✓").green().bold(), style(&path).bold());
        report.written.push(path);
    }

    Ok(report)
}

/// Create every directory above `path`, shallowest first.
fn create_dirs(storage: &dyn Storage, path: &ObjectPath) -> Result<()> {
    for dir in path.ancestors() {
        debug!(dir = %dir, "creating directory");
        storage
            .put_directory(&dir)
            .with_context(|| format!("unable to create directory {dir}"))?;
    }
    Ok(())
}

fn load_body(source: &BodySource) -> Result<Vec<u8>> {
    match source {
        BodySource::Sick { .. } | BodySource::Vacation { .. } => {
            Ok(source.leave_message().unwrap_or_default().into_bytes())
        },
        BodySource::File(path) => {
            fs::read(path).with_context(|| format!("unable to open file {}", path.display()))
        },
        BodySource::Stdin => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("unable to read scrum from stdin")?;
            Ok(buf)
        },
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
