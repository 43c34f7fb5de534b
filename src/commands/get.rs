//! `scrum get`: read one user's entry, or everyone's for a day.
//!
//! Single-user output is just the trimmed body.  `--all` prints, for every
//! non-ignored user in listing order:
//!
//! ```text
//! --------------------------------------------------------------------------
//! user   alice
//! mtime  2024-03-01 09:30:00 +01:00
//!
//! <body>
//! ```
//!
//! Output is flushed after each entry so a failing fetch never tears a
//! previous one.  Entries are fetched one after another.

use std::io::{BufWriter, Read, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::{
    cli::GetArgs,
    config::{GetConfig, IgnoreSet},
    error::UsageError,
    pager::Output,
    path::{DayOffset, ObjectPath, Username},
    storage::{EntryKind, Storage, StorageError},
    ui::{render_header, separator, terminal_width},
};

// ─── Options ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(Username),
    All,
}

/// Everything `get` needs, resolved once from flags and config.
#[derive(Debug, Clone)]
pub struct GetOptions {
    pub date: NaiveDate,
    pub target: Target,
    pub use_pager: bool,
    pub utc: bool,
}

impl GetOptions {
    pub fn from_args(args: &GetArgs, cfg: &GetConfig, today: NaiveDate) -> Result<Self, UsageError> {
        let offset = match (args.tomorrow, args.yesterday) {
            (true, true) => {
                return Err(UsageError::ConflictingFlags {
                    first: "--tomorrow",
                    second: "--yesterday",
                });
            },
            (true, false) => DayOffset::Tomorrow,
            (false, true) => DayOffset::Yesterday,
            (false, false) => DayOffset::Today,
        };

        let target = if args.all {
            Target::All
        } else {
            Target::User(Username::new(&args.user)?)
        };

        let use_pager = if args.no_pager {
            false
        } else {
            args.use_pager || cfg.use_pager
        };

        Ok(Self {
            date: offset.apply(args.date.unwrap_or(today))?,
            target,
            use_pager,
            utc: args.utc || cfg.utc,
        })
    }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

pub fn run(storage: &dyn Storage, opts: &GetOptions, ignore: &IgnoreSet) -> Result<()> {
    let mut out = Output::open(opts.use_pager).context("unable to open pager")?;

    let result = match &opts.target {
        Target::User(user) => {
            let path = ObjectPath::entry(opts.date, user);
            get_one(storage, &path, None, &mut out)
        },
        Target::All => {
            get_all(storage, opts.date, ignore, opts.utc, terminal_width(), &mut out).map(|_| ())
        },
    };

    let finished = out.finish();
    result?;
    finished.context("pager failed")?;
    Ok(())
}

// ─── Single user ──────────────────────────────────────────────────────────────

/// Fetch `path` and write its trimmed body plus one newline.
///
/// With `header = Some(utc)` the user/mtime table is written first.  Nothing
/// is written unless the whole object was read.
pub fn get_one(
    storage: &dyn Storage,
    path: &ObjectPath,
    header: Option<bool>,
    w: &mut dyn Write,
) -> Result<()> {
    let mut obj = storage
        .get_object(path)
        .with_context(|| format!("unable to get object {path}"))?;

    let mut body = Vec::new();
    obj.reader
        .read_to_end(&mut body)
        .with_context(|| format!("unable to read object {path}"))?;

    if let Some(utc) = header {
        w.write_all(render_header(path.name(), obj.last_modified, utc).as_bytes())?;
    }
    w.write_all(body.trim_ascii())?;
    w.write_all(b"\n")?;
    Ok(())
}

// ─── All users ────────────────────────────────────────────────────────────────

/// Write every non-ignored entry for `date`, returning how many were shown.
///
/// A failed entry is logged and the loop goes on; the first failure is
/// returned once every entry has been attempted.
pub fn get_all(
    storage: &dyn Storage,
    date: NaiveDate,
    ignore: &IgnoreSet,
    utc: bool,
    width: usize,
    out: &mut dyn Write,
) -> Result<usize> {
    let day = ObjectPath::day(date);
    let entries = match storage.list_directory(&day) {
        Ok(entries) => entries,
        Err(StorageError::DirectoryNotFound(_) | StorageError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e).with_context(|| format!("unable to list directory {day}")),
    };

    let users: Vec<String> = entries
        .into_iter()
        .filter(|e| e.kind == EntryKind::Object)
        .map(|e| e.name)
        .collect();

    if users.is_empty() {
        info!(date = %date, "no users have scrummed for this day");
        return Ok(0);
    }

    let rule = separator(width);
    let mut w = BufWriter::new(out);
    let mut shown = 0;
    let mut first_error: Option<anyhow::Error> = None;

    for user in &users {
        if ignore.contains(user) {
            debug!(username = %user, "skipping ignored user");
            continue;
        }

        w.write_all(rule.as_bytes())?;
        match get_one(storage, &day.child(user), Some(utc), &mut w) {
            Ok(()) => shown += 1,
            Err(e) => {
                let reason = format!("{e:#}");
                error!(username = %user, error = %reason, "unable to get user's scrum");
                first_error.get_or_insert(e);
            },
        }
        w.flush()?;
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(shown),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::IgnoreConfig, storage::memory::MemoryStorage};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn entry(user: &str) -> ObjectPath {
        ObjectPath::entry(day(), &Username::new(user).unwrap())
    }

    fn ignoring(users: &[&str]) -> IgnoreSet {
        IgnoreSet::from(&IgnoreConfig {
            users: users.iter().map(ToString::to_string).collect(),
        })
    }

    fn all(store: &MemoryStorage, ignore: &IgnoreSet) -> (Result<usize>, String) {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        let result = get_all(store, day(), ignore, true, 10, &mut buf);
        (result, String::from_utf8(buf).unwrap())
    }

    // ── Options ───────────────────────────────────────────────────────────────

    #[test]
    fn tomorrow_and_yesterday_conflict_even_with_all() {
        let args = GetArgs {
            all: true,
            tomorrow: true,
            yesterday: true,
            ..GetArgs::default()
        };
        assert!(matches!(
            GetOptions::from_args(&args, &GetConfig::default(), day()),
            Err(UsageError::ConflictingFlags { .. })
        ));
    }

    #[test]
    fn all_ignores_missing_user() {
        let args = GetArgs {
            all: true,
            ..GetArgs::default()
        };
        let opts = GetOptions::from_args(&args, &GetConfig::default(), day()).unwrap();
        assert_eq!(opts.target, Target::All);
    }

    #[test]
    fn single_user_requires_a_name() {
        let args = GetArgs::default();
        assert_eq!(
            GetOptions::from_args(&args, &GetConfig::default(), day()).unwrap_err(),
            UsageError::EmptyUsername
        );
    }

    #[test]
    fn flags_override_config() {
        let cfg = GetConfig {
            use_pager: true,
            utc: false,
        };
        let args = GetArgs {
            user: "bob".into(),
            no_pager: true,
            utc: true,
            yesterday: true,
            ..GetArgs::default()
        };
        let opts = GetOptions::from_args(&args, &cfg, day()).unwrap();
        assert!(!opts.use_pager);
        assert!(opts.utc);
        assert_eq!(opts.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn yesterday_before_the_calendar_is_rejected() {
        let args = GetArgs {
            all: true,
            yesterday: true,
            date: Some(NaiveDate::MIN),
            ..GetArgs::default()
        };
        assert!(matches!(
            GetOptions::from_args(&args, &GetConfig::default(), day()),
            Err(UsageError::DateOutOfRange { days: -1, .. })
        ));
    }

    // ── get_one ───────────────────────────────────────────────────────────────

    #[test]
    fn body_is_trimmed_and_newline_terminated() {
        let store = MemoryStorage::new();
        store.seed(&entry("alice"), "\n\n  shipped the thing  \n\n");

        let mut buf = Vec::new();
        get_one(&store, &entry("alice"), None, &mut buf).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "shipped the thing\n");
    }

    #[test]
    fn missing_entry_is_an_error() {
        let store = MemoryStorage::new();
        let mut buf = Vec::new();

        let err = get_one(&store, &entry("alice"), None, &mut buf).unwrap_err();

        assert!(err.to_string().contains("unable to get object stor/scrum/2024/03/01/alice"));
        assert!(buf.is_empty());
    }

    // ── get_all ───────────────────────────────────────────────────────────────

    #[test]
    fn empty_day_produces_no_output() {
        let (result, out) = all(&MemoryStorage::new(), &IgnoreSet::default());
        assert_eq!(result.unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn ignored_users_are_skipped_in_listing_order() {
        let store = MemoryStorage::new();
        for user in ["carol", "scrumbot", "alice"] {
            store.seed(&entry(user), &format!("{user} update"));
        }

        let (result, out) = all(&store, &ignoring(&["scrumbot"]));

        assert_eq!(result.unwrap(), 2);
        insta::assert_snapshot!(out, @r"
        ----------
        user   alice
        mtime  2024-03-01 09:30:00 UTC

        alice update
        ----------
        user   carol
        mtime  2024-03-01 09:30:00 UTC

        carol update
        ");
    }

    #[test]
    fn failed_entry_does_not_stop_the_loop() {
        let store = MemoryStorage::new();
        for user in ["alice", "bob", "carol"] {
            store.seed(&entry(user), &format!("{user} update"));
        }
        store.fail_on(&entry("bob"));

        let (result, out) = all(&store, &IgnoreSet::default());

        let err = result.unwrap_err();
        assert!(err.to_string().contains("unable to get object stor/scrum/2024/03/01/bob"));
        assert!(out.contains("alice update"));
        assert!(out.contains("carol update"));
        assert!(!out.contains("bob update"));
        assert_eq!(out.matches("----------\n").count(), 3);
    }

    /// Records how many bytes had been written at every `flush()`.
    #[derive(Default)]
    struct FlushLog {
        bytes: Vec<u8>,
        flushed_at: Vec<usize>,
    }

    impl Write for FlushLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed_at.push(self.bytes.len());
            Ok(())
        }
    }

    #[test]
    fn output_is_flushed_after_every_entry() {
        console::set_colors_enabled(false);
        let store = MemoryStorage::new();
        for user in ["alice", "bob", "carol"] {
            store.seed(&entry(user), &format!("{user} update"));
        }
        store.fail_on(&entry("bob"));

        let mut log = FlushLog::default();
        let result = get_all(&store, day(), &IgnoreSet::default(), true, 10, &mut log);
        assert!(result.is_err());

        let text = String::from_utf8(log.bytes.clone()).unwrap();
        let boundaries: Vec<usize> = text
            .match_indices("----------\n")
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(text.len()))
            .collect();
        assert_eq!(log.flushed_at, boundaries);
    }

    #[test]
    fn listing_failure_is_fatal() {
        let store = MemoryStorage::new();
        store.seed(&entry("alice"), "hi");
        store.fail_on(&ObjectPath::day(day()));

        let (result, out) = all(&store, &IgnoreSet::default());

        assert!(result.unwrap_err().to_string().contains("unable to list directory"));
        assert!(out.is_empty());
    }
}
