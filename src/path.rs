//! Path resolution shared by `get` and `set`.
//!
//! Every scrum entry lives at
//!
//! ```text
//! stor/scrum/<YYYY>/<MM>/<DD>/<username>
//! ```
//!
//! Both flows go through [`ObjectPath::entry`] (and [`ObjectPath::day`] for
//! listings) so reads and writes can never disagree on where data lives.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

use crate::error::UsageError;

/// Top-level storage namespace and the scrum tree below it.
const ROOT: [&str; 2] = ["stor", "scrum"];

// ─── Username ─────────────────────────────────────────────────────────────────

/// A validated username: non-empty and safe to use as a single path segment.
///
/// Surrounding whitespace is trimmed, so `" alice "` and `"alice"` name the
/// same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(raw: &str) -> Result<Self, UsageError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(UsageError::EmptyUsername);
        }
        if name.contains('/') {
            return Err(UsageError::InvalidUsername(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Day offset ───────────────────────────────────────────────────────────────

/// Shift applied to a base date before resolving a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayOffset {
    #[default]
    Today,
    Tomorrow,
    Yesterday,
    Days(i64),
}

impl DayOffset {
    /// Apply the offset to `base`.
    pub fn apply(self, base: NaiveDate) -> Result<NaiveDate, UsageError> {
        let delta = match self {
            Self::Today => 0,
            Self::Tomorrow => 1,
            Self::Yesterday => -1,
            Self::Days(n) => n,
        };
        add_days(base, delta)
    }
}

/// `date + n` days, for negative `n` too.
///
/// Fails with [`UsageError::DateOutOfRange`] when the result falls outside
/// the calendar chrono can represent.
pub fn add_days(date: NaiveDate, n: i64) -> Result<NaiveDate, UsageError> {
    let magnitude = Days::new(n.unsigned_abs());
    let shifted = if n >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.ok_or(UsageError::DateOutOfRange { base: date, days: n })
}

// ─── Object path ──────────────────────────────────────────────────────────────

/// A `/`-separated storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Directory holding every user's entry for `date`.
    pub fn day(date: NaiveDate) -> Self {
        Self(format!(
            "{}/{}/{:04}/{:02}/{:02}",
            ROOT[0],
            ROOT[1],
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// The object holding `user`'s entry for `date`.
    pub fn entry(date: NaiveDate, user: &Username) -> Self {
        Self::day(date).child(user.as_str())
    }

    /// Append one segment.
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}/{segment}", self.0))
    }

    /// Every directory above this path, shallowest first.
    ///
    /// For `stor/scrum/2024/03/01/alice` that is `stor`, `stor/scrum`,
    /// `stor/scrum/2024`, `stor/scrum/2024/03` and `stor/scrum/2024/03/01`.
    pub fn ancestors(&self) -> Vec<ObjectPath> {
        let segments: Vec<&str> = self.0.split('/').collect();
        (1..segments.len())
            .map(|n| Self(segments[..n].join("/")))
            .collect()
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
