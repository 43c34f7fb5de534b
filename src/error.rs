//! Usage errors raised while folding flags and config into command options.
//!
//! Everything in here is detected before a storage backend is constructed, so
//! a bad invocation never touches the remote store.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("{first} and {second} are conflicting options")]
    ConflictingFlags {
        first: &'static str,
        second: &'static str,
    },

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("invalid username {0:?}: must not contain '/'")]
    InvalidUsername(String),

    #[error("nothing to post: pass --file, --sick or --vacation")]
    MissingBody,

    #[error("{days} days from {base} is outside the supported calendar")]
    DateOutOfRange { base: NaiveDate, days: i64 },

    #[error("{flag} must be at least 1 day")]
    ZeroDays { flag: &'static str },
}
