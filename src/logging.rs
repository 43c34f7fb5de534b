//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with `get` output on stdout.  The
//! filter comes from `$SCRUM_LOG` when set, otherwise from the CLI flags and
//! `[log].level`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Pick the filter directive used when `$SCRUM_LOG` is unset.
pub fn level<'a>(cfg: &'a LogConfig, verbose: bool, quiet: bool) -> &'a str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        &cfg.level
    }
}

pub fn init(cfg: &LogConfig, verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("SCRUM_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level(cfg, verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(cfg.color && console::Term::stderr().is_term())
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_take_precedence_over_config() {
        let cfg = LogConfig {
            level: "info".into(),
            color: false,
        };
        assert_eq!(level(&cfg, false, false), "info");
        assert_eq!(level(&cfg, true, false), "debug");
        assert_eq!(level(&cfg, false, true), "error");
    }
}
