//! Tracing setup for the `contacts` binary.
//!
//! Logs go to stderr so listings and `--json` output on stdout stay clean.
//! `RUST_LOG`, when set and valid, replaces the verbosity-derived filter.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events pass the default filter.
const LOG_TARGETS: [&str; 3] = ["contactlist", "contactlist_linux", "contactlist_mac"];

/// How much the binary logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors, e.g. a failed call hand-off.
    #[default]
    Normal,
    /// Adds store writes and deletion flow transitions.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Pick a level from `-q` and the number of `-v` flags. `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The most detailed level let through.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives for our own crates at this level.
    #[must_use]
    pub fn directives(&self) -> String {
        let level = self.to_level_filter();
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn build_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directives()))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(verbosity: Verbosity) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbosity, rust_log.as_deref()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 4), Verbosity::Trace);
    }

    #[test]
    fn test_normal_is_warn() {
        assert_eq!(Verbosity::default().to_level_filter(), Level::WARN);
    }

    #[test]
    fn test_directives_cover_platform_crates() {
        assert_eq!(
            Verbosity::Verbose.directives(),
            "contactlist=DEBUG,contactlist_linux=DEBUG,contactlist_mac=DEBUG"
        );
    }

    #[test]
    fn test_rust_log_overrides_verbosity() {
        let filter = build_filter(Verbosity::Quiet, Some("contactlist=trace"));
        assert_eq!(filter.to_string().to_lowercase(), "contactlist=trace");
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let filter = build_filter(Verbosity::Quiet, Some("contactlist=loud"));
        assert!(filter.to_string().to_lowercase().contains("contactlist=error"));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Trace);
    }
}
