//! stderr logging via `tracing-subscriber`.
//!
//! An explicit verbosity flag wins over `RUST_LOG`; without one, `RUST_LOG`
//! applies, then the `info` default.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Default,
    Debug,
    Quiet,
    Silent,
}

impl Verbosity {
    pub fn from_flags(debug: bool, quiet: bool, silent: bool) -> Self {
        if silent {
            Self::Silent
        } else if debug {
            Self::Debug
        } else if quiet {
            Self::Quiet
        } else {
            Self::Default
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Debug => "debug",
            Self::Quiet => "warn",
            Self::Silent => "off",
        }
    }
}

fn filter_for(verbosity: Verbosity) -> EnvFilter {
    if verbosity == Verbosity::Default
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(verbosity.directive())
}

pub fn init(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
