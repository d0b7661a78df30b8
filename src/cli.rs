// ==============================================================================
// cli.rs - Shared Command Line Setup
// ==============================================================================
// Description: Tracing initialisation and argument parsing for the binaries
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the fmt subscriber; `RUST_LOG` overrides `default_directive`
pub fn init_tracing(default_directive: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Exit status for a clap error: 1 for usage errors, 0 for `--help`/`--version`
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Parse arguments, exiting with status 1 on usage errors
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Nothing useful to do if the terminal is gone
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TwoPositionals {
        input: String,
        output: String,
    }

    #[test]
    fn test_missing_positional_exits_one() {
        let err = TwoPositionals::try_parse_from(["tool", "only_one"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        // clap itself would exit 2
        assert_eq!(err.exit_code(), 2);
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_unknown_flag_exits_one() {
        let err = TwoPositionals::try_parse_from(["tool", "a", "b", "--bogus"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_help_exits_zero() {
        let err = TwoPositionals::try_parse_from(["tool", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(usage_exit_code(&err), 0);
    }
}
