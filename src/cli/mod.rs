//! The spectree command-line runner.
//!
//! A test binary builds its [`Suite`] and hands it to [`run`]:
//!
//! ```no_run
//! use std::process::ExitCode;
//!
//! fn main() -> ExitCode {
//!     let mut suite = spectree::Suite::new();
//!     suite.describe("arithmetic", |s| {
//!         s.it("adds", || -> Result<(), spectree::AssertionFailure> {
//!             spectree::spec_assert_eq!(1 + 1, 2);
//!             Ok(())
//!         });
//!     });
//!     spectree::cli::run(&suite)
//! }
//! ```

use std::ffi::OsString;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use termcolor::{StandardStream, WriteColor};

use crate::config::RunConfig;
use crate::engine::{self, RunSummary};
use crate::logging;
use crate::reporter::build_reporter;
use crate::tree::Suite;

pub mod args;

pub use args::SpecArgs;

/// Exit code of a run whose reporter said it passed.
pub const EXIT_PASSED: u8 = 0;
/// Exit code of a failed run or of a command line that could not be understood.
pub const EXIT_FAILED: u8 = 1;

/// Parses the process arguments, runs `suite` and reports to stdout.
pub fn run(suite: &Suite) -> ExitCode {
    ExitCode::from(run_with_args(std::env::args_os(), suite))
}

/// Like [`run`], with explicit arguments (the first one is the program name).
pub fn run_with_args<I, T>(args: I, suite: &Suite) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match SpecArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_PASSED,
                _ => EXIT_FAILED,
            };
            // Printing usage is best-effort.
            let _ = err.print();
            return code;
        }
    };

    if args.version {
        println!("{}", version_banner());
        return EXIT_PASSED;
    }

    let config = match args.into_config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return EXIT_FAILED;
        }
    };

    if let Err(err) = logging::init_logging(config.log_level.as_deref()) {
        tracing::debug!(error = %err, "keeping the existing log subscriber");
    }

    let stdout = StandardStream::stdout(config.colorizer.color_choice());
    exit_code(execute(&config, suite, stdout))
}

/// Runs `suite` with the reporter, formatter and colorizer selected by `config`.
pub fn execute<W: WriteColor + 'static>(config: &RunConfig, suite: &Suite, out: W) -> RunSummary {
    let mut policy = config.policy();
    let mut reporter = build_reporter(config.reporter, config.formatter, config.colorizer, out);
    tracing::debug!(?config, "resolved run configuration");
    engine::run(suite, &mut policy, reporter.as_mut())
}

pub fn exit_code(summary: RunSummary) -> u8 {
    if summary.passed {
        EXIT_PASSED
    } else {
        EXIT_FAILED
    }
}

pub fn version_banner() -> String {
    format!("spectree version {}", env!("CARGO_PKG_VERSION"))
}
