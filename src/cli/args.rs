//! Defines the command-line options of a spectree test binary.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::Parser;

use crate::config::RunConfig;
use crate::errors::SpecError;
use crate::output::{Colorizer, FailureFormatter};
use crate::reporter::ReporterKind;

/// The options every spectree test binary accepts.
#[derive(Debug, Parser)]
#[command(
    name = "spectree",
    about = "Runs a spectree specification suite.",
    disable_version_flag = true
)]
pub struct SpecArgs {
    /// Print the spectree version and exit.
    #[arg(long)]
    pub version: bool,

    /// Select the reporter.
    #[arg(long, value_enum, value_name = "REPORTER")]
    pub reporter: Option<ReporterKind>,

    /// Select how assertion failures are formatted.
    #[arg(long, value_enum, value_name = "FORMATTER")]
    pub formatter: Option<FailureFormatter>,

    /// Select the color palette.
    #[arg(long, value_enum, value_name = "COLORIZER")]
    pub colorizer: Option<Colorizer>,

    /// Suppress colors in output.
    #[arg(long)]
    pub no_color: bool,

    /// Skip all 'describe' and 'it' containing substring.
    #[arg(long, value_name = "SUBSTRING")]
    pub skip: Option<String>,

    /// Only run 'describe' and 'it' containing substring.
    #[arg(long, value_name = "SUBSTRING")]
    pub only: Option<String>,

    /// Stop the test run on the first failing test.
    #[arg(long)]
    pub break_on_failure: bool,

    /// Don't run tests, just list progress. Use to list available tests.
    #[arg(long)]
    pub dry_run: bool,

    /// Read defaults from a YAML config file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter used when SPECTREE_LOG is unset (e.g. `debug`).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl SpecArgs {
    /// Layers the config file, the environment and these flags into one configuration.
    pub fn into_config(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<RunConfig, SpecError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)?,
            None => RunConfig::default(),
        };
        config.apply_env(lookup)?;

        if let Some(reporter) = self.reporter {
            config.reporter = reporter;
        }
        if let Some(formatter) = self.formatter {
            config.formatter = formatter;
        }
        if let Some(colorizer) = self.colorizer {
            config.colorizer = colorizer;
        }
        if self.no_color {
            config.colorizer = Colorizer::Off;
        }
        if self.skip.is_some() {
            config.skip = self.skip;
        }
        if self.only.is_some() {
            config.only = self.only;
        }
        config.break_on_failure |= self.break_on_failure;
        config.dry_run |= self.dry_run;
        if self.log_level.is_some() {
            config.log_level = self.log_level;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SpecArgs {
        SpecArgs::try_parse_from(std::iter::once("spectree").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_map_onto_config() {
        let config = parse(&[
            "--reporter=spec",
            "--formatter=vs",
            "--skip=slow",
            "--only",
            "parser",
            "--break-on-failure",
            "--dry-run",
        ])
        .into_config(|_| None)
        .unwrap();
        assert_eq!(config.reporter, ReporterKind::Spec);
        assert_eq!(config.formatter, FailureFormatter::VisualStudio);
        assert_eq!(config.skip.as_deref(), Some("slow"));
        assert_eq!(config.only.as_deref(), Some("parser"));
        assert!(config.break_on_failure);
        assert!(config.dry_run);
    }

    #[test]
    fn no_color_wins_over_colorizer() {
        let config = parse(&["--colorizer=dark", "--no-color"])
            .into_config(|_| None)
            .unwrap();
        assert_eq!(config.colorizer, Colorizer::Off);
    }

    #[test]
    fn flags_override_environment() {
        let config = parse(&["--reporter=info"])
            .into_config(|key| (key == crate::config::REPORTER_ENV).then(|| "crash".into()))
            .unwrap();
        assert_eq!(config.reporter, ReporterKind::Info);
    }

    #[test]
    fn unknown_reporter_is_a_parse_error() {
        let err = SpecArgs::try_parse_from(["spectree", "--reporter=fancy"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
