//! Run configuration.
//!
//! Priority order (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`SPECTREE_REPORTER`, `SPECTREE_FORMATTER`, `SPECTREE_COLORIZER`)
//! 3. YAML config file (`--config`)
//! 4. Defaults

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::SpecError;
use crate::output::{Colorizer, FailureFormatter};
use crate::policy::RunPolicy;
use crate::reporter::ReporterKind;

pub const REPORTER_ENV: &str = "SPECTREE_REPORTER";
pub const FORMATTER_ENV: &str = "SPECTREE_FORMATTER";
pub const COLORIZER_ENV: &str = "SPECTREE_COLORIZER";

/// Everything a run needs besides the suite itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Skip examples whose full name contains this substring.
    pub skip: Option<String>,
    /// Only run examples whose full name contains this substring.
    pub only: Option<String>,
    pub break_on_failure: bool,
    pub dry_run: bool,
    pub reporter: ReporterKind,
    pub formatter: FailureFormatter,
    pub colorizer: Colorizer,
    /// Fallback log filter when `SPECTREE_LOG` is unset.
    pub log_level: Option<String>,
}

impl RunConfig {
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, SpecError> {
        serde_yaml::from_str(text).map_err(|source| SpecError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, SpecError> {
        let text = fs::read_to_string(path).map_err(|source| SpecError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text, path)
    }

    /// Applies flavor overrides looked up through `lookup` (normally the process environment).
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SpecError> {
        if let Some(value) = lookup(REPORTER_ENV) {
            self.reporter = parse_choice("reporter", &value)?;
        }
        if let Some(value) = lookup(FORMATTER_ENV) {
            self.formatter = parse_choice("formatter", &value)?;
        }
        if let Some(value) = lookup(COLORIZER_ENV) {
            self.colorizer = parse_choice("colorizer", &value)?;
        }
        Ok(())
    }

    /// A fresh policy for one run.
    pub fn policy(&self) -> RunPolicy {
        RunPolicy::new()
            .with_skip(self.skip.clone())
            .with_only(self.only.clone())
            .with_break_on_failure(self.break_on_failure)
            .with_dry_run(self.dry_run)
    }
}

/// Parses a flavor name the same way the command line does.
pub fn parse_choice<T: ValueEnum>(kind: &'static str, value: &str) -> Result<T, SpecError> {
    T::from_str(value.trim(), true).map_err(|_| SpecError::UnknownChoice {
        kind,
        value: value.to_string(),
        expected: T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|p| p.get_name().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_command_line() {
        let config = RunConfig::default();
        assert_eq!(config.reporter, ReporterKind::Dots);
        assert_eq!(config.formatter, FailureFormatter::Posix);
        assert_eq!(config.colorizer, Colorizer::Light);
        assert!(!config.dry_run);
        assert!(!config.break_on_failure);
    }

    #[test]
    fn yaml_fields_are_optional() {
        let config = RunConfig::from_yaml_str(
            "reporter: spec\nformatter: vs\nonly: parser\ndry_run: true\n",
            Path::new("inline.yaml"),
        )
        .unwrap();
        assert_eq!(config.reporter, ReporterKind::Spec);
        assert_eq!(config.formatter, FailureFormatter::VisualStudio);
        assert_eq!(config.only.as_deref(), Some("parser"));
        assert!(config.dry_run);
        assert_eq!(config.colorizer, Colorizer::Light);
    }

    #[test]
    fn posix_is_an_alias_for_default_formatter() {
        let config =
            RunConfig::from_yaml_str("formatter: posix\n", Path::new("inline.yaml")).unwrap();
        assert_eq!(config.formatter, FailureFormatter::Posix);
    }

    #[test]
    fn unknown_yaml_keys_are_rejected() {
        let err = RunConfig::from_yaml_str("reportr: dots\n", Path::new("typo.yaml")).unwrap_err();
        assert!(matches!(err, SpecError::ConfigParse { .. }));
        assert!(err.to_string().contains("typo.yaml"));
    }

    #[test]
    fn env_overrides_flavors() {
        let env: HashMap<&str, &str> =
            HashMap::from([(REPORTER_ENV, "XUnit"), (COLORIZER_ENV, "off")]);
        let mut config = RunConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.reporter, ReporterKind::Xunit);
        assert_eq!(config.colorizer, Colorizer::Off);
        assert_eq!(config.formatter, FailureFormatter::Posix);
    }

    #[test]
    fn env_rejects_unknown_flavors() {
        let mut config = RunConfig::default();
        let err = config
            .apply_env(|key| (key == FORMATTER_ENV).then(|| "emacs".to_string()))
            .unwrap_err();
        match err {
            SpecError::UnknownChoice {
                kind,
                value,
                expected,
            } => {
                assert_eq!(kind, "formatter");
                assert_eq!(value, "emacs");
                assert_eq!(expected, "default, vs");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn policy_carries_filters() {
        let config = RunConfig {
            skip: Some("slow".into()),
            dry_run: true,
            ..RunConfig::default()
        };
        let policy = config.policy();
        assert!(policy.is_dry_run());
        assert_eq!(
            policy.decide("a slow one", Default::default()),
            crate::policy::Decision::Skip
        );
    }
}
