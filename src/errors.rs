//! Spectree Error Handling
//!
//! Two families live here. [`FailureRecord`] is the value a failing example or context turns
//! into; it never escapes the engine as a Rust error. [`SpecError`] covers everything that can
//! go wrong around a run: configuration, config files and logging setup.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::assertion::AssertionFailure;

// ============================================================================
// TEST-LEVEL FAILURES
// ============================================================================

/// What went wrong with a single example or context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureRecord {
    /// An assertion raised by an example body or hook, with its location.
    Assertion(AssertionFailure),
    /// Any other error or panic surfacing from an example body or hook.
    UnknownError,
    /// The body of a `describe` failed while the tree was being registered.
    ContextSetup { message: String },
}

/// A failure paired with the display name it was reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    pub full_name: String,
    pub record: FailureRecord,
}

impl RecordedFailure {
    pub fn new(full_name: impl Into<String>, record: FailureRecord) -> Self {
        Self {
            full_name: full_name.into(),
            record,
        }
    }
}

// ============================================================================
// CRATE ERRORS
// ============================================================================

/// Errors raised while preparing a run.
#[derive(Debug, Error, Diagnostic)]
pub enum SpecError {
    #[error("unknown {kind} '{value}'")]
    #[diagnostic(
        code(spectree::config::unknown_choice),
        help("expected one of: {expected}")
    )]
    UnknownChoice {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("failed to read config file {}: {source}", .path.display())]
    #[diagnostic(code(spectree::config::io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    #[diagnostic(
        code(spectree::config::parse),
        help("the config file is YAML with keys such as `reporter`, `skip` and `dry_run`")
    )]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to initialise logging: {0}")]
    #[diagnostic(code(spectree::logging))]
    Logging(String),
}
