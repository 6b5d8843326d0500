//! Failure formatters: how an assertion location and message are rendered.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::assertion::AssertionFailure;
use crate::errors::{FailureRecord, RecordedFailure};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum FailureFormatter {
    /// `file:line: message`
    #[default]
    #[value(name = "default", alias = "posix")]
    #[serde(rename = "default", alias = "posix")]
    Posix,
    /// `file(line): error: message`, which IDEs turn into jump links.
    #[value(name = "vs")]
    #[serde(rename = "vs")]
    VisualStudio,
}

impl FailureFormatter {
    pub fn format(self, failure: &AssertionFailure) -> String {
        let mut out = String::new();
        match self {
            FailureFormatter::Posix => {
                if !failure.file.is_empty() {
                    out.push_str(&failure.file);
                    out.push(':');
                    if failure.line > 0 {
                        out.push_str(&failure.line.to_string());
                        out.push(':');
                    }
                    out.push(' ');
                }
            }
            FailureFormatter::VisualStudio => {
                if !failure.file.is_empty() {
                    out.push_str(&failure.file);
                    if failure.line > 0 {
                        out.push_str(&format!("({})", failure.line));
                    }
                    out.push_str(": ");
                }
                out.push_str("error: ");
            }
        }
        out.push_str(&failure.message);
        out
    }

    /// The detail block printed for one failure in a run summary.
    pub fn render(self, failure: &RecordedFailure) -> String {
        match &failure.record {
            FailureRecord::Assertion(assertion) => {
                format!("{}:\n{}", failure.full_name, self.format(assertion))
            }
            FailureRecord::UnknownError => format!("{}:\nUnknown exception", failure.full_name),
            FailureRecord::ContextSetup { message } => {
                format!("Failed to run \"{}\": error \"{}\"", failure.full_name, message)
            }
        }
    }
}
