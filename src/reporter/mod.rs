//! The reporter event protocol and the aggregation every reporter shares.
//!
//! The engine drives a [`Reporter`] through an ordered sequence of events. All flavors count
//! through an [`Aggregator`], so pass/fail/skip numbers, nested display names and the final
//! verdict are identical whichever flavor renders them.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use termcolor::WriteColor;

use crate::assertion::AssertionFailure;
use crate::errors::{FailureRecord, RecordedFailure};
use crate::output::{Colorizer, FailureFormatter, Style, StyledWriter};

pub mod crash;
pub mod dots;
pub mod info;
pub mod singleline;
pub mod spec;
pub mod xunit;

pub use crash::CrashReporter;
pub use dots::DotsReporter;
pub use info::InfoReporter;
pub use singleline::SinglelineReporter;
pub use spec::SpecReporter;
pub use xunit::XunitReporter;

// ============================================================================
// EVENT PROTOCOL
// ============================================================================

/// Consumer of the engine's ordered lifecycle events.
pub trait Reporter {
    fn test_run_starting(&mut self);
    fn context_starting(&mut self, name: &str);
    fn context_ended(&mut self, name: &str);
    fn it_starting(&mut self, name: &str);
    fn it_succeeded(&mut self, name: &str);
    fn it_failed(&mut self, name: &str, failure: &AssertionFailure);
    fn it_unknown_error(&mut self, name: &str);
    fn it_skip(&mut self, name: &str);
    fn test_run_error(&mut self, context_name: &str, message: &str);
    fn test_run_complete(&mut self);
    fn did_we_pass(&self) -> bool;
}

/// The built-in reporter flavors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// One character per example.
    #[default]
    Dots,
    /// A single progress line rewritten in place.
    Singleline,
    /// JUnit-style XML.
    Xunit,
    /// Nested begin/end blocks with per-context tallies.
    Info,
    /// Indented describe/it listing.
    Spec,
    /// Only failures, as they happen.
    Crash,
}

/// Builds the reporter of the given flavor writing to `out`.
pub fn build_reporter<W: WriteColor + 'static>(
    kind: ReporterKind,
    formatter: FailureFormatter,
    colorizer: Colorizer,
    out: W,
) -> Box<dyn Reporter> {
    match kind {
        ReporterKind::Dots => Box::new(DotsReporter::new(out, formatter, colorizer)),
        ReporterKind::Singleline => Box::new(SinglelineReporter::new(out, formatter, colorizer)),
        ReporterKind::Xunit => Box::new(XunitReporter::new(out, formatter)),
        ReporterKind::Info => Box::new(InfoReporter::new(out, formatter, colorizer)),
        ReporterKind::Spec => Box::new(SpecReporter::new(out, formatter, colorizer)),
        ReporterKind::Crash => Box::new(CrashReporter::new(out, formatter)),
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Running counters, the open-context stack and the failures recorded so far.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    pub examples_run: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub context_errors: usize,
    contexts: Vec<String>,
    failures: Vec<RecordedFailure>,
    run_errors: Vec<RecordedFailure>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn push_context(&mut self, name: &str) {
        self.contexts.push(name.to_string());
    }

    pub fn pop_context(&mut self) {
        self.contexts.pop();
    }

    /// Number of currently open contexts.
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn current_context_name(&self) -> String {
        self.contexts.join(" ")
    }

    /// Open context names followed by `example`, space separated.
    pub fn full_name(&self, example: &str) -> String {
        if self.contexts.is_empty() {
            example.to_string()
        } else {
            format!("{} {}", self.current_context_name(), example)
        }
    }

    pub fn record_success(&mut self) {
        self.examples_run += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, example: &str, failure: &AssertionFailure) -> &RecordedFailure {
        self.record_failed(example, FailureRecord::Assertion(failure.clone()))
    }

    pub fn record_unknown_error(&mut self, example: &str) -> &RecordedFailure {
        self.record_failed(example, FailureRecord::UnknownError)
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_run_error(&mut self, message: &str) -> &RecordedFailure {
        self.context_errors += 1;
        let context = self.current_context_name();
        self.run_errors.push(RecordedFailure::new(
            context,
            FailureRecord::ContextSetup {
                message: message.to_string(),
            },
        ));
        &self.run_errors[self.run_errors.len() - 1]
    }

    pub fn failures(&self) -> &[RecordedFailure] {
        &self.failures
    }

    pub fn run_errors(&self) -> &[RecordedFailure] {
        &self.run_errors
    }

    pub fn did_we_pass(&self) -> bool {
        self.failed == 0 && self.context_errors == 0
    }

    /// Nothing ran and nothing broke: the suite had no runnable examples.
    pub fn found_no_tests(&self) -> bool {
        self.examples_run == 0 && self.context_errors == 0
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Test run complete. {} tests run. {} succeeded.",
            self.examples_run, self.succeeded
        );
        if self.failed > 0 {
            line.push_str(&format!(" {} failed.", self.failed));
        }
        if self.skipped > 0 {
            line.push_str(&format!(" {} skipped.", self.skipped));
        }
        if self.context_errors > 0 {
            line.push_str(&format!(" {} test run errors.", self.context_errors));
        }
        line
    }

    fn record_failed(&mut self, example: &str, record: FailureRecord) -> &RecordedFailure {
        self.examples_run += 1;
        self.failed += 1;
        let full_name = self.full_name(example);
        self.failures.push(RecordedFailure::new(full_name, record));
        &self.failures[self.failures.len() - 1]
    }
}

// ============================================================================
// SHARED RENDERING
// ============================================================================

pub(crate) const NO_TESTS_FOUND: &str = "Could not find any tests.";

/// Writes the closing block used by the human-readable flavors: banner, context errors,
/// failure details and the summary line.
pub(crate) fn write_summary<W: WriteColor>(
    out: &mut StyledWriter<W>,
    stats: &Aggregator,
    formatter: FailureFormatter,
) {
    if stats.found_no_tests() {
        out.styled(Style::Bad, NO_TESTS_FOUND);
        out.line("");
        return;
    }

    if stats.did_we_pass() {
        out.styled(Style::Good, "Success!");
        out.line("");
    }

    for error in stats.run_errors() {
        out.line(&formatter.render(error));
    }

    if !stats.failures().is_empty() {
        out.styled(Style::Bad, "There were failures!");
        out.line("");
        for failure in stats.failures() {
            out.line(&formatter.render(failure));
        }
        out.line("");
    }

    out.line(&stats.summary_line());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_open_contexts() {
        let mut stats = Aggregator::new();
        assert_eq!(stats.full_name("lonely"), "lonely");
        stats.push_context("my context");
        stats.push_context("a nested context");
        assert_eq!(stats.full_name("my test"), "my context a nested context my test");
        stats.pop_context();
        assert_eq!(stats.full_name("my test"), "my context my test");
    }

    #[test]
    fn skips_do_not_count_as_run() {
        let mut stats = Aggregator::new();
        stats.record_success();
        stats.record_skip();
        stats.record_skip();
        assert_eq!(stats.examples_run, 1);
        assert_eq!(stats.skipped, 2);
        assert!(stats.did_we_pass());
    }

    #[test]
    fn failures_and_errors_fail_the_run() {
        let mut stats = Aggregator::new();
        stats.record_unknown_error("boom");
        assert!(!stats.did_we_pass());
        assert_eq!(stats.examples_run, 1);
        assert_eq!(stats.failed, 1);

        let mut stats = Aggregator::new();
        stats.push_context("ctx");
        let error = stats.record_run_error("setup");
        assert_eq!(error.full_name, "ctx");
        assert!(!stats.did_we_pass());
        assert!(!stats.found_no_tests());
    }

    #[test]
    fn summary_line_clauses_in_order() {
        let mut stats = Aggregator::new();
        stats.record_success();
        assert_eq!(
            stats.summary_line(),
            "Test run complete. 1 tests run. 1 succeeded."
        );
        stats.record_failure("x", &AssertionFailure::unlocated("no"));
        stats.record_skip();
        stats.record_run_error("bad");
        assert_eq!(
            stats.summary_line(),
            "Test run complete. 2 tests run. 1 succeeded. 1 failed. 1 skipped. 1 test run errors."
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = Aggregator::new();
        stats.push_context("ctx");
        stats.record_unknown_error("x");
        stats.reset();
        assert_eq!(stats.depth(), 0);
        assert!(stats.failures().is_empty());
        assert!(stats.found_no_tests());
    }
}
