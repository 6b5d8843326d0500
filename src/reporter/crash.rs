//! Crash reporter: silent on success, prints each failure the moment it happens.
//!
//! Meant for logs and crash dumps where progress output is noise. The closing summary line
//! is still written so the counts are visible.

use termcolor::WriteColor;

use super::{Aggregator, Reporter, NO_TESTS_FOUND};
use crate::assertion::AssertionFailure;
use crate::output::{Colorizer, FailureFormatter, StyledWriter};

pub struct CrashReporter<W> {
    out: StyledWriter<W>,
    formatter: FailureFormatter,
    stats: Aggregator,
}

impl<W: WriteColor> CrashReporter<W> {
    pub fn new(out: W, formatter: FailureFormatter) -> Self {
        Self {
            out: StyledWriter::new(out, Colorizer::Off),
            formatter,
            stats: Aggregator::new(),
        }
    }

    pub fn writer(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: WriteColor> Reporter for CrashReporter<W> {
    fn test_run_starting(&mut self) {
        self.stats.reset();
    }

    fn context_starting(&mut self, name: &str) {
        self.stats.push_context(name);
    }

    fn context_ended(&mut self, _name: &str) {
        self.stats.pop_context();
    }

    fn it_starting(&mut self, _name: &str) {}

    fn it_succeeded(&mut self, _name: &str) {
        self.stats.record_success();
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        let rendered = self.formatter.render(self.stats.record_failure(name, failure));
        self.out.line(&rendered);
        self.out.flush();
    }

    fn it_unknown_error(&mut self, name: &str) {
        let rendered = self.formatter.render(self.stats.record_unknown_error(name));
        self.out.line(&rendered);
        self.out.flush();
    }

    fn it_skip(&mut self, _name: &str) {
        self.stats.record_skip();
    }

    fn test_run_error(&mut self, _context_name: &str, message: &str) {
        let rendered = self.formatter.render(self.stats.record_run_error(message));
        self.out.line(&rendered);
        self.out.flush();
    }

    fn test_run_complete(&mut self) {
        if self.stats.found_no_tests() {
            self.out.line(NO_TESTS_FOUND);
        } else {
            self.out.line(&self.stats.summary_line());
        }
        self.out.flush();
    }

    fn did_we_pass(&self) -> bool {
        self.stats.did_we_pass()
    }
}
