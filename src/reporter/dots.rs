//! Dots reporter: `.` per success, `F` per failure, `E` per unknown error, `S` per skip.

use termcolor::WriteColor;

use super::{write_summary, Aggregator, Reporter};
use crate::assertion::AssertionFailure;
use crate::output::{Colorizer, FailureFormatter, Style, StyledWriter};

pub struct DotsReporter<W> {
    out: StyledWriter<W>,
    formatter: FailureFormatter,
    stats: Aggregator,
}

impl<W: WriteColor> DotsReporter<W> {
    pub fn new(out: W, formatter: FailureFormatter, colorizer: Colorizer) -> Self {
        Self {
            out: StyledWriter::new(out, colorizer),
            formatter,
            stats: Aggregator::new(),
        }
    }

    pub fn stats(&self) -> &Aggregator {
        &self.stats
    }

    pub fn writer(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: WriteColor> Reporter for DotsReporter<W> {
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
        self.out.styled(Style::Good, ".");
        self.out.flush();
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        self.stats.record_failure(name, failure);
        self.out.styled(Style::Bad, "F");
        self.out.flush();
    }

    fn it_unknown_error(&mut self, name: &str) {
        self.stats.record_unknown_error(name);
        self.out.styled(Style::Bad, "E");
        self.out.flush();
    }

    fn it_skip(&mut self, _name: &str) {
        self.stats.record_skip();
        self.out.styled(Style::Neutral, "S");
        self.out.flush();
    }

    fn test_run_error(&mut self, _context_name: &str, message: &str) {
        self.stats.record_run_error(message);
    }

    fn test_run_complete(&mut self) {
        self.out.line("");
        write_summary(&mut self.out, &self.stats, self.formatter);
        self.out.flush();
    }

    fn did_we_pass(&self) -> bool {
        self.stats.did_we_pass()
    }
}
